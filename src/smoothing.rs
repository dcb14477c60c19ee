//! Gaussian smoothing of scalar fields
//!
//! Merges isolated noise spikes into coherent regions before classification.
//! The blur wraps on both axes, matching the toroidal height field.

use crate::tilemap::Tilemap;

/// Kernel extends this many sigmas on each side of the centre.
const TRUNCATE: f64 = 4.0;

/// Normalized 1D Gaussian kernel of radius `ceil(TRUNCATE * sigma)`.
fn gaussian_kernel(sigma: f64) -> Vec<f32> {
    let radius = (TRUNCATE * sigma).ceil() as isize;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|w| (w / sum) as f32).collect()
}

/// Kernel taps as (offset, weight) along an axis that wraps every `period` cells.
///
/// Taps landing on the same cell after wrapping are merged, so an axis never
/// has more than `period` taps. Once sigma reaches the period the wrapped
/// Gaussian is flat to well within f32 precision, so the taps are uniform.
fn wrapped_taps(sigma: f64, period: usize) -> Vec<(isize, f32)> {
    if sigma >= period as f64 {
        let weight = 1.0 / period as f32;
        return (0..period as isize).map(|d| (d, weight)).collect();
    }

    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    if kernel.len() <= period {
        return kernel
            .into_iter()
            .enumerate()
            .map(|(k, w)| (k as isize - radius, w))
            .collect();
    }

    let mut folded = vec![0.0f32; period];
    for (k, w) in kernel.into_iter().enumerate() {
        folded[(k as isize - radius).rem_euclid(period as isize) as usize] += w;
    }
    folded.into_iter().enumerate().map(|(d, w)| (d as isize, w)).collect()
}

/// Blur `field` with an isotropic Gaussian of standard deviation `sigma` cells.
///
/// Separable: one horizontal pass then one vertical pass. Returns the input
/// unchanged when `sigma <= 0`.
pub fn gaussian_blur(field: &Tilemap<f32>, sigma: f64) -> Tilemap<f32> {
    if sigma <= 0.0 || field.width == 0 || field.height == 0 {
        return field.clone();
    }

    let taps_x = wrapped_taps(sigma, field.width);
    let taps_y = wrapped_taps(sigma, field.height);

    let horizontal = Tilemap::from_fn(field.width, field.height, |x, y| {
        taps_x
            .iter()
            .map(|&(d, w)| w * field.get_wrapped(x as isize + d, y as isize))
            .sum::<f32>()
    });

    Tilemap::from_fn(field.width, field.height, |x, y| {
        taps_y
            .iter()
            .map(|&(d, w)| w * horizontal.get_wrapped(x as isize, y as isize + d))
            .sum::<f32>()
    })
}
