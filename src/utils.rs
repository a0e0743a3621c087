use std::f64::consts::{PI, TAU};
use std::path::PathBuf;
use glob::glob;
use crate::errors::FieldLinesError;
use log::warn;

/// arithmetic mean, `None` for an empty iterator
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64>{
    let (sum, count) = values.into_iter().fold((0f64, 0usize), |(sum, count), value| {
        (sum + value, count + 1)
    });
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// returns the smaller f64, defaulting to `a` when a == b
pub fn f64_min(a: f64, b: f64) -> f64{
    if a > b {
        b
    } else {
        a
    }
}

/// returns the bigger f64, defaulting to `a` when a == b
pub fn f64_max(a: f64, b: f64) -> f64{
    if a < b {
        b
    } else {
        a
    }
}

/// basically a wrapper for `glob(glob_pattern)` with error conversions
pub fn get_paths(glob_pattern: &str) -> Result<Vec<PathBuf>, FieldLinesError>{

    let mut path_vec: Vec<PathBuf> = Vec::new();

    for entry in glob(glob_pattern)? {
        match entry {
            Ok(path) => {
                path_vec.push(path)
            },
            Err(e) => warn!("file was not able to be read, skipping it.: {:?} ", e),
        }
    }

    if path_vec.is_empty(){
        Err(FieldLinesError::NoValidGlobReturnsError(glob_pattern.to_string()))
    } else {
        Ok(path_vec)
    }
}

/// floored modulo, the result takes the sign of `n` (unlike `%`)
pub fn modulo(m: f64, n: f64) -> f64{
    ((m % n) + n) % n
}

/// maps an angle into `[0, 2π)`
pub fn zero_to_two_pi(angle: f64) -> f64{
    let wrapped = modulo(angle, TAU);
    // modulo can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0f64
    } else {
        wrapped
    }
}

/// maps an angle into `(-π, π]`
pub fn negative_pi_to_pi(angle: f64) -> f64{
    let wrapped = zero_to_two_pi(angle);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// maps an orientation into `[0, π)`. A field pointing north is the same field pointing south.
pub fn zero_to_pi(angle: f64) -> f64{
    let wrapped = modulo(zero_to_two_pi(angle), PI);
    if wrapped >= PI {
        0f64
    } else {
        wrapped
    }
}

/// smallest signed difference `a - b`, in `(-π, π]`
pub fn angle_difference(a: f64, b: f64) -> f64{
    negative_pi_to_pi(a - b)
}

/// Mean of orientations that are only defined modulo π, in `[0, π)`.
///
/// Plain averaging breaks for fields pointing close to due north, where half the samples land
/// near 0 and the other half near π. Doubling the angles maps both onto the same direction, so
/// a circular mean of the doubled angles halved back is the mean orientation.
///
/// Returns `None` for an empty input or when the samples cancel out exactly.
pub fn axial_mean<I: IntoIterator<Item = f64>>(angles: I) -> Option<f64>{
    let (sin_sum, cos_sum, count) = angles.into_iter().fold((0f64, 0f64, 0usize), |(s, c, n), angle| {
        (s + (2.0 * angle).sin(), c + (2.0 * angle).cos(), n + 1)
    });
    if count == 0 || (sin_sum.abs() < f64::EPSILON && cos_sum.abs() < f64::EPSILON) {
        return None;
    }
    Some(zero_to_pi(sin_sum.atan2(cos_sum) / 2.0))
}
