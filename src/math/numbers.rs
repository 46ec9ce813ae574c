//! Small numeric helpers for presenting classification results.

/// True if `|test| <= 1e-6 * scale`.
pub fn is_within_tolerance(test: f64, scale: f64) -> bool {
    test.abs() <= 1.0e-6 * scale
}

/// True if `x` is within `1e-6 |x|` of an integer.
pub fn is_nearly_integer(x: f64) -> bool {
    is_within_tolerance(x - x.round(), x.abs())
}

/// Map an angle in degrees into `(-180, 180]`.
pub fn normalize_angle_degrees(angle: f64) -> f64 {
    let turns = 0.5 + angle / 360.0;
    let fractional = 1.0 + turns - turns.ceil();
    360.0 * (fractional - 0.5)
}

/// Rescale `x` so that its entries are small integers when possible.
///
/// The vector is first divided by its first non-negligible entry. Then the
/// smallest multiplier `l <= limit` that makes every entry nearly integral
/// is applied and the entries rounded. Without such a multiplier the
/// normalized vector is returned; an all-negligible vector is returned as is.
pub fn make_integer(x: &[f64], limit: usize) -> Vec<f64> {
    let mx = x.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let Some(pivot) = x
        .iter()
        .copied()
        .find(|v| !is_within_tolerance(*v, mx + f64::MIN_POSITIVE))
    else {
        return x.to_vec();
    };

    let scaled: Vec<f64> = x.iter().map(|v| v / pivot).collect();
    for l in 1..=limit {
        let lf = l as f64;
        if scaled.iter().all(|v| is_nearly_integer(lf * v)) {
            return scaled.iter().map(|v| (lf * v).round()).collect();
        }
    }
    scaled
}

/// Magnitude of `a cos t + b sin t`.
pub fn amplitude(a: f64, b: f64) -> f64 {
    a.hypot(b)
}

/// Phase `p` such that `a cos t + b sin t = amplitude * cos(t - p)`.
pub fn phase(a: f64, b: f64) -> f64 {
    b.atan2(a)
}
