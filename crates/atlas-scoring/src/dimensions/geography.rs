/// Geographic proximity.
///
/// Formula: `1 / (1 + km / scale)`
///
/// Distance 0 → 1.0, strictly decreasing in distance. A non-positive scale
/// is treated as "no decay information" and scores 0.
pub fn calculate(km: f64, scale: f64) -> f64 {
    if !km.is_finite() || km < 0.0 || !scale.is_finite() || scale <= 0.0 {
        return 0.0;
    }
    1.0 / (1.0 + km / scale)
}
