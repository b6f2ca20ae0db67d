/// Joint-activity overlap.
///
/// Formula: `joint / (a + b - joint)`
///
/// `a` and `b` are the record counts attributable to each province, `joint`
/// the count attributable to both. Either side empty → 0.
pub fn calculate(a: usize, b: usize, joint: usize) -> f64 {
    if a == 0 || b == 0 {
        return 0.0;
    }
    let union = a as f64 + b as f64 - joint as f64;
    if union <= 0.0 {
        return 0.0;
    }
    (joint as f64 / union).clamp(0.0, 1.0)
}
