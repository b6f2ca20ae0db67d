/// Magnitude of the joint invested amount.
///
/// Formula: `min(log10(amount + 1) / log10(cap + 1), 1)`
///
/// Non-positive amounts score 0.
pub fn calculate(amount: f64, cap: f64) -> f64 {
    if !amount.is_finite() || amount <= 0.0 || !cap.is_finite() || cap <= 0.0 {
        return 0.0;
    }
    ((amount + 1.0).log10() / (cap + 1.0).log10()).clamp(0.0, 1.0)
}
