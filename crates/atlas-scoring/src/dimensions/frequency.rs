use std::collections::BTreeMap;

/// Cosine similarity between two frequency maps over the union of their keys.
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &BTreeMap<String, usize>, b: &BTreeMap<String, usize>) -> f64 {
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (key, x) in a {
        let x = *x as f64;
        mag_a += x * x;
        if let Some(y) = b.get(key) {
            dot += x * *y as f64;
        }
    }
    for y in b.values() {
        let y = *y as f64;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}
