/// Index of the highest score, counting only scores strictly above 0.0.
///
/// Returns `None` when no score is positive (including an empty slice).
/// Ties keep the earliest index.
pub fn classify(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        let threshold = best.map_or(0.0, |(_, s)| s);
        if score > threshold {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
