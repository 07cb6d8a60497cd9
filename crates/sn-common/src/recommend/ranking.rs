use std::cmp::Ordering;

/// Cap a raw weighted sum into `[0, 1]`. Values above 1.0 are capped rather
/// than renormalized; NaN maps to 0.
pub fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 1.0)
}

/// Descending score order with a total ordering over f64.
pub fn score_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// Sort the complete candidate list, then keep the first `limit` entries.
/// Truncation happens strictly after ranking so it never changes the order.
pub fn rank_top_k<T, F>(mut items: Vec<T>, limit: usize, compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
    items.truncate(limit);
    items
}
