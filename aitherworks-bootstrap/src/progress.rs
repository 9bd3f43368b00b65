/// Converts an engine-reported `(current, total)` pair into a whole percentage.
///
/// Returns `None` while the total is unknown (zero, negative or not finite),
/// which keeps the indicator indeterminate.
pub fn percent(current: f64, total: f64) -> Option<u8> {
    if !(total.is_finite() && total > 0.0) || !current.is_finite() {
        return None;
    }
    let pct = (current / total * 100.0).round().clamp(0.0, 100.0);
    Some(pct as u8)
}
