/// Clock-style duration `m:ss` / `mm:ss` to seconds.
///
/// Anything that does not split into exactly two integer parts degrades to
/// `0.0`. Callers grading lower-is-better tests against this value will see
/// malformed durations rank as the best possible time; that behavior is
/// kept for compatibility with existing records.
pub fn parse_duration(text: &str) -> f64 {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 2 {
        tracing::debug!(text, "duration does not have exactly two parts");
        return 0.0;
    }
    let (Ok(minutes), Ok(seconds)) = (
        parts[0].trim().parse::<i64>(),
        parts[1].trim().parse::<i64>(),
    ) else {
        tracing::debug!(text, "duration parts are not integers");
        return 0.0;
    };
    let Some(total) = minutes.checked_mul(60).and_then(|m| m.checked_add(seconds)) else {
        tracing::debug!(text, "duration overflows");
        return 0.0;
    };
    total as f64
}

/// Normalizes a textual result into a comparable number.
///
/// Text containing `:` always succeeds through [`parse_duration`]. Other
/// text is parsed as an invariant decimal (`.` separator, optional sign,
/// surrounding whitespace ignored). Non-finite values count as unparsable.
pub fn parse_numeric(text: &str) -> Option<f64> {
    if text.contains(':') {
        return Some(parse_duration(text));
    }
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
