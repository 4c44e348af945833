use crate::foundation::error::{ReelError, ReelResult};

/// Parse a colon-delimited timestamp (`"1:02:03"`, `"02:03"`, `"5"`) into whole seconds.
///
/// Fields are most-significant first and weighted by `60^i` from the right, so there is no
/// upper bound on the number of fields. Surrounding whitespace on the string and on each
/// field is ignored.
pub fn parse_timestamp(input: &str) -> ReelResult<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ReelError::malformed_timestamp("timestamp is empty"));
    }

    let overflow = || ReelError::malformed_timestamp(format!("'{trimmed}' overflows"));
    let mut total = 0u64;
    // `None` once 60^i no longer fits; only zero fields may sit at such a position.
    let mut weight = Some(1u64);
    for field in trimmed.rsplit(':') {
        let field = field.trim();
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ReelError::malformed_timestamp(format!(
                "field '{field}' in '{trimmed}' is not a non-negative integer"
            )));
        }
        let value: u64 = field.parse().map_err(|e| {
            ReelError::malformed_timestamp(format!("field '{field}' in '{trimmed}': {e}"))
        })?;
        if value != 0 {
            total = weight
                .and_then(|w| value.checked_mul(w))
                .and_then(|v| total.checked_add(v))
                .ok_or_else(overflow)?;
        }
        weight = weight.and_then(|w| w.checked_mul(60));
    }
    Ok(total)
}

/// Render seconds as `H:MM:SS.mmm` for log lines.
pub fn format_seconds(secs: f64) -> String {
    let sign = if secs < 0.0 { "-" } else { "" };
    let millis = (secs.abs() * 1000.0).round() as u64;
    let h = millis / 3_600_000;
    let m = (millis / 60_000) % 60;
    let s = (millis / 1000) % 60;
    let ms = millis % 1000;
    format!("{sign}{h}:{m:02}:{s:02}.{ms:03}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
