//! Lenient parsing of model output.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

/// Percentages read from a model answer. Either side may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSplit {
    /// `percentage_equity`, if present and numeric.
    pub equity: Option<Decimal>,
    /// `percentage_debt`, if present and numeric.
    pub debt: Option<Decimal>,
}

/// Returns the text between the first `{` and the last `}`, inclusive.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a split answer. `None` means the text held no usable JSON object.
#[must_use]
pub fn parse_split(text: &str) -> Option<RawSplit> {
    let json = extract_json_object(text)?;
    let Value::Object(fields) = serde_json::from_str::<Value>(json).ok()? else {
        return None;
    };

    Some(RawSplit {
        equity: fields.get("percentage_equity").and_then(numeric),
        debt: fields.get("percentage_debt").and_then(numeric),
    })
}

/// Reads a JSON number, or a string holding one such as `"70"` or `"70%"`.
fn numeric(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s.trim().trim_end_matches('%').trim_end()),
        _ => None,
    }
}

fn decimal_from_str(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
