use crate::types::is_valid_number;
use regex::Regex;
use std::sync::OnceLock;

static NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn number_re() -> &'static Regex {
    NUMBER_RE.get_or_init(|| Regex::new(r"(?i)\b(?:station|position)\s*(\d+)").unwrap())
}

/// Recover the ordinal an operator meant from a free-text position name.
///
/// Looks for "Station <digits>" or "Position <digits>" anywhere in the text
/// and returns the digits of the leftmost match. Numbers outside the valid
/// position range are treated as absent.
pub fn extract_number(name: &str) -> Option<u32> {
    let caps = number_re().captures(name)?;
    let n: u32 = caps.get(1)?.as_str().parse().ok()?;
    is_valid_number(n).then_some(n)
}
