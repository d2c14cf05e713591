use std::sync::LazyLock;

use regex::Regex;

/// Car-number prefix the server prepends to some driver names.
static LEADING_CAR_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s]+").expect("valid regex"));

const AI_SUFFIX: &str = " (AI)";

/// Canonical display name for a driver.
///
/// Strips the trailing ` (AI)` marker and any leading car-number digits.
/// Drivers match across races by cleaned name only, so every place a name is
/// persisted or displayed must go through this.
pub fn clean_name(name: &str) -> String {
    let name = name.strip_suffix(AI_SUFFIX).unwrap_or(name);
    LEADING_CAR_NUMBER.replace(name, "").trim().to_string()
}
