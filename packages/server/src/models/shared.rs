use serde::{Deserialize, Deserializer, de};

/// Lenient boolean for query strings: `true/false`, `1/0`, `yes/no`, `on/off`
/// (case-insensitive).
pub fn query_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(de::Error::custom(format!(
            "expected a boolean, got '{other}'"
        ))),
    }
}
