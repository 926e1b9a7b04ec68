//! Lenient decoding helpers for fields whose JSON shape the Isard API does not
//! keep stable between versions.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_json::value::RawValue;

/// Renders a raw JSON numeric token as a plain decimal string.
///
/// The token is first parsed as an unsigned 64-bit integer. Tokens that do not
/// fit (exponent notation, fractions, negatives) are parsed as `f64` and
/// rendered fixed-point with no decimals. Anything else is kept verbatim.
/// A quoted token is returned unquoted and `null` yields `None`.
///
/// # Examples
///
/// ```
/// use isard_provider::isard::json::normalize_metadata_id;
///
/// assert_eq!(normalize_metadata_id("1.23e20").as_deref(), Some("123000000000000000000"));
/// ```
///
pub fn normalize_metadata_id(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() || token == "null" {
        return None;
    }
    if token.starts_with('"') {
        return serde_json::from_str::<String>(token).ok();
    }

    if let Ok(value) = token.parse::<u64>() {
        return Some(value.to_string());
    }
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(format!("{:.0}", value)),
        _ => Some(token.to_owned()),
    }
}

/// Deserializes a metadata ID from its raw token, see [`normalize_metadata_id`].
///
pub fn metadata_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Box<RawValue>>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| normalize_metadata_id(raw.get())))
}

/// Deserializes any value into `T`, falling back to `None` when the shape does
/// not match instead of failing the whole record.
///
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Deserializes an integer that may have been encoded as a float.
///
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|number| number as i64)))
}

/// Treats an explicit `null` as the type's default value.
///
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// -----------------------------------------------------------------------------

/// Boolean-like field that the API reports as a JSON boolean, a number, or not
/// at all.
///
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "Value")]
pub enum FlexBool {
    Bool(bool),
    Number(f64),
    #[default]
    Absent,
}

impl FlexBool {
    /// Coerces the field: booleans as-is, numbers are `true` when non-zero,
    /// everything else is `false`.
    ///
    pub fn as_bool(self) -> bool {
        match self {
            FlexBool::Bool(value) => value,
            FlexBool::Number(value) => value != 0.0,
            FlexBool::Absent => false,
        }
    }
}

/// Serializes the coerced value, so consumers always see a JSON boolean.
impl Serialize for FlexBool {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.as_bool())
    }
}

impl From<Value> for FlexBool {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(value) => FlexBool::Bool(value),
            Value::Number(number) => number.as_f64().map_or(FlexBool::Absent, FlexBool::Number),
            _ => FlexBool::Absent,
        }
    }
}
