use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a trading house in the credit network.
///
/// House codes are short, case-insensitive mnemonics. They are normalized to
/// upper case on construction so that `"gfi"` and `"GFI"` name the same house.
///
/// # Examples
///
/// ```
/// use creditline_engine::core::house::HouseId;
///
/// let a = HouseId::new("tullett");
/// let b = HouseId::new("TULLETT");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "TULLETT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HouseId(String);

impl HouseId {
    /// Create a house identifier, trimming whitespace and upper-casing it.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_uppercase())
    }

    /// The normalized house code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HouseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for HouseId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<HouseId> for String {
    fn from(id: HouseId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_house_normalized() {
        assert_eq!(HouseId::new(" icap "), HouseId::new("ICAP"));
        assert_eq!(HouseId::new("icap").as_str(), "ICAP");
    }

    #[test]
    fn test_house_display() {
        let h = HouseId::new("bgc");
        assert_eq!(format!("{}", h), "BGC");
    }

    #[test]
    fn test_house_deserialize_normalizes() {
        let h: HouseId = serde_json::from_str("\"tradition\"").unwrap();
        assert_eq!(h, HouseId::new("TRADITION"));
        assert_eq!(serde_json::to_string(&h).unwrap(), "\"TRADITION\"");
    }
}
