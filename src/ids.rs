//! Correlation ids for dispatches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Identifies one dispatch in the logs.
///
/// Every event emitted while a request is resolved and invoked carries it
/// through the `dispatch` span. Serialized as its 26-character ULID text.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExchangeId(Ulid);

impl ExchangeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Adopt an id minted by the embedding transport when it is a valid ULID.
    #[must_use]
    pub fn adopt_or_new(candidate: Option<&str>) -> Self {
        candidate
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Milliseconds since the Unix epoch at which the id was minted.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Ulid> for ExchangeId {
    fn from(id: Ulid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ExchangeId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

impl TryFrom<String> for ExchangeId {
    type Error = ulid::DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ExchangeId> for String {
    fn from(id: ExchangeId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_form_is_a_ulid() {
        let id = ExchangeId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(text.parse::<ExchangeId>().unwrap(), id);
    }

    #[test]
    fn test_adopt_or_new() {
        let id = ExchangeId::new();
        let text = id.to_string();
        assert_eq!(ExchangeId::adopt_or_new(Some(&text)), id);
        assert_ne!(ExchangeId::adopt_or_new(Some("not-a-ulid")), id);
        assert_ne!(ExchangeId::adopt_or_new(None), id);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let ulid = Ulid::from_parts(1_700_000_000_000, 7);
        let id = ExchangeId::from(ulid);
        assert_eq!(id.timestamp_ms(), 1_700_000_000_000);
        assert!(ExchangeId::from(Ulid::from_parts(1_700_000_000_001, 0)) > id);
    }

    #[test]
    fn test_serde_as_string() {
        let id = ExchangeId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: ExchangeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ExchangeId>("\"nope\"").is_err());
    }
}
