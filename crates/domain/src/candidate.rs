//! Candidate — a discoverable remote wireless peripheral.
//!
//! Candidates are created from discovery events, deduplicated by identity
//! for the duration of one scan pass, and discarded when a new scan starts
//! or one of them is selected for connection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque peripheral identity — a link-layer address or platform-assigned
/// handle, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(String);

impl CandidateId {
    /// Wrap a platform-assigned identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// A peripheral seen during a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Platform-assigned identity, unique within one scan pass.
    pub id: CandidateId,
    /// Advertised display name, when present.
    pub name: Option<String>,
    /// Signal strength at discovery time, when reported.
    pub rssi: Option<i16>,
}

impl Candidate {
    /// Create a candidate from a discovery event.
    #[must_use]
    pub fn new(id: CandidateId, name: Option<String>, rssi: Option<i16>) -> Self {
        Self { id, name, rssi }
    }

    /// Case-insensitive substring match of the advertised name against an
    /// auto-connect tag. An unnamed candidate never matches.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&tag.to_lowercase()))
    }

    /// Human-readable label for status lines.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} ({})", self.id),
            None => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: Option<&str>) -> Candidate {
        Candidate::new(
            CandidateId::from("AA:BB:CC:DD:EE:FF"),
            name.map(str::to_owned),
            Some(-60),
        )
    }

    #[test]
    fn should_match_exact_tag() {
        assert!(candidate(Some("HC-08")).matches_tag("HC-08"));
    }

    #[test]
    fn should_match_tag_case_insensitively() {
        assert!(candidate(Some("hc-08")).matches_tag("HC-08"));
        assert!(candidate(Some("HC-08")).matches_tag("hc-08"));
    }

    #[test]
    fn should_match_tag_as_substring() {
        assert!(candidate(Some("Bedroom HC-08 v2")).matches_tag("HC-08"));
    }

    #[test]
    fn should_not_match_different_name() {
        assert!(!candidate(Some("HM-10")).matches_tag("HC-08"));
    }

    #[test]
    fn should_not_match_unnamed_candidate() {
        assert!(!candidate(None).matches_tag("HC-08"));
    }

    #[test]
    fn should_label_with_name_and_id() {
        assert_eq!(
            candidate(Some("HC-08")).label(),
            "HC-08 (AA:BB:CC:DD:EE:FF)"
        );
    }

    #[test]
    fn should_label_with_id_only_when_unnamed() {
        assert_eq!(candidate(None).label(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn should_roundtrip_candidate_through_serde_json() {
        let original = candidate(Some("HC-08"));
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Candidate = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }
}
