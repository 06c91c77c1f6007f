//! Account identities and their display form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StakeCalError;

/// Characters kept on each side when shortening an identity for display.
pub const DEFAULT_VISIBLE_CHARS: usize = 6;

const SEPARATOR: &str = "...";

/// A ledger-level account address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl Into<String>) -> Result<Self, StakeCalError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StakeCalError::InvalidIdentity(raw));
        }
        Ok(Identity(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Addresses carry checksum casing, so two spellings of the same account
    /// may differ only in case.
    pub fn matches(&self, other: &Identity) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    pub fn short(&self) -> String {
        shorten(&self.0, DEFAULT_VISIBLE_CHARS)
    }
}

/// Shorten `identity` to `visible_chars` on each side joined by "...".
/// Identities no longer than `2 * visible_chars` are returned unchanged.
pub fn shorten(identity: &str, visible_chars: usize) -> String {
    let chars: Vec<char> = identity.chars().collect();

    if chars.len() <= visible_chars * 2 {
        return identity.to_string();
    }

    let head: String = chars[..visible_chars].iter().collect();
    let tail: String = chars[chars.len() - visible_chars..].iter().collect();
    format!("{head}{SEPARATOR}{tail}")
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = StakeCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = StakeCalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identity::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADDRESS: &str = "0x88751b2Be2578825E8b7662d74f63639D0C10222";

    #[test]
    fn shortens_full_address_to_fifteen_chars() {
        assert_eq!(ADDRESS.len(), 42);
        let short = shorten(&ADDRESS[2..], DEFAULT_VISIBLE_CHARS);
        assert_eq!(short.len(), 15);
        assert_eq!(short, "88751b...C10222");

        assert_eq!(shorten(ADDRESS, 6), "0x8875...C10222");
    }

    #[test]
    fn short_identities_are_unchanged() {
        assert_eq!(shorten("0xabc", 6), "0xabc");
        assert_eq!(shorten("abcdefghijkl", 6), "abcdefghijkl");
        assert_eq!(shorten("abcdefghijklm", 6), "abcdef...hijklm");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(shorten("", 6), "");
        assert_eq!(shorten("", 0), "");
    }

    #[test]
    fn identity_rejects_blank() {
        assert!(Identity::new("").is_err());
        assert!(Identity::new("   ").is_err());
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
    }

    #[test]
    fn matches_ignores_checksum_casing() {
        let checksummed = Identity::new(ADDRESS).unwrap();
        let lower = Identity::new(ADDRESS.to_lowercase()).unwrap();
        assert!(checksummed.matches(&lower));
        assert_ne!(checksummed, lower);
        assert_eq!(checksummed.short(), "0x8875...C10222");
    }
}
