//! PHID newtypes.
//!
//! Phabricator identifies every object with a `PHID-<TYPE>-<suffix>` token.
//! Each newtype only accepts tokens of its own object type, so a diff PHID can
//! never be handed to an API expecting a revision.

use crate::domain::error::StackError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref PHID_RE: Regex = Regex::new(r"^PHID-([A-Z]{4})-[A-Za-z0-9]+$").expect("phid regex");
}

fn parse_typed(value: &str, expected: &'static str) -> Result<String, StackError> {
    let trimmed = value.trim();
    let matches_type = PHID_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .is_some_and(|kind| kind.as_str() == expected);
    if matches_type {
        Ok(trimmed.to_string())
    } else {
        Err(StackError::InvalidPhid {
            value: value.to_string(),
            expected,
        })
    }
}

macro_rules! phid_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(value: &str) -> Result<Self, StackError> {
                parse_typed(value, $kind).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = StackError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = StackError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

phid_type!(
    /// Identity of a Differential revision (`PHID-DREV-…`).
    RevisionPhid,
    "DREV"
);

phid_type!(
    /// Identity of a single diff submitted to a revision (`PHID-DIFF-…`).
    DiffPhid,
    "DIFF"
);

phid_type!(
    /// Identity of a user account (`PHID-USER-…`).
    UserPhid,
    "USER"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_matching_type() {
        let phid = RevisionPhid::parse(" PHID-DREV-abc123 ").expect("valid revision phid");
        assert_eq!(phid.as_str(), "PHID-DREV-abc123");
        assert_eq!(phid.to_string(), "PHID-DREV-abc123");
    }

    #[test]
    fn test_parse_rejects_other_object_type() {
        let err = RevisionPhid::parse("PHID-DIFF-abc123").unwrap_err();
        assert!(matches!(err, StackError::InvalidPhid { expected: "DREV", .. }));
        assert!(DiffPhid::parse("PHID-DIFF-abc123").is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DiffPhid::parse("").is_err());
        assert!(DiffPhid::parse("D1234").is_err());
        assert!(DiffPhid::parse("PHID-DIFF-").is_err());
        assert!(DiffPhid::parse("PHID-DIFF-has space").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: RevisionPhid = serde_json::from_str("\"PHID-DREV-x1\"").unwrap();
        assert_eq!(ok.as_str(), "PHID-DREV-x1");
        assert!(serde_json::from_str::<RevisionPhid>("\"PHID-USER-x1\"").is_err());
    }
}
