//! String key types for provider-assigned resource keys.
//!
//! The provider addresses leagues, teams and players with dotted string
//! keys scoped by game (e.g. `390.l.12345`, `390.l.12345.t.3`,
//! `390.p.30123`) and identifies user accounts with an opaque GUID.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

macro_rules! string_key {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> std::result::Result<Self, Infallible> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_key! {
    /// Opaque provider GUID identifying a user account.
    Guid
}

string_key! {
    /// Game-scoped league key, e.g. `390.l.12345`.
    LeagueKey
}

string_key! {
    /// League-scoped team key, e.g. `390.l.12345.t.3`.
    TeamKey
}

string_key! {
    /// Game-scoped player key, e.g. `390.p.30123`.
    PlayerKey
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        let key = LeagueKey::new("390.l.12345");
        assert_eq!(key.as_str(), "390.l.12345");
        assert_eq!(key.to_string(), "390.l.12345");
        assert_eq!("390.l.12345".parse::<LeagueKey>().unwrap(), key);
    }

    #[test]
    fn test_guid_from_str_slice() {
        let guid: Guid = "JT4FACLQZI2OCE".into();
        assert_eq!(guid.as_str(), "JT4FACLQZI2OCE");
    }
}
