//! Command implementations for the fantasy sync CLI

pub mod import_leagues;
pub mod import_players;
pub mod import_stats;

use crate::cli::types::Guid;
use crate::error::{Result, SyncError};
use crate::GUID_ENV_VAR;

/// Resolve the user GUID from the flag or the environment.
pub fn resolve_guid(guid: Option<Guid>) -> Result<Guid> {
    if let Some(guid) = guid {
        return Ok(guid);
    }

    match std::env::var(GUID_ENV_VAR) {
        Ok(value) if !value.is_empty() => Ok(Guid::new(value)),
        _ => Err(SyncError::MissingGuid {
            env_var: GUID_ENV_VAR.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_guid_prefers_flag() {
        let resolved = resolve_guid(Some(Guid::new("FLAG"))).unwrap();
        assert_eq!(resolved.as_str(), "FLAG");
    }
}
