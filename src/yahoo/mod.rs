//! Yahoo Fantasy API adapter.
//!
//! Implements the provider and credential ports against the Yahoo
//! Fantasy v2 JSON endpoints. League-level fetches run on the adapter's
//! own client; catalog and stat fetches run on the per-user client the
//! credential port produced.

pub mod http;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;

use crate::cli::types::{GameId, Guid, LeagueKey, PlayerKey, Week};
use crate::error::{Result, SyncError};
use crate::provider::{
    CredentialPort, LeagueProvider, LeagueRef, LeagueSettingsRecord, OAuthToken,
    PlayerSeasonRecord, PlayerStatRecord, TeamRecord,
};

/// Env var consulted when no OAuth token is supplied explicitly.
pub const TOKEN_ENV_VAR: &str = "YAHOO_FANTASY_TOKEN";

/// Yahoo Fantasy implementation of [`LeagueProvider`].
pub struct YahooProvider {
    client: Client,
}

impl YahooProvider {
    /// Create a provider with its own client for league-level fetches.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LeagueProvider for YahooProvider {
    async fn fetch_user_leagues(&self, guid: &Guid) -> Result<Vec<LeagueRef>> {
        http::get_user_leagues(&self.client, guid).await
    }

    async fn fetch_league_settings(&self, key: &LeagueKey) -> Result<LeagueSettingsRecord> {
        http::get_league_settings(&self.client, key).await
    }

    async fn fetch_league_standings(&self, key: &LeagueKey) -> Result<Vec<TeamRecord>> {
        http::get_league_standings(&self.client, key).await
    }

    async fn fetch_players_page(
        &self,
        client: &Client,
        game_id: GameId,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<PlayerSeasonRecord>> {
        http::get_players_page(client, game_id, offset, limit).await
    }

    async fn fetch_player_stats(
        &self,
        client: &Client,
        player_key: &PlayerKey,
        week: Week,
    ) -> Result<Vec<PlayerStatRecord>> {
        http::get_player_stats(client, player_key, week).await
    }
}

/// Credential port backed by the `YAHOO_FANTASY_TOKEN` env var.
///
/// Single-user CLI mode: every GUID resolves to the one configured
/// token. A multi-user deployment substitutes a token-store
/// implementation of [`CredentialPort`].
pub struct EnvCredentials;

#[async_trait]
impl CredentialPort for EnvCredentials {
    async fn get_user_oauth_token(&self, _guid: &Guid) -> Result<OAuthToken> {
        let access_token = std::env::var(TOKEN_ENV_VAR).map_err(|_| SyncError::MissingToken {
            env_var: TOKEN_ENV_VAR.to_string(),
        })?;

        Ok(OAuthToken {
            access_token,
            refresh_token: String::new(),
        })
    }

    async fn exchange_token_for_client(&self, token: &OAuthToken) -> Result<Client> {
        client_for_token(token)
    }
}

/// Build an HTTP client that sends the token as a bearer credential.
pub fn client_for_token(token: &OAuthToken) -> Result<Client> {
    let mut headers = HeaderMap::new();
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    Ok(Client::builder().default_headers(headers).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_for_token() {
        let token = OAuthToken {
            access_token: "abc123".to_string(),
            refresh_token: String::new(),
        };
        assert!(client_for_token(&token).is_ok());
    }

    #[test]
    fn test_client_for_token_rejects_bad_token() {
        let token = OAuthToken {
            access_token: "abc\n123".to_string(),
            refresh_token: String::new(),
        };
        assert!(client_for_token(&token).is_err());
    }
}
