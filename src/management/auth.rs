use std::{fs, path::PathBuf};

use chrono::Utc;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::{Error, Res, config, types::Token};

/// Seconds before the real expiry at which a token is already refreshed.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            path: Self::token_path(),
        }
    }

    pub fn load() -> Res<Self> {
        Self::load_from(Self::token_path())
    }

    pub fn load_from(path: PathBuf) -> Res<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            Error::Auth(format!(
                "cannot read token at {} ({}). Please run bpmcli auth",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, path })
    }

    pub fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it
    /// is about to expire.
    pub fn get_valid_token(&mut self, client: &Client) -> Res<String> {
        if self.is_expired() {
            self.token = self.refresh_token(client)?;
            self.persist()?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn refresh_token(&self, client: &Client) -> Res<Token> {
        let client_id = config::spotify_client_id()?;
        let res = client
            .post(config::spotify_apitoken_url())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", client_id.as_str()),
            ])
            .send()?;

        if !res.status().is_success() {
            return Err(Error::Auth(format!(
                "token refresh failed with status {}. Please run bpmcli auth",
                res.status()
            )));
        }

        let json: Value = res.json()?;
        let access_token = json["access_token"]
            .as_str()
            .ok_or_else(|| Error::Auth("token refresh returned no access token".to_string()))?;

        Ok(Token {
            access_token: access_token.to_string(),
            // Spotify may or may not rotate the refresh token
            refresh_token: json["refresh_token"]
                .as_str()
                .unwrap_or(&self.token.refresh_token)
                .to_string(),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_u64().unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
