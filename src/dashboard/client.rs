use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use urlencoding::encode;

use crate::api::models::{
    ApiReply, LoginRequest, LoginResponse, MatchCreate, MatchCreated, MatchOut, MessageResponse, Overview,
    ParticipationUpdate, PlayerCreate, PlayerMatchOut, PlayerOut, PlayerRename,
};
use crate::config::settings::DashboardSettings;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error text returned by the API, shown to the user as is.
    #[error("{0}")]
    Api(String),

    #[error("Could not reach the stats API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from the stats API ({status})")]
    Unexpected { status: StatusCode },
}

/// HTTP client for the stats API
#[derive(Clone)]
pub struct StatsClient {
    client: Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(settings: &DashboardSettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;

        Ok(Self {
            client,
            base_url: settings.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(self.client.post(self.url("/login")).json(&body)).await
    }

    pub async fn list_players(&self) -> Result<Vec<PlayerOut>, ClientError> {
        self.send(self.client.get(self.url("/players"))).await
    }

    pub async fn player_matches(&self, name: &str) -> Result<Vec<PlayerMatchOut>, ClientError> {
        let path = format!("/players/{}/matches", encode(name));
        self.send(self.client.get(self.url(&path))).await
    }

    pub async fn create_player(&self, name: &str) -> Result<MessageResponse, ClientError> {
        let body = PlayerCreate {
            name: name.to_string(),
        };
        self.send(self.client.post(self.url("/players")).json(&body)).await
    }

    pub async fn rename_player(&self, old_name: &str, new_name: &str) -> Result<MessageResponse, ClientError> {
        let path = format!("/players/{}", encode(old_name));
        let body = PlayerRename {
            name: new_name.to_string(),
        };
        self.send(self.client.put(self.url(&path)).json(&body)).await
    }

    pub async fn create_match(&self, payload: &MatchCreate) -> Result<MatchCreated, ClientError> {
        self.send(self.client.post(self.url("/matches")).json(payload)).await
    }

    pub async fn get_match(&self, match_id: i64) -> Result<MatchOut, ClientError> {
        let path = format!("/matches/{}", match_id);
        self.send(self.client.get(self.url(&path))).await
    }

    pub async fn delete_match(&self, match_id: i64, adjust_stats: bool) -> Result<MessageResponse, ClientError> {
        let path = format!("/matches/{}?adjust_stats={}", match_id, adjust_stats);
        self.send(self.client.delete(self.url(&path))).await
    }

    pub async fn update_participation(
        &self,
        match_id: i64,
        player_name: &str,
        update: &ParticipationUpdate,
    ) -> Result<MessageResponse, ClientError> {
        let path = format!("/matches/{}/players/{}", match_id, encode(player_name));
        self.send(self.client.put(self.url(&path)).json(update)).await
    }

    pub async fn overview(&self) -> Result<Overview, ClientError> {
        self.send(self.client.get(self.url("/admin/overview"))).await
    }

    // --- Helper Methods ---

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_reply(status, &body)
    }
}

fn decode_reply<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ClientError> {
    match serde_json::from_str::<ApiReply<T>>(body) {
        Ok(reply) => reply.into_result().map_err(ClientError::Api),
        Err(e) => {
            log::warn!("Undecodable API reply ({}): {} ({})", status, body, e);
            Err(ClientError::Unexpected { status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reply_payload() {
        let reply: MessageResponse = decode_reply(StatusCode::OK, r#"{"msg":"Player registered successfully."}"#).unwrap();
        assert_eq!(reply.msg, "Player registered successfully.");
    }

    #[test]
    fn test_decode_reply_error_payloads_are_verbatim() {
        let err = decode_reply::<MatchOut>(StatusCode::OK, r#"{"error":"Match not found"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Match not found");

        let err = decode_reply::<LoginResponse>(StatusCode::UNAUTHORIZED, r#"{"detail":"Invalid credentials"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_decode_reply_non_json() {
        let err = decode_reply::<Overview>(StatusCode::BAD_REQUEST, "Invalid URL").unwrap_err();
        assert!(matches!(err, ClientError::Unexpected { status } if status == StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_url_joins_base() {
        let settings = DashboardSettings::default().with_api_url(Some("http://stats:9000/".into()));
        let client = StatsClient::new(&settings).unwrap();

        assert_eq!(client.base_url(), "http://stats:9000");
        assert_eq!(client.url("/players"), "http://stats:9000/players");
    }
}
