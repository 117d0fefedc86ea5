//! HTTP client for the upstream clan API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::{decode_battle_log, ClanDataSource, FetchError};
use crate::config::UpstreamConfig;
use crate::models::{
    BattleRecord, ClanMember, ClanMembersResponse, ClanProfile, CurrentRiverRace, PlayerProfile,
    Tag, WarLogPage,
};

/// Typed client over the upstream REST API.
pub struct ClanApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ClanApiClient {
    /// Create a client from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        Url::parse(&config.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("wincon/0.1.0")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token().map(str::to_string),
        })
    }

    /// Build an absolute URL for `path` (which starts with `/`).
    fn url(&self, path: &str) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    fn clan_url(&self, tag: &Tag, suffix: &str) -> Result<Url, FetchError> {
        self.url(&format!("/clans/{}{}", tag.to_path_segment(), suffix))
    }

    fn player_url(&self, tag: &Tag, suffix: &str) -> Result<Url, FetchError> {
        self.url(&format!("/players/{}{}", tag.to_path_segment(), suffix))
    }

    fn war_log_url(&self, tag: &Tag, after: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self.clan_url(tag, "/riverracelog")?;
        if let Some(cursor) = after {
            url.query_pairs_mut().append_pair("after", cursor);
        }
        Ok(url)
    }

    /// GET `url` and return the body; `Ok(None)` on 404.
    async fn get_text_optional(&self, url: &Url) -> Result<Option<String>, FetchError> {
        debug!("Fetching {}", url);

        let mut request = self.client.get(url.as_str());
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} returned 404", url);
            return Ok(None);
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(Some(response.text().await?))
    }

    async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<Option<T>, FetchError> {
        match self.get_text_optional(url).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        self.get_json_optional(url)
            .await?
            .ok_or_else(|| FetchError::HttpStatus {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: format!("Not Found: {}", url),
            })
    }
}

#[async_trait]
impl ClanDataSource for ClanApiClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn clan(&self, tag: &Tag) -> Result<ClanProfile, FetchError> {
        self.get_json(&self.clan_url(tag, "")?).await
    }

    async fn members(&self, tag: &Tag) -> Result<Vec<ClanMember>, FetchError> {
        let response: ClanMembersResponse = self.get_json(&self.clan_url(tag, "/members")?).await?;
        Ok(response.items)
    }

    async fn river_race_log(
        &self,
        tag: &Tag,
        after: Option<&str>,
    ) -> Result<Option<WarLogPage>, FetchError> {
        self.get_json_optional(&self.war_log_url(tag, after)?).await
    }

    async fn current_river_race(&self, tag: &Tag) -> Result<Option<CurrentRiverRace>, FetchError> {
        self.get_json_optional(&self.clan_url(tag, "/currentriverrace")?)
            .await
    }

    async fn player(&self, tag: &Tag) -> Result<PlayerProfile, FetchError> {
        self.get_json(&self.player_url(tag, "")?).await
    }

    async fn battle_log(&self, tag: &Tag) -> Result<Vec<BattleRecord>, FetchError> {
        match self
            .get_text_optional(&self.player_url(tag, "/battlelog")?)
            .await?
        {
            Some(body) => decode_battle_log(&body),
            None => Ok(Vec::new()),
        }
    }
}
