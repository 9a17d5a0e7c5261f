// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Spotify Web API.
//!
//! Handles client-credentials authentication, query construction, and one
//! retry for transient failures (429, 500, 502, 503) or a rejected token.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use sonaryx_core::SonaryxError;
use tracing::{debug, warn};

use crate::auth::TokenCache;
use crate::types::{ApiAlbum, ApiArtist, ApiErrorBody, ApiErrorResponse, Paging, SearchResponse, TokenResponse};

const API_BASE_URL: &str = "https://api.spotify.com/v1";
const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Release groups requested when listing an artist's catalog.
const INCLUDE_GROUPS: &str = "album,single,compilation";

/// Maximum page size for the artist albums endpoint.
const ALBUM_PAGE_LIMIT: &str = "50";

/// Spotify Web API client.
#[derive(Debug)]
pub struct SpotifyClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    api_base: String,
    accounts_base: String,
    token: TokenCache,
    max_retries: u32,
}

impl SpotifyClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, SonaryxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SonaryxError::Catalog {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            client_id,
            client_secret,
            api_base: API_BASE_URL.to_string(),
            accounts_base: ACCOUNTS_BASE_URL.to_string(),
            token: TokenCache::new(),
            max_retries: 1,
        })
    }

    /// Points both the API and the accounts service at `url` (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.api_base = format!("{url}/v1");
        self.accounts_base = url;
        self
    }

    /// A valid access token, requesting a new one when the cache is stale.
    pub async fn access_token(&self) -> Result<String, SonaryxError> {
        if let Some(token) = self.token.current().await {
            return Ok(token);
        }

        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SonaryxError::catalog(format!(
                "Spotify authentication failed: {}",
                describe_error(status, &body)
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| SonaryxError::Catalog {
            message: format!("failed to parse token response: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(expires_in = token.expires_in, "Spotify access token acquired");
        self.token
            .store(
                token.access_token.clone(),
                Duration::from_secs(token.expires_in),
            )
            .await;
        Ok(token.access_token)
    }

    /// Best matching artists for `name`.
    pub async fn search_artists(&self, name: &str, limit: u32) -> Result<Vec<ApiArtist>, SonaryxError> {
        let limit = limit.to_string();
        let response: Option<SearchResponse> = self
            .get_json("/search", &[("q", name), ("type", "artist"), ("limit", limit.as_str())])
            .await?;
        Ok(response.map(|r| r.artists.items).unwrap_or_default())
    }

    /// Artist by ID. `None` when Spotify answers 404 or 400 (malformed ID).
    pub async fn artist(&self, id: &str) -> Result<Option<ApiArtist>, SonaryxError> {
        self.get_json(&format!("/artists/{id}"), &[]).await
    }

    /// First page of the artist's albums, singles and compilations.
    pub async fn artist_albums(&self, artist_id: &str, market: &str) -> Result<Vec<ApiAlbum>, SonaryxError> {
        let page: Option<Paging<ApiAlbum>> = self
            .get_json(
                &format!("/artists/{artist_id}/albums"),
                &[
                    ("include_groups", INCLUDE_GROUPS),
                    ("market", market),
                    ("limit", ALBUM_PAGE_LIMIT),
                ],
            )
            .await?;
        Ok(page.map(|p| p.items).unwrap_or_default())
    }

    /// Full album detail.
    pub async fn album(&self, id: &str) -> Result<Option<ApiAlbum>, SonaryxError> {
        self.get_json(&format!("/albums/{id}"), &[]).await
    }

    /// GET `path` with `query`, decoding the body as `T`.
    ///
    /// Returns `Ok(None)` for 404 and 400 responses.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, SonaryxError> {
        let raw = format!("{}{path}", self.api_base);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        let url = parsed.map_err(|e| SonaryxError::Catalog {
            message: format!("invalid request URL for {path}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying Spotify request");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let token = self.access_token().await?;
            let response = self
                .http
                .get(url.clone())
                .bearer_auth(token)
                .send()
                .await
                .map_err(request_failed)?;

            let status = response.status();
            debug!(%status, path, attempt, "Spotify response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| SonaryxError::Catalog {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let parsed = serde_json::from_str(&body).map_err(|e| SonaryxError::Catalog {
                    message: format!("failed to parse Spotify response for {path}: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return Ok(Some(parsed));
            }

            if matches!(status, StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST) {
                return Ok(None);
            }

            let body = response.text().await.unwrap_or_default();
            let error = SonaryxError::catalog(describe_error(status, &body));

            if status == StatusCode::UNAUTHORIZED {
                self.token.invalidate().await;
            } else if !is_transient_error(status) {
                return Err(error);
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| {
            SonaryxError::catalog(format!("Spotify request to {path} failed after retries"))
        }))
    }
}

fn request_failed(e: reqwest::Error) -> SonaryxError {
    SonaryxError::Catalog {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

fn describe_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body).map(|e| e.error) {
        Ok(ApiErrorBody::Detailed { message, .. }) => format!("Spotify API error ({status}): {message}"),
        Ok(ApiErrorBody::Code(code)) => format!("Spotify API error ({status}): {code}"),
        Err(_) => format!("API returned {status}: {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> SpotifyClient {
        SpotifyClient::new("cid".into(), "secret".into())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    async fn mount_token(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            // base64("cid:secret")
            .and(header("authorization", "Basic Y2lkOnNlY3JldA=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn token_is_cached_across_requests() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "IVE"))
            .and(query_param("type", "artist"))
            .and(query_param("limit", "1"))
            .and(header("authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artists": {"items": [{"id": "ive", "name": "IVE"}], "total": 1}
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert_eq!(client.search_artists("IVE", 1).await.unwrap()[0].id, "ive");
        assert_eq!(client.search_artists("IVE", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn albums_request_uses_market_and_groups() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/artists/ive/albums"))
            .and(query_param("include_groups", "album,single,compilation"))
            .and(query_param("market", "KR"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{
                    "id": "a1", "name": "Switch", "release_date": "2024-04-29",
                    "album_type": "album", "total_tracks": 6
                }]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let albums = client.artist_albums("ive", "KR").await.unwrap();
        assert_eq!(albums[0].name, "Switch");
    }

    #[tokio::test]
    async fn not_found_maps_to_none() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/artists/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"status": 404, "message": "Resource not found"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.artist("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_token_is_refreshed_once() {
        let server = MockServer::start().await;
        mount_token(&server, 2).await;

        Mock::given(method("GET"))
            .and(path("/v1/albums/a1"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"status": 401, "message": "The access token expired"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/albums/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "a1", "name": "Switch", "release_date": "2024-04-29",
                "album_type": "album", "total_tracks": 6
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let album = client.album("a1").await.unwrap().unwrap();
        assert_eq!(album.total_tracks, 6);
    }

    #[tokio::test]
    async fn auth_failure_is_a_catalog_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "Invalid client secret"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.search_artists("IVE", 1).await.unwrap_err();
        assert!(matches!(err, SonaryxError::Catalog { .. }));
        assert!(err.to_string().contains("invalid_client"), "got: {err}");
    }

    #[tokio::test]
    async fn server_errors_exhaust_retries() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/albums/a1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.album("a1").await.unwrap_err();
        assert!(err.to_string().contains("503"), "got: {err}");
    }
}
