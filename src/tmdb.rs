use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::AppResult,
    models::{Credits, Movie, MovieId, SimilarMovies},
};

/// Client for the upstream movie metadata API.
///
/// Every lookup yields `Ok(None)` when the upstream answers with a non-2xx
/// status; transport and decode failures are returned as errors. Nothing is
/// retried.
pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    language: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        language: String,
        rps: u32,
    ) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("no TMDB_API_KEY provided, upstream calls will be rejected");
        }

        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        let limiter = Arc::new(RateLimiter::direct(quota));
        Self { client, api_key, base_url, language, limiter }
    }

    pub async fn fetch_movie(&self, movie_id: &MovieId) -> AppResult<Option<Movie>> {
        self.get_optional(&format!("movie/{movie_id}"), "movie").await
    }

    pub async fn fetch_credits(&self, movie_id: &MovieId) -> AppResult<Option<Credits>> {
        self.get_optional(&format!("movie/{movie_id}/credits"), "movie credits").await
    }

    pub async fn fetch_similar(&self, movie_id: &MovieId) -> AppResult<Option<SimilarMovies>> {
        self.get_optional(&format!("movie/{movie_id}/similar"), "similar movies").await
    }

    async fn get_optional<T: DeserializeOwned>(&self, path: &str, what: &str) -> AppResult<Option<T>> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .send()
            .await
            .inspect_err(|err| tracing::error!(path, error = %err, "error fetching {what}"))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<UpstreamError>()
                .await
                .ok()
                .and_then(|e| e.status_message)
                .unwrap_or_default();
            tracing::warn!(path, %status, status_message = %message, "error fetching {what}");
            return Ok(None);
        }

        Ok(Some(resp.json().await?))
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    status_message: Option<String>,
}
