//! Jikan API client with rate limiting and retry logic.

use super::classify::ApiError;
use super::fetcher::Fetcher;
use super::query::{AnimeQuery, Endpoints};
use super::rate_gate::RateGate;
use super::transport::{FetchRequest, HttpTransport, Transport};
use super::types::*;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Jikan API v4 client
pub struct JikanClient<T = HttpTransport> {
    /// Endpoint URL builder
    endpoints: Endpoints,
    /// Rate-limited, retrying fetcher
    fetcher: Fetcher<T>,
}

impl JikanClient<HttpTransport> {
    /// Create a client with its own rate gate
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        Self::with_gate(base_url, user_agent, Arc::new(RateGate::default()))
    }

    /// Create a client sharing an existing rate gate
    pub fn with_gate(base_url: &str, user_agent: &str, gate: Arc<RateGate>) -> Result<Self> {
        let transport = HttpTransport::new(user_agent).context("Failed to create HTTP client")?;
        Self::with_fetcher(base_url, Fetcher::new(transport, gate))
    }
}

impl<T: Transport> JikanClient<T> {
    /// Create a client around an existing fetcher
    pub fn with_fetcher(base_url: &str, fetcher: Fetcher<T>) -> Result<Self> {
        let endpoints = Endpoints::new(base_url)?;
        Ok(Self { endpoints, fetcher })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    /// Fetch a URL and classify any failure for display
    async fn get<P: DeserializeOwned>(&self, url: String) -> Result<P, ApiError> {
        let request = FetchRequest::get(url);
        self.fetcher
            .fetch_with_retry(&request)
            .await
            .map_err(ApiError::from)
    }

    /// Fetch a page of anime, optionally filtered and sorted
    pub async fn anime_list(&self, query: &AnimeQuery) -> Result<AnimeListResponse, ApiError> {
        info!(
            page = query.page,
            limit = query.limit,
            filters = query.active_filter_count(),
            "Fetching anime list"
        );
        self.get(self.endpoints.anime_list(query)).await
    }

    /// Fetch full anime details by MAL ID
    pub async fn anime_detail(&self, anime_id: u32) -> Result<JikanAnime, ApiError> {
        debug!(anime_id, "Fetching anime details");
        let response: AnimeDetailResponse = self.get(self.endpoints.anime_detail(anime_id)).await?;
        Ok(response.data)
    }

    /// Fetch a page of episodes for an anime
    pub async fn anime_episodes(
        &self,
        anime_id: u32,
        page: u32,
    ) -> Result<EpisodesResponse, ApiError> {
        debug!(anime_id, page, "Fetching anime episodes");
        self.get(self.endpoints.anime_episodes(anime_id, page)).await
    }

    /// Fetch a single episode with synopsis and filler/recap flags
    pub async fn episode_detail(
        &self,
        anime_id: u32,
        episode: u32,
    ) -> Result<JikanEpisode, ApiError> {
        debug!(anime_id, episode, "Fetching episode details");
        let response: EpisodeDetailResponse =
            self.get(self.endpoints.episode_detail(anime_id, episode)).await?;
        Ok(response.data)
    }

    /// Fetch the anime genre catalog
    pub async fn genres(&self) -> Result<Vec<JikanGenre>, ApiError> {
        info!("Fetching anime genres");
        let response: GenresResponse = self.get(self.endpoints.genres()).await?;
        Ok(response.data)
    }
}
