//! URL construction for Jikan endpoints.

use shared::config::ITEMS_PER_PAGE;
use thiserror::Error;
use url::{form_urlencoded, Url};

/// Sort key accepted by the anime search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Title,
    Score,
    Popularity,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Title => "title",
            OrderBy::Score => "score",
            OrderBy::Popularity => "popularity",
        }
    }
}

impl std::str::FromStr for OrderBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(OrderBy::Title),
            "score" => Ok(OrderBy::Score),
            "popularity" => Ok(OrderBy::Popularity),
            _ => Err(format!("invalid order: {} (expected title, score or popularity)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("invalid sort direction: {} (expected asc or desc)", s)),
        }
    }
}

/// Listing/search parameters for `GET /anime`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeQuery {
    pub page: u32,
    pub limit: u32,
    pub q: Option<String>,
    pub genres: Vec<u32>,
    pub themes: Vec<u32>,
    pub order_by: Option<OrderBy>,
    pub sort: SortDirection,
}

impl Default for AnimeQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: ITEMS_PER_PAGE,
            q: None,
            genres: Vec::new(),
            themes: Vec::new(),
            order_by: None,
            sort: SortDirection::default(),
        }
    }
}

impl AnimeQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
    }

    /// Number of active filters (search text counts once)
    pub fn active_filter_count(&self) -> usize {
        let search = usize::from(self.q.as_deref().is_some_and(|q| !q.is_empty()));
        search + self.genres.len() + self.themes.len()
    }

    /// Query pairs in the order Jikan documents them
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];

        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if !self.genres.is_empty() {
            pairs.push(("genres", join_ids(&self.genres)));
        }
        if !self.themes.is_empty() {
            pairs.push(("themes", join_ids(&self.themes)));
        }
        if let Some(order_by) = self.order_by {
            pairs.push(("order_by", order_by.as_str().to_string()));
            pairs.push(("sort", self.sort.as_str().to_string()));
        }

        pairs
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Invalid base URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid API base URL: {0}")]
pub struct InvalidBaseUrl(pub String);

/// Builds endpoint URLs under a fixed base
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Validated base, without trailing slash
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self, InvalidBaseUrl> {
        let base = base_url.trim_end_matches('/');
        let parsed = Url::parse(base).map_err(|e| InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base: base.to_string(),
        })
    }

    fn url(&self, path: &str, pairs: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}", self.base, path);
        if !pairs.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    pub fn anime_list(&self, query: &AnimeQuery) -> String {
        self.url("anime", &query.pairs())
    }

    pub fn anime_detail(&self, anime_id: u32) -> String {
        self.url(&format!("anime/{anime_id}"), &[])
    }

    pub fn anime_episodes(&self, anime_id: u32, page: u32) -> String {
        self.url(
            &format!("anime/{anime_id}/episodes"),
            &[("page", page.to_string())],
        )
    }

    pub fn episode_detail(&self, anime_id: u32, episode: u32) -> String {
        self.url(&format!("anime/{anime_id}/episodes/{episode}"), &[])
    }

    pub fn genres(&self) -> String {
        self.url("genres/anime", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> Endpoints {
        Endpoints::new("https://api.jikan.moe/v4").unwrap()
    }

    #[test]
    fn test_default_listing_url() {
        let url = endpoints().anime_list(&AnimeQuery::default());
        assert_eq!(url, "https://api.jikan.moe/v4/anime?page=1&limit=24");
    }

    #[test]
    fn test_filtered_listing_url() {
        let query = AnimeQuery {
            page: 2,
            q: Some("sousou no frieren".to_string()),
            genres: vec![1, 2],
            themes: vec![31],
            order_by: Some(OrderBy::Score),
            sort: SortDirection::Asc,
            ..Default::default()
        };

        let url = endpoints().anime_list(&query);
        assert_eq!(
            url,
            "https://api.jikan.moe/v4/anime?page=2&limit=24&q=sousou+no+frieren&genres=1%2C2&themes=31&order_by=score&sort=asc"
        );
        assert_eq!(query.active_filter_count(), 4);
    }

    #[test]
    fn test_sort_requires_order_by() {
        let query = AnimeQuery {
            sort: SortDirection::Asc,
            q: Some(String::new()),
            ..Default::default()
        };
        let pairs = query.pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "sort" && *k != "q"));
        assert_eq!(query.active_filter_count(), 0);
    }

    #[test]
    fn test_path_endpoints() {
        let endpoints = Endpoints::new("http://localhost:8080/v4/").unwrap();
        assert_eq!(endpoints.anime_detail(52991), "http://localhost:8080/v4/anime/52991");
        assert_eq!(
            endpoints.anime_episodes(21, 3),
            "http://localhost:8080/v4/anime/21/episodes?page=3"
        );
        assert_eq!(
            endpoints.episode_detail(21, 1000),
            "http://localhost:8080/v4/anime/21/episodes/1000"
        );
        assert_eq!(endpoints.genres(), "http://localhost:8080/v4/genres/anime");
    }

    #[test]
    fn test_rejects_invalid_base() {
        assert!(Endpoints::new("not a url").is_err());
        let err = Endpoints::new("mailto:someone@example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid API base URL: mailto:someone@example.com"
        );
    }

    #[test]
    fn test_parse_order_and_sort() {
        assert_eq!("popularity".parse::<OrderBy>(), Ok(OrderBy::Popularity));
        assert!("rank".parse::<OrderBy>().is_err());
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
    }
}
