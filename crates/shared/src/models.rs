//! Display models for the anime browser.
//!
//! These are simplified views of Jikan API payloads, shaped for listing
//! cards, detail pages, and episode lists.

use serde::{Deserialize, Serialize};

/// Simplified anime used for listing cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeCard {
    pub id: u32,
    pub title: String,
    pub image_url: String,
    pub image_url_small: String,
    pub image_url_large: String,
    pub anime_type: String, // TV, Movie, OVA, etc. ("Unknown" when absent)
    pub episodes: Option<u32>,
    pub year: Option<u32>,
    pub score: Option<f64>,
    pub genres: Vec<GenreTag>,
}

/// Genre reference attached to a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreTag {
    pub mal_id: u32,
    pub name: String,
    pub genre_type: String,
    pub url: String,
}

/// Complete anime for the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeDetail {
    pub id: u32,

    // Titles
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,

    // Images
    pub image_url: String,
    pub image_url_large: String,

    pub synopsis: Option<String>,
    pub anime_type: Option<String>,
    pub episodes: Option<u32>,
    pub status: Option<String>,
    pub score: Option<f64>,
    pub year: Option<u32>,
    pub season: Option<String>,

    // Names only
    pub genres: Vec<String>,
    pub studios: Vec<String>,

    pub aired: AiredRange,
}

/// Raw aired dates as reported upstream (ISO 8601)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiredRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Simplified episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub title: String,
    pub title_japanese: Option<String>,
    pub aired: Option<String>,
    pub duration: Option<u32>,
    pub filler: bool,
    pub recap: bool,
}

/// Pagination state for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub items_per_page: u32,
}
