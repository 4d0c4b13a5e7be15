//! Conversion from Jikan payloads to display models, plus formatting helpers.

use crate::api::types::{ImageSet, JikanAnime, JikanEpisode, Pagination};
use chrono::{DateTime, Datelike, NaiveDate};
use shared::{AiredRange, AnimeCard, AnimeDetail, Episode, GenreTag, PaginationState};

/// Placeholder for missing dates and durations
pub const UNKNOWN_LABEL: &str = "Desconocida";

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

fn image(url: &Option<String>) -> String {
    url.clone().unwrap_or_default()
}

fn jpg(anime: &JikanAnime) -> &ImageSet {
    &anime.images.jpg
}

pub fn to_anime_card(anime: &JikanAnime) -> AnimeCard {
    let images = jpg(anime);
    AnimeCard {
        id: anime.mal_id,
        title: anime.title.clone(),
        image_url: image(&images.image_url),
        image_url_small: image(&images.small_image_url),
        image_url_large: image(&images.large_image_url),
        anime_type: anime
            .anime_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        episodes: anime.episodes,
        year: anime.year,
        score: anime.score,
        genres: anime
            .genres
            .iter()
            .map(|g| GenreTag {
                mal_id: g.mal_id,
                name: g.name.clone(),
                genre_type: g.entity_type.clone(),
                url: g.url.clone(),
            })
            .collect(),
    }
}

pub fn to_anime_detail(anime: &JikanAnime) -> AnimeDetail {
    let images = jpg(anime);
    AnimeDetail {
        id: anime.mal_id,
        title: anime.title.clone(),
        title_english: anime.title_english.clone(),
        title_japanese: anime.title_japanese.clone(),
        image_url: image(&images.image_url),
        image_url_large: image(&images.large_image_url),
        synopsis: anime.synopsis.clone(),
        anime_type: anime.anime_type.clone(),
        episodes: anime.episodes,
        status: anime.status.clone(),
        score: anime.score,
        year: anime.year,
        season: anime.season.clone(),
        genres: anime.genres.iter().map(|g| g.name.clone()).collect(),
        studios: anime.studios.iter().map(|s| s.name.clone()).collect(),
        aired: anime
            .aired
            .as_ref()
            .map(|a| AiredRange {
                from: a.from.clone(),
                to: a.to.clone(),
            })
            .unwrap_or_default(),
    }
}

pub fn to_episode(episode: &JikanEpisode) -> Episode {
    Episode {
        id: episode.mal_id,
        title: episode.title.clone(),
        title_japanese: episode.title_japanese.clone(),
        aired: episode.aired.clone(),
        duration: episode.duration,
        filler: episode.filler,
        recap: episode.recap,
    }
}

pub fn to_pagination_state(pagination: &Pagination, items_per_page: u32) -> PaginationState {
    PaginationState {
        current_page: pagination.current_page,
        total_pages: pagination.last_visible_page,
        has_next_page: pagination.has_next_page,
        items_per_page: pagination
            .items
            .as_ref()
            .map(|items| items.per_page)
            .unwrap_or(items_per_page),
    }
}

/// Parse an ISO 8601 timestamp or plain date
fn parse_date(value: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

/// Long Spanish date, e.g. "3 de abril de 1998"
pub fn format_date(value: Option<&str>) -> String {
    match value.and_then(parse_date) {
        Some(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS_ES[date.month0() as usize],
            date.year()
        ),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// Minutes as "N min", "Nh" or "Nh Mmin"
pub fn format_duration(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => UNKNOWN_LABEL.to_string(),
        Some(m) if m < 60 => format!("{m} min"),
        Some(m) if m % 60 == 0 => format!("{}h", m / 60),
        Some(m) => format!("{}h {}min", m / 60, m % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AnimeListResponse, PaginatedResponse};

    fn sample() -> AnimeListResponse {
        serde_json::from_str(
            r#"{
            "pagination": {"last_visible_page": 12, "has_next_page": true, "current_page": 2,
                           "items": {"count": 24, "total": 280, "per_page": 24}},
            "data": [{
                "mal_id": 52991, "url": "https://myanimelist.net/anime/52991",
                "images": {"jpg": {"image_url": "f.jpg", "small_image_url": null, "large_image_url": "fl.jpg"}},
                "title": "Sousou no Frieren", "title_english": "Frieren: Beyond Journey's End",
                "title_japanese": null, "type": null, "source": "Manga", "episodes": 28,
                "status": "Finished Airing", "duration": "24 min per ep", "rating": null,
                "score": 9.3, "scored_by": null, "rank": 1, "popularity": 150, "members": null,
                "favorites": null, "synopsis": "After the party of heroes defeated the Demon King...",
                "background": null, "season": "fall", "year": 2023,
                "aired": {"from": "2023-09-29T00:00:00+00:00", "to": "2024-03-22T00:00:00+00:00"},
                "studios": [{"mal_id": 11, "type": "anime", "name": "Madhouse", "url": "s"}],
                "genres": [{"mal_id": 2, "type": "anime", "name": "Adventure", "url": "g2"},
                           {"mal_id": 10, "type": "anime", "name": "Fantasy", "url": "g10"}]
            }]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_card_fills_defaults() {
        let list = sample();
        let card = to_anime_card(&list.data[0]);

        assert_eq!(card.id, 52991);
        assert_eq!(card.anime_type, "Unknown");
        assert_eq!(card.image_url, "f.jpg");
        assert_eq!(card.image_url_small, "");
        assert_eq!(card.genres.len(), 2);
        assert_eq!(card.genres[1].name, "Fantasy");
    }

    #[test]
    fn test_detail_flattens_names() {
        let list = sample();
        let detail = to_anime_detail(&list.data[0]);

        assert_eq!(detail.genres, vec!["Adventure", "Fantasy"]);
        assert_eq!(detail.studios, vec!["Madhouse"]);
        assert_eq!(detail.aired.from.as_deref(), Some("2023-09-29T00:00:00+00:00"));
        assert_eq!(detail.anime_type, None);
    }

    #[test]
    fn test_pagination_state() {
        let list: PaginatedResponse<_> = sample();
        let state = to_pagination_state(&list.pagination, 10);

        assert_eq!(state.current_page, 2);
        assert_eq!(state.total_pages, 12);
        assert!(state.has_next_page);
        assert_eq!(state.items_per_page, 24);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(Some("1998-04-03T00:00:00+00:00")), "3 de abril de 1998");
        assert_eq!(format_date(Some("2023-12-25")), "25 de diciembre de 2023");
        assert_eq!(format_date(Some("soon")), UNKNOWN_LABEL);
        assert_eq!(format_date(None), UNKNOWN_LABEL);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), UNKNOWN_LABEL);
        assert_eq!(format_duration(Some(0)), UNKNOWN_LABEL);
        assert_eq!(format_duration(Some(24)), "24 min");
        assert_eq!(format_duration(Some(120)), "2h");
        assert_eq!(format_duration(Some(95)), "1h 35min");
    }
}
