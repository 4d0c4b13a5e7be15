//! Jikan API client for browsing anime metadata.
//!
//! This library provides a rate-gated, retrying fetch layer over the Jikan
//! API v4, a classifier that turns failures into user-facing errors, typed
//! endpoint access, and conversion into display models.

pub mod api;
pub mod transform;

pub use api::{
    classify, AnimeQuery, ApiError, ErrorKind, FetchError, FetchRequest, Fetcher, JikanClient,
    RateGate, RetryPolicy,
};
