//! Jikan API v4 client implementation.
//!
//! This module provides a rate-limited, retry-enabled client for interacting
//! with the Jikan API (MyAnimeList unofficial API), plus the classifier that
//! turns fetch failures into user-facing errors.

pub mod classify;
pub mod client;
pub mod error;
pub mod fetcher;
pub mod query;
pub mod rate_gate;
pub mod transport;
pub mod types;

pub use classify::{classify, ApiError};
pub use client::JikanClient;
pub use error::{ClassifiedError, ErrorKind, FetchError, TransportError};
pub use fetcher::{Fetcher, RetryPolicy, MAX_RETRIES, RATE_LIMIT_DELAY};
pub use query::{AnimeQuery, Endpoints, OrderBy, SortDirection};
pub use rate_gate::{RateGate, MIN_REQUEST_DELAY};
pub use transport::{FetchRequest, HttpTransport, RawResponse, RequestOptions, Transport};
pub use types::*;
