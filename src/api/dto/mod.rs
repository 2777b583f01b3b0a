//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex for short link identifiers.
pub(crate) static SHORT_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

pub mod attribution;
pub mod clicks;
pub mod health;
pub mod stats;
