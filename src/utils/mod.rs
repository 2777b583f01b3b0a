//! Utility helpers shared across layers.
//!
//! - [`short_url`] - Short link extraction from referrer URLs

pub mod short_url;
