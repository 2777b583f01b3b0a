//! Repository trait definitions for the domain layer.
//!
//! The traits here describe the contract a storage backend must uphold.
//! Concrete backends live in `crate::infrastructure::persistence`.
//!
//! # Available Repositories
//!
//! - [`StatsRepository`] - Atomic click increments and statistics reads
//!
//! # Testing
//!
//! A `mockall` mock is generated under `cfg(test)`; backend behavior is
//! covered by `tests/repository_*.rs`.

pub mod stats_repository;

pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use stats_repository::MockStatsRepository;
