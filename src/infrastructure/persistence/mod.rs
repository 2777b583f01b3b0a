//! Statistics repository backends.
//!
//! Every backend implements [`crate::domain::repositories::StatsRepository`]
//! with its own atomic increment primitive.
//!
//! # Repositories
//!
//! - [`PgStatsRepository`] - PostgreSQL upserts inside a transaction
//! - [`RedisStatsRepository`] - Redis `MULTI`/`EXEC` of `HINCRBY` commands
//! - [`MemoryStatsRepository`] - In-process `DashMap` with per-key locking

pub mod memory_stats_repository;
pub mod pg_stats_repository;
pub mod redis_stats_repository;

pub use memory_stats_repository::MemoryStatsRepository;
pub use pg_stats_repository::PgStatsRepository;
pub use redis_stats_repository::RedisStatsRepository;
