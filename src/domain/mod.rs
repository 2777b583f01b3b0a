//! Domain layer: click statistics entities and the storage contract.
//!
//! # Modules
//!
//! - [`entities`] - Device types, aggregate statistics, increments
//! - [`repositories`] - The [`repositories::StatsRepository`] trait
//! - [`click_event`] - A click captured at redirect time
//! - [`click_worker`] - Background worker applying queued clicks
//!
//! # Click Processing Flow
//!
//! 1. The caller reports a click through the stats service
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`click_worker::run_click_worker`] turns it into an increment and retries transient failures
//! 4. The backend applies the increment atomically via [`repositories::StatsRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
