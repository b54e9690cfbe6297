//! Multi-source job search aggregation with resume matching.
//!
//! Boards and company ATS pages are fetched concurrently and folded into
//! one normalized, URL-deduplicated job list; a resume's plain text is
//! scored against each job to produce a ranked match list, optionally
//! driving automated applications. Persistence and notification delivery
//! sit behind the [`store::JobStore`] and [`notify::Notifier`] traits.

pub mod aggregator;
pub mod catalog;
pub mod collectors;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod routes;
pub mod store;
pub mod text;
