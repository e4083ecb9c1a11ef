//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - domain-level errors
//! - [`duration`] - serde helpers for second-granularity durations

pub mod duration;
pub mod error;
