//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod session_observer;
pub mod transcript_store;
pub mod voice_adapter;
