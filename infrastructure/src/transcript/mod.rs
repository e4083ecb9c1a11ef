//! Transcript persistence
//!
//! Implements the [`TranscriptStore`](council_application::TranscriptStore)
//! port by writing one JSON document per session.

mod json_store;

pub use json_store::JsonTranscriptStore;
