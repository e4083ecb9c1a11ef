//! Logging infrastructure: structured session event logs.
//!
//! Provides [`JsonlEventLog`], a JSONL file writer that implements the
//! [`SessionObserver`](council_application::SessionObserver) port.

mod jsonl_event_log;

pub use jsonl_event_log::JsonlEventLog;
