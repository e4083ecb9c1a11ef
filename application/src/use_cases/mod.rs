//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod convene_session;
pub mod dynamic_rounds;
pub mod round_orchestrator;
pub mod voice_manager;

#[cfg(test)]
pub(crate) mod testing;
