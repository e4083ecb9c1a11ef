//! Template domain
//!
//! Named, parameterized presets producing a ready-to-use
//! (config, voices, rounds) triple. Templates are pure data factories: they
//! never perform I/O.
//!
//! | name | shape |
//! |------|-------|
//! | `governance_decision` | quorum of 4+, ends with a decision round |
//! | `consciousness_exploration` | high threshold, warm voices, vision round |
//! | `code_review` | dedicated reviewer plus one voice per focus area |
//! | `ethics_review` | strict failure handling, long per-voice budgets |

pub mod code_review;
pub mod consciousness;
pub mod context;
pub mod ethics;
pub mod governance;
pub mod registry;

pub use context::{PROVIDER_OVERRIDE_KEY, TemplateContext};
pub use registry::{TemplateBuilder, TemplateRegistry};

use crate::round::RoundSpec;
use crate::session::{ParticipantSpec, SessionConfig};

/// A preset that yields a session request
pub trait Template: Send + Sync {
    /// Registry name
    fn name(&self) -> &str;

    fn get_config(&self) -> SessionConfig;

    fn get_voices(&self) -> Vec<ParticipantSpec>;

    fn get_rounds(&self) -> Vec<RoundSpec>;
}
