//! studymap-core: the study-roadmap engine.
//!
//! Free text goes in, a structured plan comes out. The pipeline is
//! classification ([`classify`]) over a curated keyword dictionary
//! ([`lexicon`]), template resolution ([`templates`]), and synthesis
//! ([`synthesize`]) into the [`model`] types. Progress lives in
//! [`progress`] as pure toggles, and [`chat`] layers a conversational
//! front door over the same engine with an optional live backend from
//! [`completion`].
//!
//! Everything here is storage-agnostic; persistence is a separate crate.

pub mod chat;
pub mod classify;
pub mod completion;
pub mod lexicon;
pub mod model;
pub mod progress;
pub mod synthesize;
pub mod templates;

pub use chat::ChatRouter;
pub use classify::classify;
pub use completion::{ChatMessage, Completion, CompletionError, Role};
pub use model::{CanonicalTarget, Category, Period, PlanMode, Roadmap, SubItem};
pub use progress::{toggle, ItemSelector, ToggleError};
pub use synthesize::{from_target, synthesize, synthesize_with_latency};
