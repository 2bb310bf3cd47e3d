//! Progression tracking for the discovery collection
//!
//! - **tracker** - per-session counts and achievement latches
//! - **evaluator** - pure unlock-transition evaluation
//! - **notify** - maps transition events to user-facing notification text

pub mod evaluator;
pub mod notify;
pub mod tracker;

pub use evaluator::{evaluate, UnlockTransition};
pub use notify::Notification;
pub use tracker::{CollectionEvent, ProgressionState};
