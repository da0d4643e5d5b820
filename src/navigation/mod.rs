//! Navigation layer: the wall-seeking / wall-following state machine.
//!
//! - [`NavPhase`]: current phase, owned by the session
//! - [`Navigator`]: pure decision rules and termination checks
//! - [`TerminationReason`]: how a session ended

mod navigator;
mod state;

pub use navigator::{FollowRule, NavCommand, NavDecision, Navigator, NavigatorConfig};
pub use state::{NavPhase, TerminationReason};
