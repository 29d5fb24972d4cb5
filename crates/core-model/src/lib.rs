//! UI state models: the single-run state machine, the multi-run workspace,
//! the run-overview panel, and sidebar animation.
//!
//! Ownership model: the event loop owns exactly one `Run` or `Workspace` by
//! value and mutates it only inside message handlers. Producers (reader
//! tasks, watchers, heartbeat timers) never touch this state; they send
//! `Msg` values into the loop's channel. Teardown is structural: dropping a
//! run's stream closes its reader task, and stale heartbeat timers are
//! filtered by generation.

pub mod animation;
pub mod msg;
pub mod overview;
pub mod run;
pub mod stream;
pub mod workspace;

pub use animation::{AnimPhase, AnimationState};
pub use msg::{Msg, RunListing};
pub use overview::{OverviewSection, RunOverview};
pub use run::{Run, RunState, UpdateOutcome};
pub use stream::RunStream;
pub use workspace::Workspace;
