//! Paginated display state for one piece of content.
//!
//! The viewer is a pure reducer: messages go in, effects come out. Waiting
//! and scrolling are performed by whoever drives it (see [`crate::runtime`]).

mod messages;
mod state;
mod update;
mod view;

pub use messages::{Message, NavKey};
pub use state::{PaginationState, Transition, TransitionStage, Viewer, ViewerPhase};
pub use update::Effect;
pub use view::{PageIndicator, PaginationControls, ViewModel, export_ts_bindings};
