//! A headless leaderboard window that keeps one anchor entry near the middle of the view.
//!
//! For a stateful driver (animation jobs, joins, a tween engine), see the `podium-adapter` crate.
//!
//! This crate holds the pieces that are pure state and arithmetic:
//! - [`RosterStore`]: deterministic sort/rank and score mutation
//! - [`compute_top_index`] / [`WindowState`]: which roster rows are visible and where
//! - [`RowSlotPool`]: reusable row containers with no entity identity
//! - [`TransitionPlanner`]: per-slot start/end offsets for an anchor-relative slide
//!
//! It is UI-agnostic. A rendering layer is expected to provide the row pitch and to display
//! whatever slot bindings and offsets it is handed.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
#[cfg(feature = "json")]
mod loader;
mod options;
mod pool;
mod roster;
mod transition;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use error::SetupError;
#[cfg(feature = "json")]
pub use error::LoadError;
#[cfg(feature = "json")]
pub use loader::{RosterSource, load_first, parse_roster, try_parse_roster};
pub use options::{RowTemplate, TransitionOptions, WindowOptions};
pub use pool::{RowSlotPool, Slot, SlotId};
pub use roster::{DEFAULT_ANCHOR_ID, RosterStore, ScoreDelta, ScoreMutation};
pub use transition::{
    Emphasis, LabelTween, Motion, Pulse, SlotMove, SlotPlan, TransitionPlan, TransitionPlanner,
};
pub use types::{AnchorSnapshot, Easing, Entity, LabelValues};
pub use window::{
    WindowState, anchor_focus_offset, compute_top_index, row_offset, shifted_row_offset,
    visible_count,
};
