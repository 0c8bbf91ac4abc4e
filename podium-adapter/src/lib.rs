//! Driver utilities for the `podium` crate.
//!
//! `podium` computes windows and transition plans but keeps no animation state. This crate
//! provides the stateful, framework-neutral pieces an adapter needs on top of it:
//!
//! - [`WindowController`]: applies plans, joins their jobs and finalizes the window
//! - [`AnimationEngine`] / [`RowRenderer`]: the collaborator seams a UI layer implements
//! - [`TweenEngine`]: a reference engine that samples jobs on a millisecond clock
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod engine;
mod join;
mod tween;


pub use controller::{FinalizeCallback, WindowController};
pub use engine::{AnimationEngine, AnimationJob, JobId, RowContent, RowRenderer};
pub use join::{JoinProgress, PlanJoin};
pub use tween::{Tween, TweenEngine, ease};
