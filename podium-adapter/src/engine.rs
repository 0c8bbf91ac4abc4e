use alloc::vec::Vec;

use podium::{Easing, LabelValues, SlotId};

/// Identifies one job started on an [`AnimationEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobId(pub u64);

/// A unit of work handed to the animation engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationJob {
    /// Slide a row between two offsets.
    Move {
        slot: SlotId,
        from: f32,
        to: f32,
        duration_ms: u64,
        easing: Easing,
    },
    /// Count a row's rank/score labels from one set of values to another.
    Labels {
        slot: SlotId,
        from: LabelValues,
        to: LabelValues,
        duration_ms: u64,
        easing: Easing,
    },
    /// Move a row along the depth axis.
    Depth {
        slot: SlotId,
        from: f32,
        to: f32,
        duration_ms: u64,
        easing: Easing,
    },
    /// Briefly scale a row up by `scale` and back.
    Pulse {
        slot: SlotId,
        scale: f32,
        duration_ms: u64,
    },
    /// Do nothing for `delay_ms`, then report completion.
    Delay { slot: Option<SlotId>, delay_ms: u64 },
}

impl AnimationJob {
    /// The row the job belongs to, used for cancellation by slot.
    pub fn slot(&self) -> Option<SlotId> {
        match *self {
            Self::Move { slot, .. }
            | Self::Labels { slot, .. }
            | Self::Depth { slot, .. }
            | Self::Pulse { slot, .. } => Some(slot),
            Self::Delay { slot, .. } => slot,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match *self {
            Self::Move { duration_ms, .. }
            | Self::Labels { duration_ms, .. }
            | Self::Depth { duration_ms, .. }
            | Self::Pulse { duration_ms, .. } => duration_ms,
            Self::Delay { delay_ms, .. } => delay_ms,
        }
    }
}

/// The service that runs animation jobs.
///
/// Contract:
/// - every started job that is not cancelled is reported by `poll_completed` exactly once;
/// - a cancelled job is never reported, even if it had already finished but was not yet polled.
pub trait AnimationEngine {
    fn start(&mut self, job: AnimationJob) -> JobId;

    /// Cancels one job. Returns `false` if it was unknown or already reported.
    fn cancel(&mut self, job: JobId) -> bool;

    /// Cancels every job attached to `slot`. Returns how many were cancelled.
    fn cancel_slot(&mut self, slot: SlotId) -> usize;

    /// Moves the ids of finished jobs into `out`.
    fn poll_completed(&mut self, out: &mut Vec<JobId>);

    /// Advances the engine clock, writing sampled values to `renderer`.
    ///
    /// Engines driven by an external clock can ignore this.
    fn advance(&mut self, now_ms: u64, renderer: &mut dyn RowRenderer) {
        let _ = (now_ms, renderer);
    }
}

/// What a row shows after a bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowContent<'a> {
    pub rank: usize,
    pub label: &'a str,
    pub score: u32,
    pub is_anchor: bool,
}

/// The rendering collaborator. It displays what it is told and nothing more.
pub trait RowRenderer {
    fn set_visible(&mut self, slot: SlotId, visible: bool);

    fn bind(&mut self, slot: SlotId, row: RowContent<'_>);

    fn set_offset(&mut self, slot: SlotId, offset: f32);

    fn set_opacity(&mut self, slot: SlotId, opacity: f32);

    /// Overrides the rank/score text without rebinding (used while labels are animating).
    fn set_labels(&mut self, _slot: SlotId, _labels: LabelValues) {}

    fn set_depth(&mut self, _slot: SlotId, _depth: f32) {}

    fn set_scale(&mut self, _slot: SlotId, _scale: f32) {}

    fn set_container_offset(&mut self, _offset: f32) {}
}
