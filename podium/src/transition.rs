use alloc::vec::Vec;

use crate::window::{compute_top_index, row_offset, shifted_row_offset};
use crate::{
    AnchorSnapshot, Easing, LabelValues, RosterStore, SetupError, TransitionOptions,
    WindowOptions, WindowState,
};

/// Placement of one visible slot for a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPlan {
    pub slot: usize,
    /// Roster index to bind; `None` means the slot is hidden.
    pub binding: Option<usize>,
    pub is_anchor: bool,
    pub start_offset: f32,
    pub end_offset: f32,
    /// Keep the row transparent for this long before showing it.
    pub hidden_for_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotMove {
    pub slot: usize,
    pub from: f32,
    pub to: f32,
}

/// Interpolation of the anchor row's rank/score labels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelTween {
    pub slot: usize,
    pub from: LabelValues,
    pub to: LabelValues,
    pub duration_ms: u64,
    pub easing: Easing,
}

/// Temporary depth offset on the anchor row, reverted when the plan finalizes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Emphasis {
    pub slot: usize,
    pub lift: f32,
    pub duration_ms: u64,
    pub easing_in: Easing,
    pub easing_out: Easing,
}

/// Short scale bump on the anchor row.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pulse {
    pub slot: usize,
    pub scale: f32,
    pub duration_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motion {
    /// The anchor kept its rank: no rows move, the window is snapped after a delay.
    ///
    /// The anchor's score still counts to its new value before the snap.
    Settle {
        finalize_after_ms: u64,
        pulse: Option<Pulse>,
        label: Option<LabelTween>,
        emphasis: Option<Emphasis>,
    },
    /// The anchor changed rank: every other visible row slides past it concurrently.
    Shift {
        duration_ms: u64,
        easing: Easing,
        moves: Vec<SlotMove>,
        label: Option<LabelTween>,
        emphasis: Option<Emphasis>,
    },
}

/// Everything needed to animate one roster update.
///
/// Slots are addressed by their position in the window (`0..visible_count`), not by handle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPlan {
    pub old_top: usize,
    pub new_top: usize,
    /// `old_anchor_index - new_anchor_index`; positive when the anchor moved up.
    pub delta_rows: isize,
    /// The window as it will be once the plan is finalized.
    pub window: WindowState,
    /// Non-anchor slot that starts transparent.
    pub overlap_slot: Option<usize>,
    pub slots: Vec<SlotPlan>,
    pub motion: Motion,
}

impl TransitionPlan {
    pub fn anchor_slot(&self) -> Option<usize> {
        self.window.anchor_slot
    }

    pub fn is_settle(&self) -> bool {
        matches!(self.motion, Motion::Settle { .. })
    }

    /// Positional jobs the finalize step must wait for.
    pub fn moves(&self) -> &[SlotMove] {
        match &self.motion {
            Motion::Shift { moves, .. } => moves,
            Motion::Settle { .. } => &[],
        }
    }

    /// A shift with nothing to slide is finalized right away.
    pub fn finalizes_immediately(&self) -> bool {
        !self.is_settle() && self.moves().is_empty()
    }
}

/// Turns a roster change into a [`TransitionPlan`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionPlanner {
    max_visible: usize,
    row_step: f32,
    options: TransitionOptions,
}

impl TransitionPlanner {
    pub fn new(options: &WindowOptions) -> Result<Self, SetupError> {
        let row_step = options.validate()?;
        Ok(Self::from_parts(
            options.max_visible_rows,
            row_step,
            options.transition,
        ))
    }

    pub fn from_parts(max_visible: usize, row_step: f32, options: TransitionOptions) -> Self {
        Self {
            max_visible,
            row_step,
            options,
        }
    }

    pub fn row_step(&self) -> f32 {
        self.row_step
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Plans the move from `previous` (whose anchor was `old_anchor`) to the current `roster`.
    ///
    /// The anchor row is bound and placed at its resting offset immediately; every other row
    /// starts `delta_rows` rows away from its resting offset so the list appears to flow past a
    /// stationary anchor.
    pub fn plan(
        &self,
        previous: &WindowState,
        old_anchor: Option<AnchorSnapshot>,
        roster: &RosterStore,
    ) -> TransitionPlan {
        let total = roster.len();
        let new_anchor = roster.anchor_snapshot();
        let new_top = new_anchor
            .map(|anchor| compute_top_index(anchor.index, total, self.max_visible))
            .unwrap_or(0);
        let window = WindowState::at(
            new_top,
            new_anchor.map(|a| a.index),
            total,
            self.max_visible,
        );

        let delta_rows = match (old_anchor, new_anchor) {
            (Some(old), Some(new)) => old.index as isize - new.index as isize,
            _ => 0,
        };

        let overlap_slot = match window.anchor_slot {
            Some(anchor_slot) if delta_rows != 0 => {
                let j = anchor_slot as isize + delta_rows;
                (0..window.visible_count as isize)
                    .contains(&j)
                    .then_some(j as usize)
            }
            _ => None,
        };

        let slots: Vec<SlotPlan> = (0..window.visible_count)
            .map(|slot| {
                let binding = window.data_index(slot, total);
                let is_anchor = binding.is_some() && window.anchor_slot == Some(slot);
                let end_offset = row_offset(slot, self.row_step);
                let start_offset = if is_anchor || binding.is_none() {
                    end_offset
                } else {
                    shifted_row_offset(slot, delta_rows, self.row_step)
                };
                let hidden_for_ms = (binding.is_some() && !is_anchor && overlap_slot == Some(slot))
                    .then_some(self.options.overlap_reveal_ms);
                SlotPlan {
                    slot,
                    binding,
                    is_anchor,
                    start_offset,
                    end_offset,
                    hidden_for_ms,
                }
            })
            .collect();

        let label_tween = |duration_ms| match (window.anchor_slot, old_anchor, new_anchor) {
            (Some(slot), Some(old), Some(new)) => Some(LabelTween {
                slot,
                from: old.labels(),
                to: new.labels(),
                duration_ms,
                easing: self.options.easing,
            }),
            _ => None,
        };
        let emphasis = window.anchor_slot.map(|slot| Emphasis {
            slot,
            lift: self.options.emphasis_lift,
            duration_ms: self.options.emphasis_ms,
            easing_in: self.options.emphasis_in_easing,
            easing_out: self.options.emphasis_out_easing,
        });

        let motion = if delta_rows == 0 {
            let finalize_after_ms = self.options.settle_delay_ms();
            Motion::Settle {
                finalize_after_ms,
                pulse: window.anchor_slot.map(|slot| Pulse {
                    slot,
                    scale: self.options.pulse_scale,
                    duration_ms: self.options.pulse_ms,
                }),
                // Counting stops at the snap, so it has to fit inside the delay.
                label: label_tween(finalize_after_ms),
                emphasis,
            }
        } else {
            let duration_ms = self.options.effective_duration_ms();
            let moves = slots
                .iter()
                .filter(|s| !s.is_anchor && s.binding.is_some())
                .map(|s| SlotMove {
                    slot: s.slot,
                    from: s.start_offset,
                    to: s.end_offset,
                })
                .collect();
            Motion::Shift {
                duration_ms,
                easing: self.options.easing,
                moves,
                label: label_tween(duration_ms),
                emphasis,
            }
        };

        pdebug!(
            old_top = previous.top_index,
            new_top,
            delta_rows,
            overlap_slot = ?overlap_slot,
            settle = delta_rows == 0,
            "TransitionPlanner::plan"
        );

        TransitionPlan {
            old_top: previous.top_index,
            new_top,
            delta_rows,
            window,
            overlap_slot,
            slots,
            motion,
        }
    }
}
