use core::ops::Range;

/// Returns the roster index to show in slot 0 so that `anchor_index` sits near the middle.
///
/// The anchor lands at slot `(max_visible - 1) / 2` (floor), so for an even `max_visible` the
/// extra row goes below it. The result is clamped to `0..=total.saturating_sub(max_visible)`.
pub fn compute_top_index(anchor_index: usize, total: usize, max_visible: usize) -> usize {
    let half = max_visible.saturating_sub(1) / 2;
    let ideal_top = anchor_index.saturating_sub(half);
    ideal_top.min(total.saturating_sub(max_visible))
}

/// Number of slots a window needs for a roster of `total` entries.
pub fn visible_count(max_visible: usize, total: usize) -> usize {
    max_visible.min(total)
}

/// Resting offset of slot `slot`; rows stack downward.
pub fn row_offset(slot: usize, row_step: f32) -> f32 {
    -(slot as f32 * row_step)
}

/// Offset of slot `slot` displaced by `delta_rows` rows, i.e. `-((slot - delta_rows) * row_step)`.
pub fn shifted_row_offset(slot: usize, delta_rows: isize, row_step: f32) -> f32 {
    -((slot as f32 - delta_rows as f32) * row_step)
}

/// Container offset that puts the anchor row on the focal point.
pub fn anchor_focus_offset(
    center_offset: f32,
    anchor_index: usize,
    top_index: usize,
    row_step: f32,
) -> f32 {
    center_offset + (anchor_index as f32 - top_index as f32) * row_step
}

/// Which part of the roster is currently bound to slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    /// Roster index shown in slot 0.
    pub top_index: usize,
    pub visible_count: usize,
    /// Slot currently holding the anchor, if it is in view.
    pub anchor_slot: Option<usize>,
}

impl WindowState {
    /// Derives the window for a roster of `total` entries.
    ///
    /// Without an anchor the window starts at the top of the roster.
    pub fn resolve(anchor_index: Option<usize>, total: usize, max_visible: usize) -> Self {
        let top_index = anchor_index
            .map(|anchor| compute_top_index(anchor, total, max_visible))
            .unwrap_or(0);
        Self::at(top_index, anchor_index, total, max_visible)
    }

    /// A window at an explicit `top_index`.
    pub fn at(
        top_index: usize,
        anchor_index: Option<usize>,
        total: usize,
        max_visible: usize,
    ) -> Self {
        let visible_count = visible_count(max_visible, total);
        let mut state = Self {
            top_index,
            visible_count,
            anchor_slot: None,
        };
        state.anchor_slot = anchor_index.and_then(|anchor| state.slot_of(anchor));
        state
    }

    /// The roster indexes covered by the window (possibly past the end of a shrunken roster).
    pub fn range(&self) -> Range<usize> {
        self.top_index..self.top_index.saturating_add(self.visible_count)
    }

    /// Roster index bound to `slot`, or `None` when the slot maps outside `0..total`.
    pub fn data_index(&self, slot: usize, total: usize) -> Option<usize> {
        if slot >= self.visible_count {
            return None;
        }
        let index = self.top_index.checked_add(slot)?;
        (index < total).then_some(index)
    }

    pub fn slot_of(&self, index: usize) -> Option<usize> {
        self.range().contains(&index).then(|| index - self.top_index)
    }
}
