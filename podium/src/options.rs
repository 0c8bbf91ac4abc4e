use crate::{Easing, SetupError};

/// Geometry of a single row.
///
/// The row pitch used by every offset computation is `row_height + row_spacing`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowTemplate {
    pub row_height: f32,
    pub row_spacing: f32,
}

impl RowTemplate {
    pub fn new(row_height: f32, row_spacing: f32) -> Self {
        Self {
            row_height,
            row_spacing,
        }
    }

    pub fn step(&self) -> f32 {
        self.row_height + self.row_spacing
    }
}

impl Default for RowTemplate {
    fn default() -> Self {
        Self::new(1.0, 0.10)
    }
}

/// Timing and emphasis parameters for roster transitions.
///
/// All durations are in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionOptions {
    /// Duration of the row slide and of the anchor's label interpolation.
    pub duration_ms: u64,
    /// Lower bound applied to `duration_ms`.
    pub min_duration_ms: u64,
    /// Minimum delay before a rank-unchanged update is snapped into place.
    pub settle_min_ms: u64,
    /// How long a row that lands on the anchor's old slot stays transparent.
    pub overlap_reveal_ms: u64,
    pub easing: Easing,
    /// Depth offset applied to the anchor row while the list slides past it.
    pub emphasis_lift: f32,
    pub emphasis_ms: u64,
    pub emphasis_in_easing: Easing,
    pub emphasis_out_easing: Easing,
    /// Relative scale bump of the feedback pulse.
    pub pulse_scale: f32,
    pub pulse_ms: u64,
}

impl TransitionOptions {
    /// `duration_ms`, raised to `min_duration_ms`.
    pub fn effective_duration_ms(&self) -> u64 {
        self.duration_ms.max(self.min_duration_ms)
    }

    /// Delay before a rank-unchanged update is finalized.
    pub fn settle_delay_ms(&self) -> u64 {
        self.settle_min_ms.max(self.duration_ms / 2)
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_settle_min_ms(mut self, settle_min_ms: u64) -> Self {
        self.settle_min_ms = settle_min_ms;
        self
    }

    pub fn with_overlap_reveal_ms(mut self, overlap_reveal_ms: u64) -> Self {
        self.overlap_reveal_ms = overlap_reveal_ms;
        self
    }

    pub fn with_emphasis(mut self, lift: f32, duration_ms: u64) -> Self {
        self.emphasis_lift = lift;
        self.emphasis_ms = duration_ms;
        self
    }

    pub fn with_pulse(mut self, scale: f32, duration_ms: u64) -> Self {
        self.pulse_scale = scale;
        self.pulse_ms = duration_ms;
        self
    }
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            duration_ms: 450,
            min_duration_ms: 10,
            settle_min_ms: 180,
            overlap_reveal_ms: 500,
            easing: Easing::InOutCubic,
            emphasis_lift: 1.25,
            emphasis_ms: 250,
            emphasis_in_easing: Easing::OutQuad,
            emphasis_out_easing: Easing::InQuad,
            pulse_scale: 0.06,
            pulse_ms: 250,
        }
    }
}

/// Configuration for a leaderboard window.
///
/// The row template is the one piece a window cannot be built without; the default options leave
/// it unset so callers must supply their row geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowOptions {
    pub max_visible_rows: usize,
    /// Container offset at which the anchor row should rest.
    pub center_offset: f32,
    pub row_template: Option<RowTemplate>,
    pub transition: TransitionOptions,
}

impl WindowOptions {
    /// Creates options with a fixed row pitch and no row spacing.
    pub fn new(max_visible_rows: usize, row_step: f32) -> Self {
        Self {
            max_visible_rows,
            row_template: Some(RowTemplate::new(row_step, 0.0)),
            ..Self::default()
        }
    }

    pub fn with_max_visible_rows(mut self, max_visible_rows: usize) -> Self {
        self.max_visible_rows = max_visible_rows;
        self
    }

    pub fn with_center_offset(mut self, center_offset: f32) -> Self {
        self.center_offset = center_offset;
        self
    }

    pub fn with_row_template(mut self, row_template: Option<RowTemplate>) -> Self {
        self.row_template = row_template;
        self
    }

    pub fn with_transition(mut self, transition: TransitionOptions) -> Self {
        self.transition = transition;
        self
    }

    /// Checks the options and returns the row pitch.
    pub fn validate(&self) -> Result<f32, SetupError> {
        let template = self.row_template.ok_or(SetupError::MissingRowTemplate)?;
        let step = template.step();
        if !step.is_finite() || step <= 0.0 {
            return Err(SetupError::InvalidRowStep(step));
        }
        if self.max_visible_rows == 0 {
            return Err(SetupError::NoVisibleRows);
        }
        Ok(step)
    }
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            max_visible_rows: 25,
            center_offset: 0.0,
            row_template: None,
            transition: TransitionOptions::default(),
        }
    }
}
