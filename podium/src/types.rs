use alloc::string::String;

/// One competitor in the roster.
///
/// `rank` is derived by [`crate::RosterStore`] and cannot be set by callers. An entity that has
/// not been through a store yet reports rank `0`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: String,
    pub label: String,
    pub score: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    rank: usize,
}

impl Entity {
    pub fn new(id: impl Into<String>, label: impl Into<String>, score: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            score,
            rank: 0,
        }
    }

    /// 1-based position in the sorted roster.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    pub fn labels(&self) -> LabelValues {
        LabelValues {
            rank: self.rank,
            score: self.score,
        }
    }
}

/// The values a row displays next to its label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelValues {
    pub rank: usize,
    pub score: u32,
}

/// Where the anchor was (and what it displayed) at a point in time.
///
/// Captured before a mutation so a transition can animate from the old values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorSnapshot {
    pub index: usize,
    pub rank: usize,
    pub score: u32,
}

impl AnchorSnapshot {
    pub fn labels(&self) -> LabelValues {
        LabelValues {
            rank: self.rank,
            score: self.score,
        }
    }
}

/// An easing curve selector.
///
/// The core never evaluates curves; it only hands the selector to the animation collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    SmoothStep,
    InQuad,
    OutQuad,
    OutCubic,
    #[default]
    InOutCubic,
}
