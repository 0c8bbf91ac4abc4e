use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AnchorSnapshot, Entity};

/// The id that marks the local participant unless a store is configured otherwise.
pub const DEFAULT_ANCHOR_ID: &str = "me";

/// An inclusive range of score change magnitudes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreDelta {
    pub min: u32,
    pub max: u32,
}

impl ScoreDelta {
    /// Creates a range; the bounds may be given in either order.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Draws a magnitude uniformly from the range and gives it a uniformly random sign.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        let magnitude = i64::from(rng.random_range(lo..=hi));
        if rng.random_bool(0.5) {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Parameters for [`RosterStore::mutate_scores`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreMutation {
    pub anchor_delta: ScoreDelta,
    pub other_delta: ScoreDelta,
    /// Chance (`0.0..=1.0`) that a non-anchor entity changes at all.
    pub other_change_probability: f64,
}

impl ScoreMutation {
    pub fn new(anchor_delta: ScoreDelta, other_delta: ScoreDelta, probability: f64) -> Self {
        Self {
            anchor_delta,
            other_delta,
            other_change_probability: probability,
        }
    }

    fn probability(&self) -> f64 {
        let p = self.other_change_probability;
        if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
    }
}

impl Default for ScoreMutation {
    fn default() -> Self {
        Self::new(ScoreDelta::new(5, 30), ScoreDelta::new(5, 30), 1.0)
    }
}

/// Owns the entity list and keeps it sorted and ranked.
///
/// Order is score descending with id ascending (byte-wise) as the tie-break, and
/// `entities()[i].rank() == i + 1` holds after every public mutation.
#[derive(Clone, Debug)]
pub struct RosterStore {
    entities: Vec<Entity>,
    anchor_id: String,
    anchor_index: Option<usize>,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterStore {
    pub fn new() -> Self {
        Self::with_anchor_id(DEFAULT_ANCHOR_ID)
    }

    /// Creates an empty store whose anchor is the entity with the given id.
    pub fn with_anchor_id(anchor_id: impl Into<String>) -> Self {
        Self {
            entities: Vec::new(),
            anchor_id: anchor_id.into(),
            anchor_index: None,
        }
    }

    /// Creates a store from entities (see [`Self::set_roster`]).
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut store = Self::new();
        store.set_roster(entities);
        store
    }

    /// Replaces the backing list, then re-ranks.
    ///
    /// Ids must be unique; when one repeats, its first occurrence is kept and the rest are
    /// dropped.
    pub fn set_roster(&mut self, entities: impl IntoIterator<Item = Entity>) {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::new();
        for entity in entities {
            if seen.insert(entity.id.clone()) {
                kept.push(entity);
            } else {
                pwarn!(id = %entity.id, "RosterStore::set_roster: dropping duplicate id");
            }
        }
        self.entities = kept;
        self.re_rank();
        pdebug!(
            count = self.entities.len(),
            anchor_index = ?self.anchor_index,
            "RosterStore::set_roster"
        );
    }

    pub fn clear(&mut self) {
        self.set_roster(Vec::new());
    }

    /// Sorts, assigns ranks sequentially and relocates the anchor.
    pub fn re_rank(&mut self) {
        self.entities.sort_by(compare_entities);
        for (i, entity) in self.entities.iter_mut().enumerate() {
            entity.set_rank(i + 1);
        }
        self.anchor_index = self.entities.iter().position(|e| e.id == self.anchor_id);
    }

    /// Randomly nudges scores, then re-ranks.
    ///
    /// Every non-anchor entity changes with probability `other_change_probability` by a signed
    /// magnitude drawn from `other_delta`; the anchor always gets a draw from `anchor_delta`.
    /// Scores never drop below zero. Entities are visited in roster order, so the outcome is a
    /// pure function of the roster and the random source.
    pub fn mutate_scores<R: Rng + ?Sized>(&mut self, rng: &mut R, mutation: &ScoreMutation) {
        let p = mutation.probability();
        for entity in &mut self.entities {
            if entity.id == self.anchor_id {
                continue;
            }
            if rng.random_bool(p) {
                let delta = mutation.other_delta.sample(rng);
                entity.score = apply_delta(entity.score, delta);
            }
        }

        if let Some(anchor) = self.anchor_index.and_then(|i| self.entities.get_mut(i)) {
            let delta = mutation.anchor_delta.sample(rng);
            let before = anchor.score;
            anchor.score = apply_delta(before, delta);
            ptrace!(before, after = anchor.score, delta, "mutate_scores: anchor");
        }

        self.re_rank();
        pdebug!(anchor_index = ?self.anchor_index, "RosterStore::mutate_scores");
    }

    /// Same as [`Self::mutate_scores`] with a `SmallRng` seeded from `seed`.
    pub fn mutate_scores_seeded(&mut self, seed: u64, mutation: &ScoreMutation) {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.mutate_scores(&mut rng, mutation);
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn anchor_id(&self) -> &str {
        &self.anchor_id
    }

    pub fn anchor_index(&self) -> Option<usize> {
        self.anchor_index
    }

    pub fn anchor(&self) -> Option<&Entity> {
        self.anchor_index.and_then(|i| self.entities.get(i))
    }

    pub fn is_anchor_index(&self, index: usize) -> bool {
        self.anchor_index == Some(index)
    }

    pub fn anchor_snapshot(&self) -> Option<AnchorSnapshot> {
        let index = self.anchor_index?;
        let anchor = self.entities.get(index)?;
        Some(AnchorSnapshot {
            index,
            rank: anchor.rank(),
            score: anchor.score,
        })
    }
}

fn compare_entities(a: &Entity, b: &Entity) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

fn apply_delta(score: u32, delta: i64) -> u32 {
    let next = i64::from(score).saturating_add(delta).max(0);
    u32::try_from(next).unwrap_or(u32::MAX)
}
