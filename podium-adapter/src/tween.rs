use alloc::vec::Vec;

use podium::{Easing, LabelValues, SlotId};

use crate::{AnimationEngine, AnimationJob, JobId, RowRenderer};

/// Evaluates an easing curve at `t` (clamped to `0..=1`).
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match easing {
        Easing::Linear => t,
        Easing::SmoothStep => t * t * (3.0 - 2.0 * t),
        Easing::InQuad => t * t,
        Easing::OutQuad => t * (2.0 - t),
        Easing::OutCubic => {
            let u = 1.0 - t;
            1.0 - u * u * u
        }
        Easing::InOutCubic => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                let u = -2.0 * t + 2.0;
                1.0 - (u * u * u) / 2.0
            }
        }
    }
}

/// A small tween between two values on a millisecond clock.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// Eased progress in `0..=1`.
    pub fn progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = (elapsed as f32 / self.duration_ms as f32).clamp(0.0, 1.0);
        ease(self.easing, t)
    }

    pub fn sample(&self, now_ms: u64) -> f32 {
        let eased = self.progress(now_ms);
        if eased >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * eased
    }
}

fn lerp_count(from: usize, to: usize, eased: f32) -> usize {
    let v = from as f32 + (to as f32 - from as f32) * eased;
    (v.max(0.0) + 0.5) as usize
}

#[derive(Clone, Copy, Debug)]
struct Running {
    id: JobId,
    job: AnimationJob,
    start_ms: u64,
}

impl Running {
    fn elapsed(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_ms)
    }

    fn is_done(&self, now_ms: u64) -> bool {
        self.elapsed(now_ms) >= self.job.duration_ms()
    }

    fn apply(&self, now_ms: u64, renderer: &mut dyn RowRenderer) {
        match self.job {
            AnimationJob::Move {
                slot,
                from,
                to,
                duration_ms,
                easing,
            } => {
                let tween = Tween::new(from, to, self.start_ms, duration_ms, easing);
                renderer.set_offset(slot, tween.sample(now_ms));
            }
            AnimationJob::Labels {
                slot,
                from,
                to,
                duration_ms,
                easing,
            } => {
                let tween = Tween::new(0.0, 1.0, self.start_ms, duration_ms, easing);
                let eased = tween.progress(now_ms);
                let labels = LabelValues {
                    rank: lerp_count(from.rank, to.rank, eased),
                    score: u32::try_from(lerp_count(from.score as usize, to.score as usize, eased))
                        .unwrap_or(u32::MAX),
                };
                renderer.set_labels(slot, labels);
            }
            AnimationJob::Depth {
                slot,
                from,
                to,
                duration_ms,
                easing,
            } => {
                let tween = Tween::new(from, to, self.start_ms, duration_ms, easing);
                renderer.set_depth(slot, tween.sample(now_ms));
            }
            AnimationJob::Pulse {
                slot,
                scale,
                duration_ms,
            } => {
                let tween = Tween::new(0.0, 1.0, self.start_ms, duration_ms, Easing::Linear);
                let t = tween.progress(now_ms);
                // Single bump: 0 at both ends, peak at the midpoint.
                let bump = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
                renderer.set_scale(slot, 1.0 + scale * bump);
            }
            AnimationJob::Delay { .. } => {}
        }
    }
}

/// A reference [`AnimationEngine`] that samples jobs on a millisecond clock.
///
/// Jobs start at the engine's current time (the last `advance`), write their sampled values on
/// every `advance`, and are reported once their duration has elapsed. The final frame of a job
/// always writes its exact end value.
#[derive(Clone, Debug, Default)]
pub struct TweenEngine {
    now_ms: u64,
    next_id: u64,
    running: Vec<Running>,
    /// Finished jobs not yet polled, with the slot they drove.
    completed: Vec<(JobId, Option<SlotId>)>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose clock starts at `now_ms`.
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.completed.is_empty()
    }

    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    pub fn job(&self, id: JobId) -> Option<&AnimationJob> {
        self.running.iter().find(|r| r.id == id).map(|r| &r.job)
    }
}

impl AnimationEngine for TweenEngine {
    fn start(&mut self, job: AnimationJob) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        self.running.push(Running {
            id,
            job,
            start_ms: self.now_ms,
        });
        id
    }

    fn cancel(&mut self, job: JobId) -> bool {
        let before = self.running.len() + self.completed.len();
        self.running.retain(|r| r.id != job);
        self.completed.retain(|&(c, _)| c != job);
        before != self.running.len() + self.completed.len()
    }

    fn cancel_slot(&mut self, slot: SlotId) -> usize {
        let before = self.running.len() + self.completed.len();
        self.running.retain(|r| r.job.slot() != Some(slot));
        self.completed.retain(|&(_, s)| s != Some(slot));
        before - self.running.len() - self.completed.len()
    }

    fn poll_completed(&mut self, out: &mut Vec<JobId>) {
        out.extend(self.completed.drain(..).map(|(id, _)| id));
    }

    fn advance(&mut self, now_ms: u64, renderer: &mut dyn RowRenderer) {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;
        let completed = &mut self.completed;
        self.running.retain(|r| {
            r.apply(now, renderer);
            if r.is_done(now) {
                atrace!(job = r.id.0, "TweenEngine: job finished");
                completed.push((r.id, r.job.slot()));
                false
            } else {
                true
            }
        });
    }
}
