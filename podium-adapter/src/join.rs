use alloc::vec::Vec;

use crate::JobId;

/// Result of reporting one job to a [`PlanJoin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinProgress {
    /// The job was not part of the join (stale, cancelled or already reported).
    Unknown,
    /// Other jobs are still running.
    Pending,
    /// That was the last job.
    Done,
}

/// Waits for a set of concurrently running jobs.
///
/// `Done` is reported exactly once per armed join: when the last member completes.
#[derive(Clone, Debug, Default)]
pub struct PlanJoin {
    pending: Vec<JobId>,
}

impl PlanJoin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, job: JobId) {
        if !self.pending.contains(&job) {
            self.pending.push(job);
        }
    }

    pub fn complete(&mut self, job: JobId) -> JoinProgress {
        let Some(pos) = self.pending.iter().position(|&j| j == job) else {
            return JoinProgress::Unknown;
        };
        self.pending.swap_remove(pos);
        if self.pending.is_empty() {
            JoinProgress::Done
        } else {
            JoinProgress::Pending
        }
    }

    pub fn contains(&self, job: JobId) -> bool {
        self.pending.contains(&job)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forgets every member; later completions report `Unknown`.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
