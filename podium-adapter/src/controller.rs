use alloc::collections::{BTreeMap, BTreeSet};
use alloc::sync::Arc;
use alloc::vec::Vec;

use podium::{
    Emphasis, Entity, LabelTween, Motion, RosterStore, RowSlotPool, ScoreMutation, SetupError, SlotId,
    TransitionPlan, TransitionPlanner, WindowOptions, WindowState, anchor_focus_offset,
    row_offset, visible_count,
};
use rand::Rng;

use crate::{AnimationEngine, AnimationJob, JobId, JoinProgress, PlanJoin, RowContent, RowRenderer};

pub type FinalizeCallback = Arc<dyn Fn(&WindowState) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum JobRole {
    Move,
    Labels,
    EmphasisIn,
    EmphasisOut,
    Pulse,
    Reveal,
    Settle,
}

#[derive(Clone, Copy, Debug)]
struct PendingJob {
    role: JobRole,
    slot: Option<SlotId>,
}

/// A framework-neutral controller for a leaderboard window centered on one anchor entry.
///
/// The controller owns the roster, the committed [`WindowState`] and a set of pooled row slots.
/// It does not animate anything itself: every roster update is turned into a
/// [`TransitionPlan`] whose jobs are handed to an [`AnimationEngine`], and the window is only
/// committed (finalized) once every positional job of that plan has completed.
///
/// Adapters drive it by calling:
/// - `update` / `simulate_update` when scores change
/// - `tick(now_ms)` each frame (or `pump()` if the engine runs on its own clock)
///
/// Starting an update while a plan is still running cancels that plan first; its jobs never
/// report back and it never finalizes.
pub struct WindowController<E, R> {
    options: WindowOptions,
    planner: TransitionPlanner,
    roster: RosterStore,
    state: WindowState,
    pool: RowSlotPool,
    slots: Vec<SlotId>,
    engine: E,
    renderer: R,
    pending: BTreeMap<JobId, PendingJob>,
    join: PlanJoin,
    in_flight: Option<WindowState>,
    /// Anchor slot currently pushed forward on the depth axis.
    emphasized: Option<(SlotId, Emphasis)>,
    container_offset: f32,
    last_plan: Option<TransitionPlan>,
    generation: u64,
    finalize_count: u64,
    on_finalize: Option<FinalizeCallback>,
    completed: Vec<JobId>,
}

impl<E: AnimationEngine, R: RowRenderer> WindowController<E, R> {
    /// Builds the controller and shows the initial window.
    ///
    /// Fails without touching `renderer` if the options cannot describe a window (for example,
    /// no row template).
    pub fn new(
        options: WindowOptions,
        roster: RosterStore,
        engine: E,
        renderer: R,
    ) -> Result<Self, SetupError> {
        let planner = TransitionPlanner::new(&options).map_err(|err| {
            awarn!(error = %err, "WindowController::new: refusing to initialize");
            err
        })?;
        let visible = visible_count(options.max_visible_rows, roster.len());
        let mut controller = Self {
            options,
            planner,
            roster,
            state: WindowState::default(),
            pool: RowSlotPool::new(visible),
            slots: Vec::with_capacity(visible),
            engine,
            renderer,
            pending: BTreeMap::new(),
            join: PlanJoin::new(),
            in_flight: None,
            emphasized: None,
            container_offset: 0.0,
            last_plan: None,
            generation: 0,
            finalize_count: 0,
            on_finalize: None,
            completed: Vec::new(),
        };
        controller.reset_window();
        Ok(controller)
    }

    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    /// The committed window. During a transition this is still the window before the update.
    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    pub fn row_step(&self) -> f32 {
        self.planner.row_step()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pool(&self) -> &RowSlotPool {
        &self.pool
    }

    /// Slot handles in window order: `slot_ids()[j]` shows roster index `top_index + j`.
    pub fn slot_ids(&self) -> &[SlotId] {
        &self.slots
    }

    pub fn slot_at(&self, position: usize) -> Option<SlotId> {
        self.slots.get(position).copied()
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_plan(&self) -> Option<&TransitionPlan> {
        self.last_plan.as_ref()
    }

    /// How many plans have been finalized.
    pub fn finalize_count(&self) -> u64 {
        self.finalize_count
    }

    /// How many plans have been applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn container_offset(&self) -> f32 {
        self.container_offset
    }

    pub fn emphasized_slot(&self) -> Option<SlotId> {
        self.emphasized.map(|(slot, _)| slot)
    }

    /// Jobs started by the controller that have neither completed nor been cancelled.
    pub fn pending_jobs(&self) -> usize {
        self.pending.len()
    }

    pub fn set_on_finalize(
        &mut self,
        on_finalize: Option<impl Fn(&WindowState) + Send + Sync + 'static>,
    ) {
        self.on_finalize = on_finalize.map(|f| Arc::new(f) as _);
    }

    /// Replaces the roster and snaps the window to it without animating.
    pub fn load(&mut self, entities: impl IntoIterator<Item = Entity>) {
        self.cancel_pending();
        self.roster.set_roster(entities);
        self.last_plan = None;
        self.reset_window();
    }

    /// Applies `mutate` to the roster and starts the transition to the new window.
    ///
    /// Returns the plan that was applied. Completions the engine reports synchronously are
    /// dispatched before returning.
    pub fn update(&mut self, mutate: impl FnOnce(&mut RosterStore)) -> &TransitionPlan {
        if let Some(target) = self.cancel_pending() {
            adebug!(
                superseded_top = target.top_index,
                "WindowController::update: cancelled in-flight plan"
            );
            self.state = target;
        }

        let previous = self.state;
        let old_anchor = self.roster.anchor_snapshot();
        mutate(&mut self.roster);
        self.sync_slots();

        let plan = self.planner.plan(&previous, old_anchor, &self.roster);
        self.generation += 1;
        self.apply_plan(&plan);
        self.pump();
        self.last_plan.insert(plan)
    }

    /// Randomly mutates scores (see [`RosterStore::mutate_scores`]) and transitions to the result.
    pub fn simulate_update<G: Rng + ?Sized>(
        &mut self,
        rng: &mut G,
        mutation: &ScoreMutation,
    ) -> &TransitionPlan {
        self.update(|roster| roster.mutate_scores(rng, mutation))
    }

    /// Advances the engine to `now_ms` and dispatches whatever finished.
    ///
    /// Returns the number of completions dispatched.
    pub fn tick(&mut self, now_ms: u64) -> usize {
        self.engine.advance(now_ms, &mut self.renderer);
        self.pump()
    }

    /// Dispatches completions the engine has already reported.
    pub fn pump(&mut self) -> usize {
        let mut completed = core::mem::take(&mut self.completed);
        self.engine.poll_completed(&mut completed);
        let count = completed.len();
        for job in completed.drain(..) {
            self.on_job_complete(job);
        }
        self.completed = completed;
        count
    }

    /// Cancels the running plan and snaps straight to its final layout.
    ///
    /// This does not count as a finalize and does not notify `on_finalize`.
    pub fn cancel_transition(&mut self) -> bool {
        if self.in_flight.is_none() {
            return false;
        }
        let Some(target) = self.cancel_pending() else {
            return false;
        };
        self.state = target;
        self.bind_window();
        true
    }

    /// Binds every slot to the roster index the committed window maps to it and puts it at
    /// its resting offset. Slots mapping outside the roster are hidden.
    pub fn bind_window(&mut self) {
        let total = self.roster.len();
        let row_step = self.planner.row_step();
        for (position, &id) in self.slots.iter().enumerate() {
            let entity = self
                .state
                .data_index(position, total)
                .and_then(|index| self.roster.get(index).map(|entity| (index, entity)));
            let Some(slot) = self.pool.get_mut(id) else {
                continue;
            };
            match entity {
                Some((index, entity)) => {
                    let offset = row_offset(position, row_step);
                    slot.visible = true;
                    slot.binding = Some(index);
                    slot.offset = offset;
                    self.renderer.set_visible(id, true);
                    self.renderer
                        .bind(id, row_content(entity, self.roster.is_anchor_index(index)));
                    self.renderer.set_offset(id, offset);
                }
                None => {
                    slot.visible = false;
                    slot.binding = None;
                    self.renderer.set_visible(id, false);
                }
            }
        }
    }

    /// Moves the row container so the anchor row sits on the focal point.
    ///
    /// Returns `false` (and leaves the container alone) when the roster has no anchor.
    pub fn center_anchor(&mut self) -> bool {
        let Some(anchor) = self.roster.anchor_index() else {
            return false;
        };
        self.container_offset = anchor_focus_offset(
            self.options.center_offset,
            anchor,
            self.state.top_index,
            self.planner.row_step(),
        );
        self.renderer.set_container_offset(self.container_offset);
        true
    }

    fn reset_window(&mut self) {
        self.sync_slots();
        self.state = WindowState::resolve(
            self.roster.anchor_index(),
            self.roster.len(),
            self.planner.max_visible(),
        );
        self.bind_window();
        self.center_anchor();
    }

    /// Grows or shrinks the slot set to the visible count of the current roster.
    fn sync_slots(&mut self) {
        let wanted = visible_count(self.planner.max_visible(), self.roster.len());
        while self.slots.len() < wanted {
            let id = self.pool.acquire();
            self.renderer.set_opacity(id, 1.0);
            self.slots.push(id);
        }
        while self.slots.len() > wanted {
            let Some(id) = self.slots.pop() else {
                break;
            };
            self.engine.cancel_slot(id);
            self.pool.release(id);
            self.renderer.set_visible(id, false);
        }
    }

    fn track(&mut self, job: AnimationJob, role: JobRole) -> JobId {
        let id = self.engine.start(job);
        self.pending.insert(
            id,
            PendingJob {
                role,
                slot: job.slot(),
            },
        );
        id
    }

    fn apply_plan(&mut self, plan: &TransitionPlan) {
        for slot_plan in &plan.slots {
            let Some(&id) = self.slots.get(slot_plan.slot) else {
                debug_assert!(false, "plan addresses a slot the window does not have");
                awarn!(slot = slot_plan.slot, "WindowController::apply_plan: missing slot");
                continue;
            };
            let entity = slot_plan
                .binding
                .and_then(|index| self.roster.get(index).map(|entity| (index, entity)));
            let Some(slot) = self.pool.get_mut(id) else {
                continue;
            };
            let Some((index, entity)) = entity else {
                slot.visible = false;
                slot.binding = None;
                self.renderer.set_visible(id, false);
                continue;
            };
            let opacity = if slot_plan.hidden_for_ms.is_some() { 0.0 } else { 1.0 };
            slot.visible = true;
            slot.binding = Some(index);
            slot.offset = slot_plan.start_offset;
            slot.opacity = opacity;
            self.renderer.set_visible(id, true);
            self.renderer.bind(id, row_content(entity, slot_plan.is_anchor));
            self.renderer.set_offset(id, slot_plan.start_offset);
            self.renderer.set_opacity(id, opacity);
        }

        for slot_plan in &plan.slots {
            let (Some(delay_ms), Some(&id)) = (slot_plan.hidden_for_ms, self.slots.get(slot_plan.slot))
            else {
                continue;
            };
            self.track(
                AnimationJob::Delay {
                    slot: Some(id),
                    delay_ms,
                },
                JobRole::Reveal,
            );
        }

        self.in_flight = Some(plan.window);

        match &plan.motion {
            Motion::Settle {
                finalize_after_ms,
                pulse,
                label,
                emphasis,
            } => {
                if let Some((pulse, &id)) =
                    pulse.and_then(|p| self.slots.get(p.slot).map(|id| (p, id)))
                {
                    self.track(
                        AnimationJob::Pulse {
                            slot: id,
                            scale: pulse.scale,
                            duration_ms: pulse.duration_ms,
                        },
                        JobRole::Pulse,
                    );
                }
                self.start_anchor_effects(*label, *emphasis);
                self.track(
                    AnimationJob::Delay {
                        slot: None,
                        delay_ms: *finalize_after_ms,
                    },
                    JobRole::Settle,
                );
            }
            Motion::Shift {
                duration_ms,
                easing,
                moves,
                label,
                emphasis,
            } => {
                for slot_move in moves {
                    let Some(&id) = self.slots.get(slot_move.slot) else {
                        continue;
                    };
                    let job = self.track(
                        AnimationJob::Move {
                            slot: id,
                            from: slot_move.from,
                            to: slot_move.to,
                            duration_ms: *duration_ms,
                            easing: *easing,
                        },
                        JobRole::Move,
                    );
                    self.join.add(job);
                }
                self.start_anchor_effects(*label, *emphasis);
                if self.join.is_empty() {
                    self.finalize();
                }
            }
        }
    }

    /// Counts the anchor's labels from their old values and pushes the row forward.
    fn start_anchor_effects(&mut self, label: Option<LabelTween>, emphasis: Option<Emphasis>) {
        if let Some((label, &id)) = label.and_then(|l| self.slots.get(l.slot).map(|id| (l, id))) {
            self.renderer.set_labels(id, label.from);
            self.track(
                AnimationJob::Labels {
                    slot: id,
                    from: label.from,
                    to: label.to,
                    duration_ms: label.duration_ms,
                    easing: label.easing,
                },
                JobRole::Labels,
            );
        }
        if let Some((emphasis, &id)) =
            emphasis.and_then(|e| self.slots.get(e.slot).map(|id| (e, id)))
        {
            self.track(
                AnimationJob::Depth {
                    slot: id,
                    from: 0.0,
                    to: emphasis.lift,
                    duration_ms: emphasis.duration_ms,
                    easing: emphasis.easing_in,
                },
                JobRole::EmphasisIn,
            );
            self.emphasized = Some((id, emphasis));
        }
    }

    fn on_job_complete(&mut self, job: JobId) {
        let Some(pending) = self.pending.remove(&job) else {
            adebug!(job = job.0, "WindowController: ignoring completion of unknown job");
            return;
        };
        match pending.role {
            JobRole::Move => {
                if self.join.complete(job) == JoinProgress::Done {
                    self.finalize();
                }
            }
            JobRole::Settle => self.finalize(),
            JobRole::Reveal => {
                if let Some(id) = pending.slot {
                    self.restore_opacity(id);
                }
            }
            JobRole::Labels | JobRole::EmphasisIn | JobRole::EmphasisOut | JobRole::Pulse => {}
        }
    }

    fn restore_opacity(&mut self, id: SlotId) {
        if let Some(slot) = self.pool.get_mut(id) {
            slot.opacity = 1.0;
        }
        self.renderer.set_opacity(id, 1.0);
    }

    /// Commits the in-flight window, resyncs every slot and lets the anchor row fall back.
    fn finalize(&mut self) {
        let Some(target) = self.in_flight.take() else {
            return;
        };
        self.join.clear();

        // Jobs that only make sense while rows are moving.
        let leftovers: Vec<JobId> = self
            .pending
            .iter()
            .filter(|(_, p)| matches!(p.role, JobRole::Labels | JobRole::EmphasisIn))
            .map(|(&id, _)| id)
            .collect();
        for id in leftovers {
            self.engine.cancel(id);
            self.pending.remove(&id);
        }

        self.state = target;
        self.bind_window();

        if let Some((slot, emphasis)) = self.emphasized.take() {
            self.track(
                AnimationJob::Depth {
                    slot,
                    from: emphasis.lift,
                    to: 0.0,
                    duration_ms: emphasis.duration_ms,
                    easing: emphasis.easing_out,
                },
                JobRole::EmphasisOut,
            );
        }

        self.finalize_count += 1;
        adebug!(
            top_index = self.state.top_index,
            generation = self.generation,
            "WindowController::finalize"
        );
        if let Some(cb) = &self.on_finalize {
            cb(&self.state);
        }
    }

    /// Cancels every job the controller started and undoes their transient effects.
    ///
    /// Returns the window the cancelled plan was heading to, if one was in flight.
    fn cancel_pending(&mut self) -> Option<WindowState> {
        let pending = core::mem::take(&mut self.pending);
        let mut touched = BTreeSet::new();
        for (id, job) in pending {
            self.engine.cancel(id);
            let Some(slot) = job.slot else {
                continue;
            };
            match job.role {
                JobRole::Pulse => self.renderer.set_scale(slot, 1.0),
                JobRole::EmphasisIn | JobRole::EmphasisOut => self.renderer.set_depth(slot, 0.0),
                JobRole::Reveal => self.restore_opacity(slot),
                JobRole::Move | JobRole::Labels | JobRole::Settle => {}
            }
            touched.insert(slot);
        }
        for slot in touched {
            self.engine.cancel_slot(slot);
        }
        self.join.clear();
        if let Some((slot, _)) = self.emphasized.take() {
            self.renderer.set_depth(slot, 0.0);
        }
        self.in_flight.take()
    }
}

impl<E, R> core::fmt::Debug for WindowController<E, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowController")
            .field("state", &self.state)
            .field("slots", &self.slots)
            .field("in_flight", &self.in_flight)
            .field("pending", &self.pending.len())
            .field("generation", &self.generation)
            .field("finalize_count", &self.finalize_count)
            .finish_non_exhaustive()
    }
}

fn row_content(entity: &Entity, is_anchor: bool) -> RowContent<'_> {
    RowContent {
        rank: entity.rank(),
        label: &entity.label,
        score: entity.score,
        is_anchor,
    }
}
