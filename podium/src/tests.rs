use crate::*;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use alloc::{format, vec};

use proptest::prelude::*;

fn entity(id: &str, score: u32) -> Entity {
    Entity::new(id, id.to_uppercase(), score)
}

fn roster_of(pairs: &[(&str, u32)]) -> RosterStore {
    RosterStore::from_entities(pairs.iter().map(|&(id, score)| entity(id, score)))
}

fn ids(roster: &RosterStore) -> Vec<&str> {
    roster.entities().iter().map(|e| e.id.as_str()).collect()
}

fn assert_ranked(roster: &RosterStore) {
    for (i, e) in roster.entities().iter().enumerate() {
        assert_eq!(e.rank(), i + 1, "rank of {} at index {i}", e.id);
    }
    for pair in roster.entities().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.score > b.score || (a.score == b.score && a.id < b.id),
            "{}:{} must sort before {}:{}",
            a.id,
            a.score,
            b.id,
            b.score
        );
    }
}

/// 50 entities `p00..p48` plus `me`, scored so the anchor lands at `anchor_index`.
fn fifty_with_anchor_at(anchor_index: usize) -> RosterStore {
    let mut entities = Vec::new();
    let mut score = 10_000u32;
    let mut other = 0usize;
    for i in 0..50 {
        if i == anchor_index {
            entities.push(entity("me", score));
        } else {
            entities.push(entity(&format!("p{other:02}"), score));
            other += 1;
        }
        score -= 10;
    }
    RosterStore::from_entities(entities)
}

#[test]
fn re_rank_sorts_by_score_then_id() {
    let roster = roster_of(&[("c", 50), ("me", 70), ("b", 50), ("a", 90), ("d", 10)]);
    assert_eq!(ids(&roster), ["a", "me", "b", "c", "d"]);
    assert_ranked(&roster);
    assert_eq!(roster.anchor_index(), Some(1));
    assert_eq!(roster.anchor().map(|e| e.score), Some(70));
}

#[test]
fn tie_break_is_byte_wise() {
    let roster = roster_of(&[("a", 5), ("B", 5), ("_", 5)]);
    assert_eq!(ids(&roster), ["B", "_", "a"]);
}

#[test]
fn entity_rank_is_zero_until_ranked() {
    assert_eq!(entity("x", 1).rank(), 0);
}

#[test]
fn empty_roster_has_no_anchor() {
    let mut roster = RosterStore::new();
    roster.set_roster(Vec::new());
    assert!(roster.is_empty());
    assert_eq!(roster.anchor_index(), None);
    assert!(roster.anchor().is_none());
    assert!(roster.anchor_snapshot().is_none());

    let state = WindowState::resolve(roster.anchor_index(), roster.len(), 25);
    assert_eq!(state, WindowState::default());
}

#[test]
fn duplicate_ids_keep_first_occurrence() {
    let roster = roster_of(&[("me", 10), ("a", 5), ("me", 99), ("a", 1)]);
    assert_eq!(roster.len(), 2);
    assert_eq!(ids(&roster), ["me", "a"]);
    assert_eq!(roster.anchor().map(|e| e.score), Some(10));
}

#[test]
fn custom_anchor_id() {
    let mut roster = RosterStore::with_anchor_id("local");
    roster.set_roster(vec![entity("me", 10), entity("local", 20)]);
    assert_eq!(roster.anchor_id(), "local");
    assert_eq!(roster.anchor_index(), Some(0));
    assert!(roster.is_anchor_index(0));
    assert!(!roster.is_anchor_index(1));
}

#[test]
fn scenario_anchor_on_top() {
    let roster = roster_of(&[("me", 100), ("a", 90), ("b", 80)]);
    assert_eq!(ids(&roster), ["me", "a", "b"]);
    assert_eq!(roster.anchor_index(), Some(0));
    assert_eq!(compute_top_index(0, roster.len(), 3), 0);
}

#[test]
fn scenario_fifty_entities_anchor_at_forty() {
    let roster = fifty_with_anchor_at(40);
    assert_eq!(roster.anchor_index(), Some(40));
    assert_eq!(compute_top_index(40, 50, 25), 25);

    let state = WindowState::resolve(roster.anchor_index(), roster.len(), 25);
    assert_eq!(state.top_index, 25);
    assert_eq!(state.visible_count, 25);
    assert_eq!(state.anchor_slot, Some(15));
}

#[test]
fn top_index_centers_with_floor_half() {
    // Odd window: anchor in the exact middle.
    assert_eq!(compute_top_index(10, 100, 5), 8);
    // Even window: half = 1, so one row above and two below.
    assert_eq!(compute_top_index(10, 100, 4), 9);
    // Clamped at both ends.
    assert_eq!(compute_top_index(1, 100, 5), 0);
    assert_eq!(compute_top_index(99, 100, 5), 95);
    // Roster smaller than the window.
    assert_eq!(compute_top_index(2, 3, 25), 0);
    assert_eq!(compute_top_index(0, 0, 0), 0);
}

#[test]
fn window_without_anchor_shows_the_top() {
    let roster = roster_of(&[("a", 3), ("b", 2), ("c", 1)]);
    let state = WindowState::resolve(roster.anchor_index(), roster.len(), 2);
    assert_eq!(state.top_index, 0);
    assert_eq!(state.range(), 0..2);
    assert_eq!(state.anchor_slot, None);
}

#[test]
fn window_data_index_respects_bounds() {
    let state = WindowState::at(3, Some(4), 5, 3);
    assert_eq!(state.visible_count, 3);
    assert_eq!(state.anchor_slot, Some(1));
    assert_eq!(state.data_index(0, 5), Some(3));
    assert_eq!(state.data_index(1, 5), Some(4));
    // Past the end of the roster.
    assert_eq!(state.data_index(2, 5), None);
    // Past the window.
    assert_eq!(state.data_index(3, 5), None);
    assert_eq!(state.slot_of(2), None);
    assert_eq!(state.slot_of(5), Some(2));
}

#[test]
fn offsets_stack_downward() {
    assert_eq!(row_offset(0, 1.5), 0.0);
    assert_eq!(row_offset(3, 1.5), -4.5);
    assert_eq!(shifted_row_offset(1, -2, 1.0), -3.0);
    assert_eq!(shifted_row_offset(3, 2, 1.0), -1.0);
    assert_eq!(anchor_focus_offset(0.5, 12, 10, 2.0), 4.5);
}

#[test]
fn mutate_is_deterministic_for_a_seed() {
    let base = fifty_with_anchor_at(20);
    let mutation = ScoreMutation::default();

    let mut a = base.clone();
    let mut b = base.clone();
    a.mutate_scores_seeded(7, &mutation);
    b.mutate_scores_seeded(7, &mutation);
    assert_eq!(a.entities(), b.entities());
    assert_eq!(a.anchor_index(), b.anchor_index());
    assert_ranked(&a);
}

#[test]
fn mutate_with_zero_probability_only_moves_the_anchor() {
    let mut roster = roster_of(&[("me", 500), ("a", 900), ("b", 100)]);
    let mutation = ScoreMutation::new(ScoreDelta::new(50, 50), ScoreDelta::new(1, 5), 0.0);
    roster.mutate_scores_seeded(3, &mutation);

    let score = |id: &str| roster.entities().iter().find(|e| e.id == id).map(|e| e.score);
    assert_eq!(score("a"), Some(900));
    assert_eq!(score("b"), Some(100));
    let me = score("me").unwrap();
    assert!(me == 450 || me == 550, "anchor moved by exactly 50, got {me}");
}

#[test]
fn mutate_floors_scores_at_zero() {
    let mut roster = roster_of(&[("me", 1), ("a", 0), ("b", 2)]);
    let mutation = ScoreMutation::new(ScoreDelta::new(100, 200), ScoreDelta::new(100, 200), 1.0);
    for seed in 0..32 {
        roster.mutate_scores_seeded(seed, &mutation);
        assert_ranked(&roster);
    }
}

#[test]
fn mutate_without_anchor_is_fine() {
    let mut roster = roster_of(&[("a", 10), ("b", 20)]);
    roster.mutate_scores_seeded(1, &ScoreMutation::default());
    assert_eq!(roster.anchor_index(), None);
    assert_ranked(&roster);
}

#[test]
fn re_rank_is_idempotent() {
    let mut roster = fifty_with_anchor_at(10);
    roster.mutate_scores_seeded(99, &ScoreMutation::default());
    let once: Vec<Entity> = roster.entities().to_vec();
    let anchor = roster.anchor_index();
    roster.re_rank();
    roster.re_rank();
    assert_eq!(roster.entities(), once.as_slice());
    assert_eq!(roster.anchor_index(), anchor);
}

#[test]
fn score_delta_normalizes_bounds() {
    let delta = ScoreDelta::new(9, 3);
    assert_eq!(delta, ScoreDelta { min: 3, max: 9 });
}

#[test]
fn pool_hands_out_prewarmed_slots_in_order() {
    let mut pool = RowSlotPool::new(3);
    assert_eq!(pool.capacity(), 3);
    assert_eq!(pool.available(), 3);

    let ids: Vec<usize> = (0..3).map(|_| pool.acquire().index()).collect();
    assert_eq!(ids, [0, 1, 2]);
    assert_eq!(pool.in_use(), 3);
    assert_eq!(pool.available(), 0);
}

#[test]
fn pool_grows_past_capacity() {
    let mut pool = RowSlotPool::new(1);
    let a = pool.acquire();
    let b = pool.acquire();
    assert_ne!(a, b);
    assert_eq!(pool.len(), 2);
    assert!(pool.is_leased(a) && pool.is_leased(b));
}

#[test]
fn pool_reuses_released_slots_and_rejects_double_release() {
    let mut pool = RowSlotPool::new(2);
    let a = pool.acquire();
    let b = pool.acquire();

    if let Some(slot) = pool.get_mut(a) {
        slot.binding = Some(4);
        slot.opacity = 0.0;
    }
    assert!(pool.release(a));
    assert!(!pool.release(a));
    assert!(!pool.is_leased(a));
    assert!(!pool.get(a).unwrap().visible);

    let c = pool.acquire();
    assert_eq!(c, a, "most recently released slot comes back first");
    let slot = pool.get(c).unwrap();
    assert!(slot.visible);
    assert_eq!(slot.binding, None);
    assert_eq!(slot.opacity, 1.0);
    assert_eq!(pool.len(), 2);
    assert!(pool.is_leased(b));
}

fn planner(max_visible: usize) -> TransitionPlanner {
    TransitionPlanner::new(&WindowOptions::new(max_visible, 1.0)).unwrap()
}

#[test]
fn scenario_anchor_drops_two_places() {
    let mut roster = roster_of(&[("me", 100), ("a", 90), ("b", 80)]);
    let previous = WindowState::resolve(roster.anchor_index(), roster.len(), 3);
    let old_anchor = roster.anchor_snapshot();

    roster.set_roster(vec![entity("me", 70), entity("a", 90), entity("b", 80)]);
    assert_eq!(ids(&roster), ["a", "b", "me"]);
    assert_eq!(roster.anchor_index(), Some(2));

    let plan = planner(3).plan(&previous, old_anchor, &roster);
    assert_eq!(plan.delta_rows, -2);
    assert_eq!(plan.new_top, 0);
    assert_eq!(plan.anchor_slot(), Some(2));
    assert_eq!(plan.overlap_slot, Some(0));

    let anchor = plan.slots[2];
    assert!(anchor.is_anchor);
    assert_eq!(anchor.start_offset, anchor.end_offset);
    assert_eq!(anchor.end_offset, -2.0);

    for j in 0..2 {
        let slot = plan.slots[j];
        assert!(!slot.is_anchor);
        assert_eq!(slot.start_offset, -((j as f32 + 2.0) * 1.0));
        assert_eq!(slot.end_offset, -(j as f32));
    }
    assert_eq!(plan.slots[0].hidden_for_ms, Some(500));
    assert_eq!(plan.slots[1].hidden_for_ms, None);

    let Motion::Shift {
        duration_ms,
        moves,
        label,
        emphasis,
        ..
    } = &plan.motion
    else {
        panic!("expected a shift, got {:?}", plan.motion);
    };
    assert_eq!(*duration_ms, 450);
    assert_eq!(moves.len(), 2);
    assert!(moves.iter().all(|m| m.slot != 2));
    let label = label.expect("anchor labels animate");
    assert_eq!(label.from, LabelValues { rank: 1, score: 100 });
    assert_eq!(label.to, LabelValues { rank: 3, score: 70 });
    assert_eq!(emphasis.map(|e| e.slot), Some(2));
}

#[test]
fn overlap_slot_follows_the_anchor_shift() {
    // Ten entities, anchor climbs from index 5 to 3 in a window of five.
    let mut entities: Vec<Entity> = (0..9)
        .map(|i| entity(&format!("p{i}"), 1000 - i * 100))
        .collect();
    entities.push(entity("me", 550));
    let mut roster = RosterStore::from_entities(entities);
    assert_eq!(roster.anchor_index(), Some(5));
    let previous = WindowState::resolve(roster.anchor_index(), roster.len(), 5);
    let old_anchor = roster.anchor_snapshot();

    let mut next: Vec<Entity> = roster.entities().to_vec();
    for e in &mut next {
        if e.id == "me" {
            e.score = 750;
        }
    }
    roster.set_roster(next);
    assert_eq!(roster.anchor_index(), Some(3));

    let plan = planner(5).plan(&previous, old_anchor, &roster);
    assert_eq!(plan.delta_rows, 2);
    assert_eq!(plan.new_top, 1);
    assert_eq!(plan.anchor_slot(), Some(2));
    assert_eq!(plan.overlap_slot, Some(4));
    let hidden: Vec<usize> = plan
        .slots
        .iter()
        .filter(|s| s.hidden_for_ms.is_some())
        .map(|s| s.slot)
        .collect();
    assert_eq!(hidden, [4]);
    assert_eq!(plan.slots[4].start_offset, -2.0);
    assert_eq!(plan.slots[0].start_offset, 2.0);
}

#[test]
fn overlap_outside_the_window_is_dropped() {
    let mut roster = fifty_with_anchor_at(2);
    let previous = WindowState::resolve(roster.anchor_index(), roster.len(), 5);
    let old_anchor = roster.anchor_snapshot();

    let mut next: Vec<Entity> = roster.entities().to_vec();
    for e in &mut next {
        if e.id == "me" {
            e.score = 1;
        }
    }
    roster.set_roster(next);
    assert_eq!(roster.anchor_index(), Some(49));

    let plan = planner(5).plan(&previous, old_anchor, &roster);
    assert_eq!(plan.delta_rows, -47);
    assert_eq!(plan.overlap_slot, None);
    assert!(plan.slots.iter().all(|s| s.hidden_for_ms.is_none()));
}

#[test]
fn unchanged_rank_settles_with_a_pulse_and_counts_the_score() {
    let mut roster = roster_of(&[("a", 300), ("me", 200), ("b", 100)]);
    let previous = WindowState::resolve(roster.anchor_index(), roster.len(), 3);
    let old_anchor = roster.anchor_snapshot();

    roster.set_roster(vec![entity("a", 300), entity("me", 210), entity("b", 100)]);
    let plan = planner(3).plan(&previous, old_anchor, &roster);

    assert_eq!(plan.delta_rows, 0);
    assert!(plan.is_settle());
    assert!(plan.moves().is_empty());
    assert!(!plan.finalizes_immediately());
    assert_eq!(plan.overlap_slot, None);
    for slot in &plan.slots {
        assert_eq!(slot.start_offset, slot.end_offset);
        assert_eq!(slot.hidden_for_ms, None);
    }
    assert_eq!(
        plan.motion,
        Motion::Settle {
            finalize_after_ms: 225,
            pulse: Some(Pulse {
                slot: 1,
                scale: 0.06,
                duration_ms: 250,
            }),
            label: Some(LabelTween {
                slot: 1,
                from: LabelValues { rank: 2, score: 200 },
                to: LabelValues { rank: 2, score: 210 },
                duration_ms: 225,
                easing: Easing::InOutCubic,
            }),
            emphasis: Some(Emphasis {
                slot: 1,
                lift: 1.25,
                duration_ms: 250,
                easing_in: Easing::OutQuad,
                easing_out: Easing::InQuad,
            }),
        }
    );
}

#[test]
fn settle_delay_has_a_floor() {
    let options = TransitionOptions::default().with_duration_ms(100);
    assert_eq!(options.settle_delay_ms(), 180);
    assert_eq!(options.effective_duration_ms(), 100);
    let options = options.with_duration_ms(0);
    assert_eq!(options.effective_duration_ms(), 10);
}

#[test]
fn single_row_window_shift_has_nothing_to_slide() {
    let mut roster = roster_of(&[("me", 10), ("a", 5)]);
    let previous = WindowState::resolve(roster.anchor_index(), roster.len(), 1);
    let old_anchor = roster.anchor_snapshot();
    roster.set_roster(vec![entity("me", 1), entity("a", 5)]);

    let plan = planner(1).plan(&previous, old_anchor, &roster);
    assert_eq!(plan.delta_rows, -1);
    assert_eq!(plan.new_top, 1);
    assert!(plan.finalizes_immediately());
}

#[test]
fn missing_anchor_plans_a_plain_settle() {
    let mut roster = roster_of(&[("me", 10), ("a", 5)]);
    let previous = WindowState::resolve(roster.anchor_index(), roster.len(), 3);
    let old_anchor = roster.anchor_snapshot();
    roster.set_roster(vec![entity("a", 5), entity("b", 4)]);

    let plan = planner(3).plan(&previous, old_anchor, &roster);
    assert_eq!(plan.delta_rows, 0);
    assert_eq!(plan.new_top, 0);
    assert_eq!(plan.anchor_slot(), None);
    assert!(matches!(plan.motion, Motion::Settle { pulse: None, .. }));
}

#[test]
fn options_validation_is_fatal() {
    assert_eq!(
        WindowOptions::default().validate(),
        Err(SetupError::MissingRowTemplate)
    );
    let bad_step = WindowOptions::default().with_row_template(Some(RowTemplate::new(0.0, 0.0)));
    assert_eq!(bad_step.validate(), Err(SetupError::InvalidRowStep(0.0)));
    let no_rows = WindowOptions::new(0, 1.0);
    assert_eq!(no_rows.validate(), Err(SetupError::NoVisibleRows));
    assert!(TransitionPlanner::new(&no_rows).is_err());

    let ok = WindowOptions::default().with_row_template(Some(RowTemplate::default()));
    let step = ok.validate().unwrap();
    assert!((step - 1.1).abs() < 1e-6);
}

#[test]
fn setup_error_messages() {
    assert_eq!(
        SetupError::MissingRowTemplate.to_string(),
        "row template is not configured"
    );
    assert_eq!(
        SetupError::InvalidRowStep(-1.0).to_string(),
        "row step must be a positive finite number (got -1)"
    );
}

#[cfg(feature = "json")]
mod loader {
    use super::*;

    #[test]
    fn parses_players_with_label_or_nickname() {
        let text = r#"{"players": [
            {"id": "a", "label": "Alice", "score": 10},
            {"id": "me", "nickname": "Me", "score": 30},
            {"id": "z", "score": -4}
        ]}"#;
        let roster = RosterStore::from_entities(parse_roster(text));
        assert_eq!(ids(&roster), ["me", "a", "z"]);
        assert_eq!(roster.entities()[0].label, "Me");
        assert_eq!(roster.entities()[1].label, "Alice");
        assert_eq!(roster.entities()[2].label, "");
        assert_eq!(roster.entities()[2].score, 0);
    }

    #[test]
    fn absent_or_malformed_input_is_empty() {
        assert!(parse_roster("{}").is_empty());
        assert!(parse_roster(r#"{"players": null}"#).is_empty());
        assert!(parse_roster("not json").is_empty());
        assert!(parse_roster(r#"{"players": [{"label": "no id"}]}"#).is_empty());
        assert!(matches!(try_parse_roster("["), Err(LoadError::Json(_))));
    }

    #[test]
    fn first_source_with_content_wins() {
        let missing = RosterSource::File(std::path::PathBuf::from(
            "/definitely/not/here/roster.json",
        ));
        assert!(matches!(missing.try_load(), Err(LoadError::Io(_))));
        assert!(missing.load().is_empty());

        let sources = [
            missing,
            RosterSource::Text(String::from("   ")),
            RosterSource::Text(String::from(r#"{"players":[{"id":"me","score":1}]}"#)),
            RosterSource::Text(String::from(r#"{"players":[{"id":"x","score":2}]}"#)),
        ];
        let loaded = load_first(&sources);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "me");

        assert!(load_first(&[]).is_empty());
    }
}

proptest! {
    #[test]
    fn re_rank_orders_any_roster(scores in prop::collection::vec(0u32..50, 0..40), anchor in any::<prop::sample::Index>()) {
        let mut entities: Vec<Entity> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| entity(&format!("e{i}"), s))
            .collect();
        if !entities.is_empty() {
            let i = anchor.index(entities.len());
            entities[i].id = String::from("me");
        }
        let roster = RosterStore::from_entities(entities);
        assert_ranked(&roster);
        if roster.is_empty() {
            prop_assert_eq!(roster.anchor_index(), None);
        } else {
            let i = roster.anchor_index().expect("anchor present");
            prop_assert_eq!(roster.entities()[i].id.as_str(), "me");
        }
    }

    #[test]
    fn top_index_stays_in_bounds(anchor in 0usize..500, total in 0usize..500, max_visible in 1usize..60) {
        let top = compute_top_index(anchor, total, max_visible);
        prop_assert!(top <= total.saturating_sub(max_visible));
        if total <= max_visible {
            prop_assert_eq!(top, 0);
        }
        if anchor < total {
            let state = WindowState::at(top, Some(anchor), total, max_visible);
            prop_assert!(state.anchor_slot.is_some());
            prop_assert!(state.top_index + state.visible_count <= total);
        }
    }

    #[test]
    fn mutation_keeps_scores_valid_and_moves_the_anchor(seed in any::<u64>(), size in 1usize..40) {
        let mut entities: Vec<Entity> = (0..size)
            .map(|i| entity(&format!("e{i:02}"), 1000 + (i as u32) * 3))
            .collect();
        entities.push(entity("me", 1000));
        let mut roster = RosterStore::from_entities(entities);
        let mutation = ScoreMutation::new(ScoreDelta::new(5, 30), ScoreDelta::new(5, 2000), 0.5);
        let before = roster.anchor().map(|e| e.score);

        roster.mutate_scores_seeded(seed, &mutation);
        assert_ranked(&roster);
        let after = roster.anchor().map(|e| e.score);
        prop_assert_ne!(before, after);

        let snapshot: Vec<Entity> = roster.entities().to_vec();
        roster.re_rank();
        prop_assert_eq!(roster.entities(), snapshot.as_slice());
    }

    #[test]
    fn delta_rows_is_zero_iff_anchor_index_is_unchanged(seed in any::<u64>(), size in 2usize..30, max_visible in 1usize..10) {
        let mut entities: Vec<Entity> = (0..size)
            .map(|i| entity(&format!("e{i:02}"), 500 + (i as u32) * 7))
            .collect();
        entities.push(entity("me", 560));
        let mut roster = RosterStore::from_entities(entities);
        let previous = WindowState::resolve(roster.anchor_index(), roster.len(), max_visible);
        let old_anchor = roster.anchor_snapshot();

        roster.mutate_scores_seeded(seed, &ScoreMutation::default());
        let plan = planner(max_visible).plan(&previous, old_anchor, &roster);

        let unchanged = old_anchor.map(|a| a.index) == roster.anchor_index();
        prop_assert_eq!(plan.delta_rows == 0, unchanged);
        prop_assert_eq!(plan.is_settle(), unchanged);
        prop_assert!(plan.new_top <= roster.len().saturating_sub(max_visible));
    }
}
