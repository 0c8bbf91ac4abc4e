use podium::{
    LabelValues, RosterSource, RosterStore, ScoreMutation, SlotId, WindowOptions, load_first,
};
use podium_adapter::{RowContent, RowRenderer, TweenEngine, WindowController};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const ROSTER_JSON: &str = r#"{
  "players": [
    { "id": "p01", "nickname": "Aurora", "score": 980 },
    { "id": "p02", "nickname": "Basil", "score": 940 },
    { "id": "p03", "nickname": "Cobalt", "score": 910 },
    { "id": "p04", "nickname": "Dune", "score": 870 },
    { "id": "p05", "nickname": "Ember", "score": 860 },
    { "id": "p06", "nickname": "Fjord", "score": 830 },
    { "id": "me", "nickname": "You", "score": 800 },
    { "id": "p07", "nickname": "Gale", "score": 790 },
    { "id": "p08", "nickname": "Haze", "score": 760 },
    { "id": "p09", "nickname": "Iris", "score": 720 },
    { "id": "p10", "nickname": "Jade", "score": 700 },
    { "id": "p11", "nickname": "Kite", "score": 650 },
    { "id": "p12", "nickname": "Lumen", "score": 610 }
  ]
}"#;

/// Prints binds and counts the per-frame writes a real view would apply.
#[derive(Default)]
struct PrintRenderer {
    frame_writes: usize,
}

impl RowRenderer for PrintRenderer {
    fn set_visible(&mut self, slot: SlotId, visible: bool) {
        if !visible {
            println!("  slot {:>2} hidden", slot.index());
        }
    }

    fn bind(&mut self, slot: SlotId, row: RowContent<'_>) {
        let marker = if row.is_anchor { "*" } else { " " };
        println!(
            "  slot {:>2} {marker} #{:<3} {:<8} {:>5}",
            slot.index(),
            row.rank,
            row.label,
            row.score
        );
    }

    fn set_offset(&mut self, _slot: SlotId, _offset: f32) {
        self.frame_writes += 1;
    }

    fn set_opacity(&mut self, slot: SlotId, opacity: f32) {
        if opacity < 1.0 {
            println!("  slot {:>2} hidden until its reveal delay", slot.index());
        }
    }

    fn set_labels(&mut self, _slot: SlotId, _labels: LabelValues) {
        self.frame_writes += 1;
    }

    fn set_container_offset(&mut self, offset: f32) {
        println!("  container offset {offset:.2}");
    }
}

fn main() {
    // Example: drive a 7-row window over a 13-player roster with a tween engine.
    //
    // The adapter flow is:
    // 1) load a roster (here from embedded JSON; a file path would come first in the chain)
    // 2) call `simulate_update` (or `update`) when scores change
    // 3) call `tick(now_ms)` every frame until the controller settles
    let entities = load_first(&[
        RosterSource::File("leaderboard.json".into()),
        RosterSource::Text(ROSTER_JSON.to_string()),
    ]);

    println!("initial window:");
    let mut c = WindowController::new(
        WindowOptions::new(7, 1.1),
        RosterStore::from_entities(entities),
        TweenEngine::new(),
        PrintRenderer::default(),
    )
    .expect("row template is configured");
    c.set_on_finalize(Some(|state: &podium::WindowState| {
        println!("  finalized: top={} anchor_slot={:?}", state.top_index, state.anchor_slot);
    }));

    let mut rng = SmallRng::seed_from_u64(2024);
    let mutation = ScoreMutation::default();
    let mut now_ms = 0u64;

    for round in 1..=3 {
        println!("update {round}:");
        let plan = c.simulate_update(&mut rng, &mutation);
        println!(
            "  plan: top {} -> {} delta_rows={} overlap={:?} settle={}",
            plan.old_top,
            plan.new_top,
            plan.delta_rows,
            plan.overlap_slot,
            plan.is_settle()
        );

        // Interrupt the second round halfway through.
        let stop_at = if round == 2 { now_ms + 200 } else { now_ms + 1_000 };
        while now_ms < stop_at {
            now_ms += 16;
            c.tick(now_ms);
        }
        if round == 2 {
            println!("  interrupted while transitioning={}", c.is_transitioning());
            println!("update 2b (mid-flight):");
            c.simulate_update(&mut rng, &mutation);
            for _ in 0..64 {
                now_ms += 16;
                c.tick(now_ms);
            }
        }
    }

    println!(
        "done: finalized {} of {} plans, {} frame writes",
        c.finalize_count(),
        c.generation(),
        c.renderer().frame_writes
    );
}
