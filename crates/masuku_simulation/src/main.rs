//! Headless симуляция Masuku
//!
//! Прогоняет кампанию без рендера со скриптовым вводом (идём вправо,
//! периодически бьём) и печатает состояние каждые 100 тиков.

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;

use masuku_simulation::{
    create_headless_app, log_error, log_info, AttackTable, ControlFrame, DeterministicRng, EncounterRes,
    Outcome, PlayerInput, SimulationConfig, SimulationPlugin,
};

const MAX_TICKS: u32 = 20_000;

fn main() {
    let config = SimulationConfig::default();
    println!("Starting Masuku headless simulation (seed: {})", config.seed);

    let mut app = create_headless_app(config.seed);

    let attacks = match AttackTable::builtin() {
        Ok(table) => Arc::new(table),
        Err(err) => {
            log_error(&format!("Attack table rejected: {}", err));
            std::process::exit(1);
        }
    };
    log_info(&format!("Loaded {} attacks", attacks.len()));
    app.add_plugins(SimulationPlugin::new(attacks, config));

    for tick in 0..MAX_TICKS {
        let input = scripted_input(app.world_mut().resource_mut::<DeterministicRng>().rng.gen_range(0..12));
        app.insert_resource(PlayerInput(input));
        app.world_mut().run_schedule(FixedUpdate);

        let encounter = &app.world().resource::<EncounterRes>().0;
        if tick % 100 == 0 {
            println!(
                "Tick {}: stage {:?}, {} fighters, scroll {:.0}, score {}",
                tick,
                encounter.stage_index(),
                encounter.fighters().len(),
                encounter.field().scroll_x,
                encounter.score()
            );
        }
        if encounter.outcome() != Outcome::InProgress {
            println!("Finished at tick {}: {:?}", tick, encounter.outcome());
            break;
        }
    }

    println!("Simulation complete!");
}

/// Всегда вправо, изредка punch / kick
fn scripted_input(roll: u32) -> ControlFrame {
    let frame = ControlFrame::idle().with_axis(1.0, 0.0);
    match roll {
        0 => frame.with_button(0),
        1 => frame.with_button(1),
        _ => frame,
    }
}
