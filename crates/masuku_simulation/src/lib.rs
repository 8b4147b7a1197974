//! Masuku Simulation Core
//!
//! Детерминированная симуляция side-scrolling beat 'em up: бойцы, AI врагов,
//! физика оружия, стадии. Рендер/аудио/ввод внешние: симуляция получает
//! `ControlFrame` каждый тик и отдаёт наружу cue'ы и snapshot'ы.
//!
//! Bevy используется только как shell (plugin + fixed timestep 60Hz);
//! вся логика тика это plain Rust внутри `Encounter::step`.

use std::sync::Arc;

use bevy::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod config;
pub mod controls;
pub mod encounter;
pub mod error;
pub mod kinematics;
pub mod logger;
pub mod physics;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export для удобства
pub use combat::{Attack, AttackTable, Fighter};
pub use config::{Campaign, SimulationConfig};
pub use controls::ControlFrame;
pub use encounter::{Cue, Encounter, EncounterSnapshot, Outcome, SimContext};
pub use error::ConfigError;
pub use logger::*;

/// Главный plugin симуляции
pub struct SimulationPlugin {
    pub attacks: Arc<AttackTable>,
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn new(attacks: Arc<AttackTable>, config: SimulationConfig) -> Self {
        Self { attacks, config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let mut rng = DeterministicRng::new(self.config.seed);
        // Encounter получает свой поток, DeterministicRng остаётся хосту
        let ctx = SimContext::new(ChaCha8Rng::seed_from_u64(rng.rng.next_u64()), self.attacks.clone())
            .with_debug_logging(self.config.debug_logging);
        let encounter = Encounter::new(encounter::stages_for(self.config.campaign), ctx);

        app
            // Fixed timestep 60Hz: один FixedUpdate = один тик игры
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .insert_resource(rng)
            .insert_resource(self.config.clone())
            .insert_resource(AttackTableRes(self.attacks.clone()))
            .insert_resource(PlayerInput::default())
            .insert_resource(EncounterRes(encounter))
            .add_event::<CueEvent>()
            .add_systems(FixedUpdate, (step_encounter, forward_cues).chain());
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Загруженная таблица атак (shared, read-only)
#[derive(Resource, Clone)]
pub struct AttackTableRes(pub Arc<AttackTable>);

/// Input текущего тика (пишет хост до FixedUpdate)
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerInput(pub ControlFrame);

#[derive(Resource, Debug)]
pub struct EncounterRes(pub Encounter);

/// Cue симуляции для внешних слоёв (аудио, UI)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CueEvent(pub Cue);

fn step_encounter(input: Res<PlayerInput>, mut encounter: ResMut<EncounterRes>) {
    encounter.0.step(&input.0);
}

fn forward_cues(mut encounter: ResMut<EncounterRes>, mut cues: EventWriter<CueEvent>) {
    for cue in encounter.0.drain_cues() {
        cues.write(CueEvent(cue));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot encounter'а для сравнения детерминизма
pub fn world_snapshot(world: &World) -> Option<Vec<u8>> {
    let encounter = world.get_resource::<EncounterRes>()?;
    encounter.0.snapshot_bytes().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::attacks;

    fn plugin_app(seed: u64) -> App {
        let mut app = create_headless_app(seed);
        let config = SimulationConfig {
            seed,
            ..Default::default()
        };
        app.add_plugins(SimulationPlugin::new(attacks(), config));
        app
    }

    #[test]
    fn test_plugin_steps_encounter_on_fixed_update() {
        let mut app = plugin_app(7);
        for _ in 0..10 {
            app.world_mut().run_schedule(FixedUpdate);
        }

        let encounter = &app.world().resource::<EncounterRes>().0;
        assert_eq!(encounter.frame(), 10);
        // Пустая интро-стадия длится один тик
        assert_eq!(encounter.stage_index(), Some(1));
    }

    #[test]
    fn test_cues_forwarded_as_events() {
        let mut app = plugin_app(7);
        app.world_mut().run_schedule(FixedUpdate);

        let events = app.world().resource::<Events<CueEvent>>();
        let mut reader = events.get_cursor();
        let cues: Vec<Cue> = reader.read(events).map(|e| e.0.clone()).collect();
        assert!(cues.contains(&Cue::StageStarted { index: 0 }));
        // Cue'ы не копятся в encounter'е
        assert!(app.world().resource::<EncounterRes>().0.context().cues().is_empty());
    }

    #[test]
    fn test_world_snapshot_is_seed_deterministic() {
        let run = |seed| {
            let mut app = plugin_app(seed);
            app.insert_resource(PlayerInput(ControlFrame::idle().with_axis(1.0, 0.0)));
            for _ in 0..120 {
                app.world_mut().run_schedule(FixedUpdate);
            }
            world_snapshot(app.world())
        };
        assert!(run(3).is_some());
        assert_eq!(run(3), run(3), "Одинаковый seed должен давать одинаковый snapshot");
    }
}
