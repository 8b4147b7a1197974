//! Combat integration test
//!
//! Полная кампания headless со скриптовым вводом + дуэль героя с врагом.
//!
//! Проверяем:
//! - Stamina/health/lives инварианты на каждом тике
//! - Связи holder ↔ weapon не висят
//! - Комбо героя: punch → punch2 → uppercut сбивает с ног
//! - Нет паники/крашей

use std::sync::Arc;

use bevy::math::Vec2;
use masuku_simulation::ai::AiState;
use masuku_simulation::combat::{Archetype, FallingState};
use masuku_simulation::config::MIN_STAMINA;
use masuku_simulation::encounter::{EnemySpawn, FighterId, Stage};
use masuku_simulation::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn attacks() -> Arc<AttackTable> {
    Arc::new(AttackTable::builtin().expect("builtin attack table"))
}

/// Helper: encounter без стадий-врагов, только заданный противник
fn create_duel(seed: u64, enemy: EnemySpawn) -> (Encounter, FighterId) {
    let ctx = SimContext::seeded(seed, attacks());
    let mut encounter = Encounter::new(vec![Stage::new(0.0)], ctx);
    let id = encounter.spawn_enemy(&enemy);
    (encounter, id)
}

fn check_invariants(encounter: &Encounter, tick: usize) {
    let fighters = encounter.fighters();
    assert!(fighters[0].is_player(), "tick {}: player must stay first", tick);

    for fighter in fighters {
        let body = &fighter.body;
        assert!(
            body.stamina >= MIN_STAMINA && body.stamina <= body.max_stamina,
            "tick {}: fighter {:?} stamina {} out of range",
            tick,
            fighter.id,
            body.stamina
        );
        assert!(body.lives >= 0, "tick {}: negative lives", tick);
        if !body.knockdown_immune {
            assert!(body.health >= 0, "tick {}: fighter {:?} health {}", tick, fighter.id, body.health);
        }

        if let Some(id) = body.weapon {
            let weapon = encounter.weapons().iter().find(|w| w.id == id);
            assert!(
                weapon.is_some_and(|w| w.held && w.holder == Some(fighter.id)),
                "tick {}: fighter {:?} holds dangling weapon {:?}",
                tick,
                fighter.id,
                id
            );
        }
    }

    for weapon in encounter.weapons() {
        if let Some(holder) = weapon.holder {
            let owner = encounter.fighter(holder);
            assert!(
                owner.is_some_and(|f| f.body.weapon == Some(weapon.id)),
                "tick {}: weapon {:?} has dangling holder {:?}",
                tick,
                weapon.id,
                holder
            );
        }
        assert!(weapon.height_above_ground >= 0.0);
    }

    assert!(encounter.field().scroll_x <= encounter.max_scroll_x());
}

/// Test: кампания 5000 тиков без краша и с соблюдением инвариантов
#[test]
fn test_campaign_5000_ticks_invariants() {
    let config = SimulationConfig::default();
    let mut encounter = Encounter::from_config(&config, attacks());
    let mut input_rng = ChaCha8Rng::seed_from_u64(99);

    let mut last_scroll = 0.0;
    for tick in 0..5000 {
        let mut input = ControlFrame::idle().with_axis(1.0, input_rng.gen_range(-1..=1) as f32);
        if input_rng.gen_range(0..6) == 0 {
            input = input.with_button(input_rng.gen_range(0..4));
        }
        encounter.step(&input);
        encounter.drain_cues();

        check_invariants(&encounter, tick);
        assert!(encounter.field().scroll_x >= last_scroll, "camera never scrolls back");
        last_scroll = encounter.field().scroll_x;

        if encounter.outcome() != Outcome::InProgress {
            break;
        }
    }

    assert!(encounter.stage_index().is_some_and(|i| i >= 1), "campaign should get past the intro");
}

/// Test: комбо героя сбивает стоящего врага с ног
#[test]
fn test_hero_combo_knocks_enemy_down() {
    let spawn = EnemySpawn::new(Archetype::Vax, Vec2::new(470.0, 400.0)).with_start_timer(100_000);
    let (mut encounter, vax) = create_duel(42, spawn);

    // Жмём punch через тик: каждое нажатие это новый edge
    for tick in 0..80 {
        let input = if tick % 2 == 0 {
            ControlFrame::idle().with_button(0)
        } else {
            ControlFrame::idle()
        };
        encounter.step(&input);
        check_invariants(&encounter, tick);
    }

    let hero = encounter.player().expect("hero");
    assert_eq!(hero.body.last_attack.as_ref().map(|a| a.name.as_str()), Some("uppercut"));

    let enemy = encounter.fighter(vax).expect("vax still in roster");
    // punch (1) + punch2 (1) + uppercut (3)
    assert_eq!(enemy.body.health, 10);
    assert_eq!(enemy.body.falling_state, FallingState::Falling);
    assert_eq!(enemy.enemy_brain().map(|b| b.state), Some(AiState::KnockedDown));
}

/// Test: одинаковый seed, одинаковая дуэль (3 прогона)
#[test]
fn test_duel_deterministic_across_runs() {
    let run = || {
        let spawn = EnemySpawn::new(Archetype::Boss, Vec2::new(600.0, 400.0));
        let (mut encounter, _) = create_duel(42, spawn);
        encounter.place_weapon(masuku_simulation::physics::WeaponKind::Barrel, Vec2::new(650.0, 420.0));
        for tick in 0..1500 {
            let input = if tick % 10 == 0 {
                ControlFrame::idle().with_button(0)
            } else {
                ControlFrame::idle()
            };
            encounter.step(&input);
        }
        encounter.snapshot()
    };

    let first = run();
    for i in 1..3 {
        assert_eq!(first, run(), "Прогон {} отличается от первого", i);
    }
}
