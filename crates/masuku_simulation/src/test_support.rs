//! Общие хелперы unit-тестов: встроенная таблица атак, бойцы в заданных точках.

use std::sync::Arc;

use bevy::math::Vec2;
use rand::SeedableRng;

use crate::combat::{Archetype, AttackTable, Fighter};
use crate::encounter::stage::EnemySpawn;
use crate::encounter::{roster, split_roster, Field, FighterId, Scene, SimContext, SimRng};
use crate::physics::Weapon;

pub fn attacks() -> Arc<AttackTable> {
    Arc::new(AttackTable::builtin().expect("builtin attack table is valid"))
}

pub fn ctx(seed: u64) -> SimContext {
    SimContext::seeded(seed, attacks())
}

pub fn hero_at(pos: Vec2) -> Fighter {
    let mut hero = roster::hero();
    hero.body.pos = pos;
    hero
}

/// Враг в `pos` (стартует в PAUSE со стандартным start_timer)
pub fn enemy_at(archetype: Archetype, id: u32, pos: Vec2) -> Fighter {
    let mut rng = SimRng::seed_from_u64(id as u64);
    roster::enemy(&EnemySpawn::new(archetype, pos), FighterId(id), &mut rng)
}

/// Запускает `f` со сценой для бойца `index`
pub fn with_scene<R>(
    fighters: &mut [Fighter],
    index: usize,
    weapons: &mut [Weapon],
    field: &Field,
    f: impl FnOnce(&mut Fighter, &mut Scene<'_>) -> R,
) -> R {
    let (me, peers) = split_roster(fighters, index).expect("index inside roster");
    let mut scene = Scene { peers, weapons, field };
    f(me, &mut scene)
}
