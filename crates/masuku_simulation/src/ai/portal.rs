//! Portal: неподвижный спавнер врагов.
//!
//! PAUSE (растёт, start_timer) → PORTAL (порождает врагов) → PORTAL_EXPLODE
//! (health ≤ 0) → через 50 кадров теряет жизнь. Враг создаётся заранее, за
//! 96 тиков до появления (анимация генерации показывает, кто выйдет), и
//! попадает в roster через spawn request.

use rand::seq::SliceRandom;

use crate::ai::AiState;
use crate::combat::{Archetype, Fighter, FighterBody, SoundRef};
use crate::config::{PORTAL_EXPLODE_TICKS, PORTAL_GENERATE_TICKS, PORTAL_RETRY_TICKS};
use crate::encounter::roster;
use crate::encounter::scene::Scene;
use crate::encounter::stage::EnemySpawn;
use crate::encounter::{SimContext, Spawn};

/// Параметры портала из описания стадии
#[derive(Debug, Clone, PartialEq)]
pub struct PortalSpec {
    /// Кого порождает (выбор случайный)
    pub roster: Vec<Archetype>,
    pub spawn_interval: i32,
    /// Прибавка к интервалу после каждого спавна
    pub spawn_interval_change: i32,
    pub max_spawn_interval: i32,
    /// Лимит врагов на уровне (включая сам портал)
    pub max_enemies: usize,
}

impl Default for PortalSpec {
    fn default() -> Self {
        Self {
            roster: vec![Archetype::Vax],
            spawn_interval: 60,
            spawn_interval_change: 0,
            max_spawn_interval: 600,
            max_enemies: 5,
        }
    }
}

impl PortalSpec {
    pub fn new(roster: Vec<Archetype>, spawn_interval: i32) -> Self {
        Self {
            roster,
            spawn_interval,
            ..Default::default()
        }
    }

    pub fn with_interval_change(mut self, change: i32) -> Self {
        self.spawn_interval_change = change;
        self
    }

    pub fn with_max_enemies(mut self, max_enemies: usize) -> Self {
        self.max_enemies = max_enemies;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PortalState {
    pub spec: PortalSpec,
    pub spawn_interval: i32,
    pub spawn_timer: i32,
    /// Враг, который сейчас "генерируется"
    pub spawning: Option<Box<Fighter>>,
    /// Куда смотрит порождаемый враг (0 = влево, 1 = вправо)
    pub spawn_facing: u8,
}

impl PortalState {
    pub fn new(spec: PortalSpec) -> Self {
        Self {
            spawn_interval: spec.spawn_interval,
            spawn_timer: spec.spawn_interval,
            spec,
            spawning: None,
            spawn_facing: 0,
        }
    }
}

pub(crate) fn run(
    portal: &mut PortalState,
    state: &mut AiState,
    body: &mut FighterBody,
    scene: &Scene<'_>,
    ctx: &mut SimContext,
) {
    body.frame += 1;

    let current = *state;
    match current {
        AiState::Portal if body.health <= 0 => {
            *state = AiState::PortalExplode;
            body.frame = 0;
            ctx.play(&SoundRef::new("sfx/portal/portal_destroyed"));
        }
        AiState::Portal => {
            portal.spawn_timer -= 1;
            if portal.spawn_timer <= 0 && portal.spawning.is_some() {
                // Анимация закончилась: враг выходит
                if let Some(enemy) = portal.spawning.take() {
                    ctx.spawn(Spawn::Enemy(enemy));
                }
                portal.spawn_interval =
                    (portal.spawn_interval + portal.spec.spawn_interval_change).min(portal.spec.max_spawn_interval);
                portal.spawn_timer = portal.spawn_interval;
            } else if portal.spawning.is_none() && portal.spawn_timer <= PORTAL_GENERATE_TICKS {
                prepare_spawn(portal, body, scene, ctx);
            }
        }
        AiState::PortalExplode => {
            if body.frame > PORTAL_EXPLODE_TICKS {
                body.lives -= 1;
            }
        }
        _ => {}
    }
}

fn prepare_spawn(portal: &mut PortalState, body: &mut FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) {
    // Сам портал + остальные враги + те, кто уже в очереди на спавн
    let population = scene.peers.enemies().count() + 1 + ctx.pending_enemies();
    if population >= portal.spec.max_enemies {
        portal.spawn_timer = PORTAL_RETRY_TICKS;
        return;
    }
    let Some(&archetype) = portal.spec.roster.choose(&mut ctx.rng) else {
        return;
    };

    let player_x = scene.peers.player().map(|p| p.body.pos.x).unwrap_or(body.pos.x);
    portal.spawn_facing = if body.pos.x > player_x { 0 } else { 1 };

    let id = ctx.next_fighter_id();
    let enemy = roster::enemy(&EnemySpawn::new(archetype, body.pos), id, &mut ctx.rng);
    portal.spawning = Some(Box::new(enemy));
    body.frame = 0;
    ctx.play(&SoundRef::new("sfx/portal/portal_enemy_spawn"));
}
