//! Encounter: оркестратор одного прохождения.
//!
//! Порядок тика (строго последовательный):
//! 1. player (+ сбор бонусов) → враги в порядке roster'а
//! 2. оружие → обломки → бонусы
//! 3. спавн запрошенных сущностей
//! 4. скролл камеры, boss intro
//! 5. GC (очки за убранных врагов) → переход стадии / конец игры
//!
//! Игрок всегда `fighters[0]`.

use serde::Serialize;

use crate::ai::AiState;
use crate::combat::{Archetype, AttackTable, FallingState, Fighter};
use crate::config::{SimulationConfig, BOSS_INTRO_TICKS, OFFSCREEN_CULL, SCROLL_TRIGGER_X, WIDTH};
use crate::controls::ControlFrame;
use crate::physics::{tick_weapon, Debris, Weapon, WeaponKind};

pub mod context;
pub mod pickup;
pub mod roster;
pub mod scene;
pub mod stage;

pub use context::{Cue, FighterId, SimContext, SimRng, Spawn, WeaponId};
pub use pickup::{Pickup, PickupKind};
pub use scene::{split_roster, tick_fighter, Boundary, Field, Peers, Scene};
pub use stage::{stages_for, EnemySpawn, Stage};

#[cfg(test)]
mod encounter_tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy)]
struct BossIntro {
    boss: FighterId,
    remaining: i32,
}

pub struct Encounter {
    fighters: Vec<Fighter>,
    weapons: Vec<Weapon>,
    debris: Vec<Debris>,
    pickups: Vec<Pickup>,
    field: Field,
    ctx: SimContext,
    score: u32,
    stages: Vec<Stage>,
    /// None = ещё не начали (первая стадия стартует в первом тике)
    stage_index: Option<usize>,
    objects_created: bool,
    max_scroll_x: f32,
    scrolling: bool,
    boss_intro: Option<BossIntro>,
    outcome: Outcome,
}

impl Encounter {
    pub fn new(stages: Vec<Stage>, ctx: SimContext) -> Self {
        Self {
            fighters: vec![roster::hero()],
            weapons: Vec::new(),
            debris: Vec::new(),
            pickups: Vec::new(),
            field: Field::default(),
            ctx,
            score: 0,
            stages,
            stage_index: None,
            objects_created: false,
            max_scroll_x: 0.0,
            scrolling: false,
            boss_intro: None,
            outcome: Outcome::InProgress,
        }
    }

    pub fn from_config(config: &SimulationConfig, attacks: std::sync::Arc<AttackTable>) -> Self {
        let ctx = SimContext::seeded(config.seed, attacks).with_debug_logging(config.debug_logging);
        Self::new(stages_for(config.campaign), ctx)
    }

    // ===== Tick =====

    pub fn step(&mut self, input: &ControlFrame) {
        if self.outcome != Outcome::InProgress {
            return;
        }
        self.ctx.frame += 1;

        if let Some(brain) = self.fighters.first_mut().and_then(|p| p.player_brain_mut()) {
            brain.controls.update(input);
        }

        for index in 0..self.fighters.len() {
            tick_fighter(&mut self.fighters, index, &mut self.weapons, &self.field, &mut self.ctx);
            if index == 0 {
                self.player_collect();
            }
        }

        for index in 0..self.weapons.len() {
            tick_weapon(index, &mut self.weapons, &mut self.fighters, &mut self.ctx);
        }
        for debris in self.debris.iter_mut() {
            debris.tick();
        }
        for pickup in self.pickups.iter_mut() {
            pickup.tick();
        }

        self.apply_spawns();
        self.update_scroll();
        self.update_boss_intro();
        self.collect_garbage();
        self.check_progress();
    }

    fn player_collect(&mut self) {
        let Some(player) = self.fighters.first_mut() else {
            return;
        };
        if let Some(brain) = player.player_brain_mut() {
            brain.extra_life_timer -= 1;
        }
        for pickup in self.pickups.iter_mut() {
            if pickup.in_reach(player.body.pos) {
                self.score += pickup.collect(player, &mut self.ctx);
            }
        }
    }

    fn apply_spawns(&mut self) {
        for spawn in self.ctx.take_spawns() {
            match spawn {
                Spawn::Enemy(mut enemy) => {
                    enemy.spawned(&mut self.ctx);
                    self.fighters.push(*enemy);
                }
                Spawn::Weapon(weapon) => self.weapons.push(weapon),
                Spawn::Debris(debris) => self.debris.push(debris),
                Spawn::Pickup(pickup) => self.pickups.push(pickup),
            }
        }
    }

    fn update_scroll(&mut self) {
        let Some(player_x) = self.fighters.first().map(|p| p.body.pos.x) else {
            return;
        };
        let player_screen_x = self.field.screen_x(player_x);

        if self.scrolling {
            if self.field.scroll_x < self.max_scroll_x {
                // 1-4 px/тик в зависимости от того, насколько игрок близко к правому краю
                let diff = self.max_scroll_x - self.field.scroll_x;
                let speed = player_screen_x / (WIDTH / 4.0);
                if speed >= diff {
                    self.field.set_scroll(self.max_scroll_x);
                } else {
                    self.field.set_scroll(self.field.scroll_x + speed);
                }
            } else {
                self.scrolling = false;
            }
        } else if player_screen_x > SCROLL_TRIGGER_X && self.field.scroll_x < self.max_scroll_x {
            self.scrolling = true;
            // Враги стадии появляются, когда начинается скролл
            if let Some(index) = self.stage_index {
                if !self.objects_created {
                    crate::log_info(&format!("Started scrolling, creating objects of stage {}", index));
                    self.create_stage_objects(index);
                }
            }
        }
    }

    fn update_boss_intro(&mut self) {
        let Some(intro) = self.boss_intro.as_mut() else {
            return;
        };
        intro.remaining -= 1;
        if intro.remaining > 0 {
            return;
        }
        let boss = intro.boss;
        self.boss_intro = None;
        if let Some(brain) = self.fighter_mut(boss).and_then(|f| f.enemy_brain_mut()) {
            brain.release();
        }
    }

    fn collect_garbage(&mut self) {
        let gained: u32 = self
            .fighters
            .iter()
            .filter(|f| f.is_enemy() && f.should_remove())
            .map(|f| f.profile.score)
            .sum();
        self.score += gained;
        self.fighters.retain(|f| f.is_player() || !f.should_remove());

        self.debris.retain(|d| !d.expired());

        let field = self.field;
        self.weapons
            .retain(|w| !w.is_broken() && field.screen_x(w.pos.x) > -OFFSCREEN_CULL);
        self.pickups
            .retain(|p| !p.collected && field.screen_x(p.pos.x) > -OFFSCREEN_CULL);

        // Рвём связи holder ↔ weapon, если одна из сторон исчезла
        for weapon in self.weapons.iter_mut() {
            if let Some(holder) = weapon.holder {
                if !self.fighters.iter().any(|f| f.id == holder) {
                    weapon.dropped();
                }
            }
        }
        for fighter in self.fighters.iter_mut() {
            if let Some(id) = fighter.body.weapon {
                if !self.weapons.iter().any(|w| w.id == id) {
                    fighter.body.weapon = None;
                    fighter.body.pickup_animation = None;
                }
            }
        }
    }

    fn check_progress(&mut self) {
        if self.fighters.first().map_or(true, |p| p.should_remove()) {
            crate::log_info(&format!("Game over at tick {}, score {}", self.ctx.frame, self.score));
            self.outcome = Outcome::Lost;
            self.ctx.cue(Cue::GameOver);
            self.shutdown();
            return;
        }

        let no_enemies = !self.fighters.iter().any(|f| f.is_enemy());
        if no_enemies && self.field.scroll_x == self.max_scroll_x {
            self.next_stage();
        }
    }

    // ===== Stages =====

    fn next_stage(&mut self) {
        let index = self.stage_index.map_or(0, |i| i + 1);
        self.stage_index = Some(index);
        self.objects_created = false;

        let Some(stage) = self.stages.get(index) else {
            crate::log_info(&format!("All stages cleared, score {}", self.score));
            self.ctx.cue(Cue::Weather(None));
            self.ctx.cue(Cue::Victory);
            self.outcome = Outcome::Won;
            return;
        };

        crate::log_info(&format!("Stage {} (max scroll {})", index, stage.max_scroll_x));
        self.max_scroll_x = stage.max_scroll_x;
        self.ctx.cue(Cue::StageStarted { index });
        self.ctx.cue(Cue::Weather(stage.weather.clone()));
        if let Some(track) = &stage.music {
            self.ctx.cue(Cue::Music(track.clone()));
        }

        // Скролл не нужен (или уже идёт): объекты появляются сразу
        if self.scrolling || self.max_scroll_x <= self.field.scroll_x {
            self.create_stage_objects(index);
        }
    }

    fn create_stage_objects(&mut self, index: usize) {
        let Some(stage) = self.stages.get(index) else {
            return;
        };
        self.objects_created = true;

        for spawn in &stage.enemies {
            let id = self.ctx.next_fighter_id();
            let mut enemy = roster::enemy(spawn, id, &mut self.ctx.rng);
            enemy.spawned(&mut self.ctx);
            self.fighters.push(enemy);
        }
        for &(kind, pos) in &stage.weapons {
            let id = self.ctx.next_weapon_id();
            self.weapons.push(Weapon::of_kind(kind, id, pos, &mut self.ctx.rng));
        }
        for &(kind, pos) in &stage.pickups {
            self.pickups.push(Pickup::new(kind, pos));
        }

        if let Some(spawn) = &stage.boss {
            let id = self.ctx.next_fighter_id();
            let mut boss = roster::enemy(spawn, id, &mut self.ctx.rng);
            if let Some(brain) = boss.enemy_brain_mut() {
                brain.hold();
            }
            boss.spawned(&mut self.ctx);
            self.ctx.cue(Cue::BossIntro {
                boss: id,
                title: boss.profile.title.clone(),
                image: boss.profile.intro_image.clone(),
            });
            self.fighters.push(boss);
            self.boss_intro = Some(BossIntro {
                boss: id,
                remaining: BOSS_INTRO_TICKS,
            });
        }
    }

    /// Конец игры: заглушить двигатели оставшихся райдеров
    pub fn shutdown(&mut self) {
        for fighter in &self.fighters {
            if fighter.profile.archetype == Archetype::Scooterboy {
                self.ctx.cue(Cue::EngineStop { rider: fighter.id });
            }
        }
    }

    // ===== Внешний spawn sink (тесты, отладка) =====

    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> FighterId {
        let id = self.ctx.next_fighter_id();
        let mut enemy = roster::enemy(spawn, id, &mut self.ctx.rng);
        enemy.spawned(&mut self.ctx);
        self.fighters.push(enemy);
        id
    }

    pub fn place_weapon(&mut self, kind: WeaponKind, pos: bevy::math::Vec2) -> WeaponId {
        let id = self.ctx.next_weapon_id();
        self.weapons.push(Weapon::of_kind(kind, id, pos, &mut self.ctx.rng));
        id
    }

    // ===== Accessors =====

    pub fn fighters(&self) -> &[Fighter] {
        &self.fighters
    }

    pub fn player(&self) -> Option<&Fighter> {
        self.fighters.first()
    }

    pub fn player_mut(&mut self) -> Option<&mut Fighter> {
        self.fighters.first_mut()
    }

    pub fn fighter(&self, id: FighterId) -> Option<&Fighter> {
        self.fighters.iter().find(|f| f.id == id)
    }

    pub fn fighter_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.fighters.iter_mut().find(|f| f.id == id)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Fighter> + '_ {
        self.fighters.iter().filter(|f| f.is_enemy())
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn debris(&self) -> &[Debris] {
        &self.debris
    }

    pub fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn stage_index(&self) -> Option<usize> {
        self.stage_index
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn max_scroll_x(&self) -> f32 {
        self.max_scroll_x
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn boss_intro_remaining(&self) -> Option<i32> {
        self.boss_intro.map(|intro| intro.remaining)
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn frame(&self) -> u64 {
        self.ctx.frame
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        self.ctx.drain_cues()
    }

    // ===== Snapshot =====

    pub fn snapshot(&self) -> EncounterSnapshot {
        EncounterSnapshot {
            frame: self.ctx.frame,
            score: self.score,
            stage_index: self.stage_index,
            scroll_x: self.field.scroll_x,
            outcome: self.outcome,
            fighters: self
                .fighters
                .iter()
                .map(|f| FighterSnapshot {
                    id: f.id.0,
                    archetype: f.profile.archetype,
                    pos: [f.body.pos.x, f.body.pos.y],
                    height: f.body.height_above_ground,
                    facing: f.body.facing,
                    health: f.body.health,
                    stamina: f.body.stamina,
                    lives: f.body.lives,
                    falling_state: f.body.falling_state,
                    ai_state: f.enemy_brain().map(|b| b.state),
                    attack: f
                        .body
                        .last_attack
                        .as_ref()
                        .filter(|_| f.body.is_attacking())
                        .map(|a| a.name.clone()),
                    weapon: f.body.weapon.map(|w| w.0),
                })
                .collect(),
            weapons: self
                .weapons
                .iter()
                .map(|w| WeaponSnapshot {
                    id: w.id.0,
                    kind: w.kind,
                    pos: [w.pos.x, w.pos.y],
                    height: w.height_above_ground,
                    held: w.held,
                    durability: w.durability,
                })
                .collect(),
            debris: self.debris.len(),
            pickups: self.pickups.iter().map(|p| (p.kind, [p.pos.x, p.pos.y])).collect(),
        }
    }

    /// JSON snapshot (для сравнения прогонов)
    pub fn snapshot_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.snapshot())
    }
}

impl std::fmt::Debug for Encounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encounter")
            .field("frame", &self.ctx.frame)
            .field("stage_index", &self.stage_index)
            .field("fighters", &self.fighters.len())
            .field("weapons", &self.weapons.len())
            .field("score", &self.score)
            .field("outcome", &self.outcome)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FighterSnapshot {
    pub id: u32,
    pub archetype: Archetype,
    pub pos: [f32; 2],
    pub height: f32,
    pub facing: f32,
    pub health: i32,
    pub stamina: i32,
    pub lives: i32,
    pub falling_state: FallingState,
    pub ai_state: Option<AiState>,
    pub attack: Option<String>,
    pub weapon: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSnapshot {
    pub id: u32,
    pub kind: WeaponKind,
    pub pos: [f32; 2],
    pub height: f32,
    pub held: bool,
    pub durability: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterSnapshot {
    pub frame: u64,
    pub score: u32,
    pub stage_index: Option<usize>,
    pub scroll_x: f32,
    pub outcome: Outcome,
    pub fighters: Vec<FighterSnapshot>,
    pub weapons: Vec<WeaponSnapshot>,
    pub debris: usize,
    pub pickups: Vec<(PickupKind, [f32; 2])>,
}
