//! Fighter: тело (физика + состояние боя) + мозг (intent provider).
//!
//! Один тик бойца:
//! 1. мозг врага думает (AI state machine, специализации тактик)
//! 2. тело: airborne integration → falling state machine → hit-stun →
//!    pickup overlay → STANDING (stamina, оружие, атака, движение, hit frames)
//!
//! Игрок и враги отличаются только `Brain`; общий state machine здесь.

use std::sync::Arc;

use bevy::math::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::ai::EnemyBrain;
use crate::combat::{Attack, IntentProvider, Profile, SoundRef};
use crate::combat::profile::Archetype;
use crate::config::{
    DEATH_TICKS, EXHAUSTED_STAMINA, FLYING_KICK_VEL, GET_UP_TICKS, JUMP_GRAVITY, KNOCKBACK_FRICTION,
    KNOCKDOWN_TICKS, MIN_STAMINA, PICKUP_RADIUS, PICKUP_TICKS, PLAYER_THROW_VEL, SCOOTER_DETACH_FRAME,
    THROWN_GRAVITY, THROWN_HEIGHT, THROWN_LANDING_FRAME, THROWN_OFFSET_X, WEAPON_HOLD_HEIGHT,
    WEAPON_HOLD_OFFSET_X,
};
use crate::controls::PlayerBrain;
use crate::encounter::scene::{Boundary, Scene};
use crate::encounter::{Cue, FighterId, Pickup, SimContext, Spawn};
use crate::kinematics::move_towards;
use crate::physics::weapon::{find_mut, Weapon, WeaponKind};
use crate::physics::Debris;

/// Knockdown state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FallingState {
    #[default]
    Standing,
    Falling,
    GettingUp,
    /// Схвачен боссом (невидим, ждёт броска)
    Grabbed,
    Thrown,
}

/// Физическое + боевое состояние бойца
#[derive(Debug, Clone)]
pub struct FighterBody {
    pub pos: Vec2,
    /// ±1
    pub facing: f32,
    /// x: knockback / flying kick / бросок, y: вертикаль в воздухе
    pub vel: Vec2,
    pub height_above_ground: f32,
    pub speed: Vec2,

    pub health: i32,
    pub start_health: i32,
    /// Инвариант: MIN_STAMINA ≤ stamina ≤ max_stamina
    pub stamina: i32,
    pub max_stamina: i32,
    pub lives: i32,

    pub falling_state: FallingState,
    /// Текущая атака, если attack_timer > 0
    pub last_attack: Option<Arc<Attack>>,
    /// > 0: атакуем, ≤ 0: тиков с конца последней атаки (со знаком минус)
    pub attack_timer: i32,
    pub weapon: Option<crate::encounter::WeaponId>,

    pub hit_timer: i32,
    /// Какой из двух кадров "ударили" показывать
    pub hit_frame: u8,
    /// Счётчик тиков текущего состояния/анимации
    pub frame: i32,
    pub pickup_animation: Option<WeaponKind>,
    pub walking: bool,
    pub half_hit_area: Vec2,

    pub use_die_animation: bool,
    pub just_knocked_off_mount: bool,
    /// Портал не падает
    pub knockdown_immune: bool,
}

impl FighterBody {
    pub fn new(pos: Vec2, speed: Vec2, health: i32, stamina: i32, lives: i32) -> Self {
        Self {
            pos,
            facing: 1.0,
            vel: Vec2::ZERO,
            height_above_ground: 0.0,
            speed,
            health,
            start_health: health,
            stamina,
            max_stamina: stamina,
            lives,
            falling_state: FallingState::Standing,
            last_attack: None,
            attack_timer: 0,
            weapon: None,
            hit_timer: 0,
            hit_frame: 0,
            frame: 0,
            pickup_animation: None,
            walking: false,
            half_hit_area: Vec2::new(25.0, 20.0),
            use_die_animation: false,
            just_knocked_off_mount: false,
            knockdown_immune: false,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_timer > 0
    }

    /// Кадр текущей атаки
    pub fn attack_frame(&self) -> usize {
        self.last_attack
            .as_ref()
            .map(|attack| attack.frame_at(self.frame))
            .unwrap_or(0)
    }

    /// Готов начать новую атаку / подобрать / бросить оружие.
    /// Выдохшийся боец восстанавливается втрое дольше.
    pub fn ready_to_act(&self) -> bool {
        let mut recovery = self.last_attack.as_ref().map(|a| a.recovery_time).unwrap_or(0);
        if self.stamina <= EXHAUSTED_STAMINA {
            recovery *= 3;
        }
        self.attack_timer <= -recovery
    }

    /// Боец за границей может идти только обратно внутрь
    pub fn apply_movement_boundaries(&mut self, dx: f32, dy: f32, boundary: &Boundary) {
        if dx < 0.0 && self.pos.x < boundary.left {
            self.pos.x = boundary.left;
        } else if dx > 0.0 && self.pos.x > boundary.right() {
            self.pos.x = boundary.right();
        }
        if dy < 0.0 && self.pos.y < boundary.top {
            self.pos.y = boundary.top;
        } else if dy > 0.0 && self.pos.y > boundary.bottom() {
            self.pos.y = boundary.bottom();
        }
    }

    /// Бросает оружие (связь рвётся с обеих сторон)
    pub fn drop_weapon(&mut self, weapons: &mut [Weapon]) {
        self.pickup_animation = None;
        if let Some(id) = self.weapon.take() {
            if let Some(weapon) = find_mut(weapons, id) {
                weapon.dropped();
            }
        }
    }

    pub fn grabbed(&mut self, weapons: &mut [Weapon]) {
        self.falling_state = FallingState::Grabbed;
        if self.weapon.is_some() {
            self.drop_weapon(weapons);
        }
    }

    pub fn thrown(&mut self, dir_x: f32) {
        self.falling_state = FallingState::Thrown;
        self.vel = Vec2::new(dir_x * PLAYER_THROW_VEL.x, PLAYER_THROW_VEL.y);
        self.facing = -dir_x;
        // Сдвиг под анимацию броска
        self.pos.x += dir_x * THROWN_OFFSET_X;
        self.height_above_ground = THROWN_HEIGHT;
    }

    fn regenerate_stamina(&mut self) {
        if self.stamina < self.max_stamina {
            self.stamina += 1;
        }
    }

    fn spend_stamina(&mut self, cost: i32) {
        self.stamina = (self.stamina - cost).max(MIN_STAMINA);
    }

    fn get_up(&mut self) {
        self.falling_state = FallingState::GettingUp;
        self.frame = 0;
        self.stamina = self.max_stamina;
    }
}

#[derive(Debug, Clone)]
pub enum Brain {
    Player(PlayerBrain),
    Enemy(EnemyBrain),
}

#[derive(Debug, Clone)]
pub struct Fighter {
    pub id: FighterId,
    pub body: FighterBody,
    pub brain: Brain,
    pub profile: Profile,
}

impl Fighter {
    pub fn new(id: FighterId, body: FighterBody, brain: Brain, profile: Profile) -> Self {
        Self {
            id,
            body,
            brain,
            profile,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.brain, Brain::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.brain, Brain::Enemy(_))
    }

    pub fn enemy_brain(&self) -> Option<&EnemyBrain> {
        match &self.brain {
            Brain::Enemy(brain) => Some(brain),
            Brain::Player(_) => None,
        }
    }

    pub fn enemy_brain_mut(&mut self) -> Option<&mut EnemyBrain> {
        match &mut self.brain {
            Brain::Enemy(brain) => Some(brain),
            Brain::Player(_) => None,
        }
    }

    pub fn player_brain(&self) -> Option<&PlayerBrain> {
        match &self.brain {
            Brain::Player(brain) => Some(brain),
            Brain::Enemy(_) => None,
        }
    }

    pub fn player_brain_mut(&mut self) -> Option<&mut PlayerBrain> {
        match &mut self.brain {
            Brain::Player(brain) => Some(brain),
            Brain::Enemy(_) => None,
        }
    }

    /// Жизни кончились: больше никаких переходов, оркестратор уберёт
    pub fn should_remove(&self) -> bool {
        self.body.lives <= 0
    }

    /// Вызывается, когда боец попадает в roster
    pub fn spawned(&mut self, ctx: &mut SimContext) {
        match self.profile.archetype {
            Archetype::Portal => ctx.play(&SoundRef::new("sfx/portal/portal_appear")),
            Archetype::Scooterboy if self.brain.overrides_walking() => ctx.cue(Cue::Engine {
                rider: self.id,
                sound: SoundRef::new("sfx/scooter/scooter_slow"),
                looping: true,
            }),
            _ => {}
        }
    }

    /// Один тик симуляции бойца
    pub fn tick(&mut self, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        if self.should_remove() {
            return;
        }

        if let Brain::Enemy(brain) = &mut self.brain {
            brain.think(self.id, &mut self.body, scene, ctx);
            // Портал "умирает" из своего state machine
            if self.should_remove() {
                self.died(ctx);
                return;
            }
        }

        self.advance(scene, ctx);
    }

    fn advance(&mut self, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        let boundary = scene.field.boundary;
        let body = &mut self.body;
        body.attack_timer -= 1;

        // В воздухе: flying kick, бросок
        if body.height_above_ground > 0.0 || body.vel.y != 0.0 {
            body.pos.x += body.vel.x;
            body.vel.y += if body.falling_state == FallingState::Thrown {
                THROWN_GRAVITY
            } else {
                JUMP_GRAVITY
            };
            body.height_above_ground -= body.vel.y;
            body.apply_movement_boundaries(body.vel.x, 0.0, &boundary);
            if body.height_above_ground < 0.0 {
                body.height_above_ground = 0.0;
                body.vel = Vec2::ZERO;
                // После приземления анимацию "ударили" не показываем
                body.hit_timer = 0;
            }
        }

        match self.body.falling_state {
            FallingState::Falling => self.advance_falling(&boundary, ctx),
            FallingState::GettingUp => {
                let body = &mut self.body;
                body.frame += 1;
                body.pos.x += 0.1 * body.facing;
                if body.frame > GET_UP_TICKS {
                    body.falling_state = FallingState::Standing;
                    body.frame = 0;
                }
            }
            FallingState::Thrown => {
                let body = &mut self.body;
                body.frame += 1;
                if body.height_above_ground <= 0.0 {
                    body.falling_state = FallingState::Falling;
                    body.frame = THROWN_LANDING_FRAME;
                }
            }
            _ if self.body.hit_timer > 0 => self.body.hit_timer -= 1,
            _ if self.body.pickup_animation.is_some() => {
                self.body.frame += 1;
                if self.body.frame > PICKUP_TICKS {
                    self.body.pickup_animation = None;
                }
            }
            // Специальное состояние мозга (райдер на самокате, портал)
            _ if self.brain.overrides_walking() => {}
            FallingState::Standing => self.advance_standing(scene, ctx),
            FallingState::Grabbed => {}
        }
    }

    fn advance_falling(&mut self, boundary: &Boundary, ctx: &mut SimContext) {
        let body = &mut self.body;
        // Отлетаем назад
        body.pos.x += body.vel.x;
        body.vel.x = move_towards(body.vel.x, 0.0, KNOCKBACK_FRICTION).0;
        body.apply_movement_boundaries(body.vel.x, 0.0, boundary);
        body.frame += 1;

        if body.just_knocked_off_mount && body.frame > SCOOTER_DETACH_FRAME {
            body.just_knocked_off_mount = false;
            let colour = self.profile.colour_variant.unwrap_or(0);
            ctx.spawn(Spawn::Debris(Debris::scooter(body.pos, body.facing, colour)));
            ctx.play(&SoundRef::new("sfx/scooter/scooter_fall"));
        }

        if body.frame <= KNOCKDOWN_TICKS {
            return;
        }
        if body.health > 0 {
            body.get_up();
            ctx.trace(self.id, || "getting up".to_string());
        } else if body.frame > DEATH_TICKS {
            body.lives -= 1;
            if body.lives > 0 {
                body.health = body.start_health;
                body.use_die_animation = false;
                body.get_up();
                ctx.trace(self.id, || "lost a life".to_string());
            } else {
                self.died(ctx);
            }
        }
    }

    fn advance_standing(&mut self, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        self.body.regenerate_stamina();

        // Держим оружие перед собой (чтобы при drop оно появилось в нужном месте)
        if let Some(id) = self.body.weapon {
            let held_pos = self.body.pos + Vec2::new(self.body.facing * WEAPON_HOLD_OFFSET_X, 0.0);
            if let Some(weapon) = find_mut(scene.weapons, id) {
                weapon.pos = held_pos;
            }
        }

        if self.body.ready_to_act() {
            if self.body.weapon.is_none() {
                let pos = self.body.pos;
                let any_nearby = scene
                    .weapons
                    .iter()
                    .any(|w| (w.pos - pos).length() < PICKUP_RADIUS);
                if any_nearby && self.brain.wants_pickup(&self.body, scene) {
                    self.pick_up_nearest(scene);
                }
            } else if self.brain.wants_drop(&self.body, scene) {
                self.body.drop_weapon(scene.weapons);
            }

            // Только что начали подбирать: не атакуем
            if self.body.pickup_animation.is_none() {
                if let Some(attack) = self.brain.desired_attack(&self.body, scene, ctx) {
                    self.start_attack(attack, scene, ctx);
                }
            }
        }

        // attack_timer мог только что стать > 0
        if self.body.attack_timer <= 0 {
            let facing = self.brain.desired_facing(&self.body, scene);
            let target = self.brain.move_target(&self.body, scene);
            let boundary = scene.field.boundary;
            let body = &mut self.body;
            if let Some(facing) = facing {
                body.facing = facing;
            }
            if target != body.pos {
                body.walking = true;
                let (x, dx) = move_towards(body.pos.x, target.x, body.speed.x);
                let (y, dy) = move_towards(body.pos.y, target.y, body.speed.y);
                body.pos = Vec2::new(x, y);
                body.apply_movement_boundaries(dx, dy, &boundary);
            } else {
                body.walking = false;
            }
            body.frame += 1;
        } else {
            self.body.frame += 1;
            let Some(attack) = self.body.last_attack.clone() else {
                return;
            };
            if attack.is_hit_frame(attack.frame_at(self.body.frame)) {
                if attack.throw {
                    self.release_throw(&attack, scene, ctx);
                }
                // Резолвим и для броска: бочка при отпускании уже может быть за противником
                self.resolve_attack(&attack, scene, ctx);
            }
        }
    }

    fn pick_up_nearest(&mut self, scene: &mut Scene<'_>) {
        let pos = self.body.pos;
        let mut nearby: Vec<(f32, usize)> = scene
            .weapons
            .iter()
            .enumerate()
            .filter(|(_, w)| (w.pos - pos).length() < PICKUP_RADIUS)
            .map(|(index, w)| ((w.pos - pos).length_squared(), index))
            .collect();
        // stable sort: равные расстояния в порядке списка
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));

        let Some(&(_, index)) = nearby.iter().find(|(_, index)| scene.weapons[*index].can_be_picked_up())
        else {
            return;
        };
        let weapon = &mut scene.weapons[index];
        weapon.pick_up(WEAPON_HOLD_HEIGHT, self.id);
        self.body.pickup_animation = Some(weapon.kind);
        self.body.frame = 0;
        self.body.weapon = Some(weapon.id);
    }

    pub(crate) fn start_attack(&mut self, attack: Arc<Attack>, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        ctx.trace(self.id, || format!("attack {}", attack.sprite));

        let body = &mut self.body;
        body.attack_timer = attack.anim_time;
        body.spend_stamina(attack.stamina_cost);
        body.frame = 0;

        if let Some(sound) = &attack.initial_sound {
            ctx.play(sound);
        }
        if attack.flying_kick {
            body.vel = Vec2::new(FLYING_KICK_VEL.x * body.facing, FLYING_KICK_VEL.y);
        }
        if attack.grab {
            let target = self.brain.opponent_set(&self.body, scene).first().copied();
            if let Some(opponent) = target.and_then(|id| scene.peers.get_mut(id)) {
                ctx.trace(opponent.id, || "grabbed".to_string());
                opponent.body.grabbed(scene.weapons);
            }
        }
        self.body.last_attack = Some(attack);
    }

    /// Hit frame броска: схваченный противник летит, либо отпускаем бочку
    fn release_throw(&mut self, attack: &Attack, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        if attack.grab {
            let hitter = self.as_hitter();
            for id in self.brain.opponent_set(&self.body, scene) {
                let Some(opponent) = scene.peers.get_mut(id) else {
                    continue;
                };
                // Уже бросили на прошлом тике
                if opponent.body.falling_state != FallingState::Grabbed {
                    continue;
                }
                opponent.hit(&hitter, attack, scene.weapons, ctx);
                opponent.body.thrown(self.body.facing);
                ctx.trace(opponent.id, || "thrown".to_string());
            }
        } else if let Some(id) = self.body.weapon.take() {
            if let Some(weapon) = find_mut(scene.weapons, id) {
                weapon.throw(self.body.facing, self.id);
            }
        }
    }

    /// Жизни кончились: дропы по архетипу
    pub(crate) fn died(&mut self, ctx: &mut SimContext) {
        ctx.trace(self.id, || "died".to_string());
        let pos = self.body.pos;
        match self.profile.archetype {
            Archetype::Hoodie => {
                if ctx.rng.gen_range(0..3) == 0 {
                    let id = ctx.next_weapon_id();
                    let stick = Weapon::stick(id, pos, &mut ctx.rng);
                    ctx.spawn(Spawn::Weapon(stick));
                }
            }
            Archetype::Scooterboy => {
                if ctx.rng.gen_range(0..20) == 0 {
                    let id = ctx.next_weapon_id();
                    let chain = Weapon::chain(id, pos, &mut ctx.rng);
                    ctx.spawn(Spawn::Weapon(chain));
                }
                ctx.cue(Cue::EngineStop { rider: self.id });
            }
            Archetype::Kasaobake | Archetype::YukiOnna | Archetype::Tengu => {
                ctx.spawn(Spawn::Pickup(Pickup::mask(pos)));
            }
            _ => {}
        }
    }
}
