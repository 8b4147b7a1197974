//! Enemy brain: decision state machine врага.
//!
//! Состояния:
//! Pause → (make_decision) → ApproachPlayer / GoToPos / GoToWeapon / Pause
//! Любое → KnockedDown (при падении) → make_decision после подъёма
//! RidingMount / Portal / PortalExplode ведутся тактикой (rider, portal)
//! Idle: внешний контроль (boss intro), решений нет, удары игнорируются
//!
//! Think вызывается до update тела в том же тике.

use std::sync::Arc;

use bevy::math::Vec2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::ai::tactics::unclaimed_barrel;
use crate::ai::{portal, rider, Tactic};
use crate::combat::{Attack, FallingState, FighterBody, IntentProvider};
use crate::config::{
    ENEMY_APPROACH_PLAYER_DISTANCE_BARREL, ENEMY_ATTACK_BAND_FAR, ENEMY_ATTACK_BAND_NEAR,
    ENEMY_BACK_AWAY_DISTANCE, ENEMY_FLANK_OFFSET, ENEMY_MID_RANGE_MAX, ENEMY_MID_RANGE_MIN,
    ENEMY_TARGET_DEDUP_DISTANCE, WEAPON_HOLD_HEIGHT,
};
use crate::encounter::scene::Scene;
use crate::encounter::{FighterId, SimContext};
use crate::kinematics::{clamp, sign};
use crate::physics::weapon::find_mut;
use crate::physics::WeaponKind;

/// AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AiState {
    ApproachPlayer,
    GoToPos,
    GoToWeapon,
    Pause,
    KnockedDown,
    RidingMount,
    Portal,
    PortalExplode,
    /// Под внешним контролем (boss intro): стоит на месте, неуязвим
    Idle,
}

impl AiState {
    /// Состояния, в которых враг идёт к `target`
    pub fn is_moving(&self) -> bool {
        matches!(self, AiState::ApproachPlayer | AiState::GoToPos | AiState::GoToWeapon)
    }
}

#[derive(Debug, Clone)]
pub struct EnemyBrain {
    pub state: AiState,
    pub target: Vec2,
    /// Non-owning: бочка, за которой идём
    pub target_weapon: Option<crate::encounter::WeaponId>,
    pub state_timer: i32,
    /// Имена атак из таблицы, выбор случайный
    pub attacks: Vec<String>,
    pub approach_distance: f32,
    pub tactic: Tactic,
}

impl EnemyBrain {
    /// Враг стартует в PAUSE и не трогает игрока, пока не истечёт start_timer
    pub fn new(pos: Vec2, attacks: Vec<String>, approach_distance: f32, start_timer: i32, tactic: Tactic) -> Self {
        Self {
            state: AiState::Pause,
            target: pos,
            target_weapon: None,
            state_timer: start_timer,
            attacks,
            approach_distance,
            tactic,
        }
    }

    /// Лежачего и управляемого извне не бьют
    pub fn ignores_hits(&self) -> bool {
        matches!(self.state, AiState::KnockedDown | AiState::Idle)
    }

    /// Boss intro: заморозить
    pub fn hold(&mut self) {
        self.state = AiState::Idle;
    }

    /// Конец boss intro: отпустить в обычный цикл решений
    pub fn release(&mut self) {
        if self.state == AiState::Idle {
            self.state = AiState::Pause;
            self.state_timer = 0;
        }
    }

    pub fn is_riding(&self) -> bool {
        self.state == AiState::RidingMount
    }

    fn holding_barrel(me: &FighterBody, scene: &Scene<'_>) -> bool {
        me.weapon
            .and_then(|id| scene.weapon(id))
            .is_some_and(|w| w.kind == WeaponKind::Barrel)
    }

    /// AI tick: специализация тактики + обработка текущего состояния
    pub fn think(&mut self, id: FighterId, body: &mut FighterBody, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        match &mut self.tactic {
            Tactic::Rider(rider_state) if self.state == AiState::RidingMount => {
                rider::ride(rider_state, &mut self.target, id, body, scene, ctx);
            }
            Tactic::Portal(portal_state) => portal::run(portal_state, &mut self.state, body, scene, ctx),
            _ => {}
        }

        match self.state {
            AiState::ApproachPlayer => self.approach_player(id, body, scene, ctx),
            AiState::GoToPos => {
                if self.target == body.pos {
                    self.make_decision(id, body, scene, ctx);
                }
            }
            AiState::GoToWeapon => self.go_to_weapon(id, body, scene, ctx),
            AiState::Pause => {
                self.state_timer -= 1;
                if self.state_timer < 0 {
                    self.make_decision(id, body, scene, ctx);
                }
            }
            AiState::KnockedDown => {
                if body.falling_state == FallingState::Standing {
                    self.make_decision(id, body, scene, ctx);
                }
            }
            AiState::Idle => {
                self.target = body.pos;
                body.walking = false;
            }
            AiState::RidingMount | AiState::Portal | AiState::PortalExplode => {}
        }

        if self.state.is_moving() {
            let boundary = &scene.field.boundary;
            self.target.x = clamp(self.target.x, boundary.left, boundary.right());
            self.target.y = clamp(self.target.y, boundary.top, boundary.bottom());

            // Другой враг уже идёт туда же (или рядом): решаем заново.
            // Порядок update'ов важен: более ранние враги уже сменили target в этом тике
            let taken = scene.peers.enemies().any(|enemy| {
                enemy
                    .enemy_brain()
                    .is_some_and(|b| (b.target - self.target).length() < ENEMY_TARGET_DEDUP_DISTANCE)
            });
            if taken {
                ctx.trace(id, || "same target".to_string());
                self.make_decision(id, body, scene, ctx);
            }
        }
    }

    fn approach_player(&mut self, id: FighterId, body: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) {
        let Some(player) = scene.peers.player() else {
            return;
        };
        let player_body = &player.body;

        // Игрок бьёт рядом: небольшой шанс отступить
        if player_body.is_attacking()
            && (body.pos.y - player_body.pos.y).abs() < 20.0
            && (body.pos.x - player_body.pos.x).abs() < 200.0
            && ctx.rng.gen_range(0..=500) == 0
        {
            ctx.trace(id, || "back away from attack".to_string());
            self.target.x = body.pos.x - body.facing * ENEMY_BACK_AWAY_DISTANCE;
            self.state = AiState::GoToPos;
            return;
        }

        // С бочкой держимся дальше, чтобы бросать издалека
        let offset = if Self::holding_barrel(body, scene) {
            ENEMY_APPROACH_PLAYER_DISTANCE_BARREL
        } else {
            self.approach_distance
        };
        self.target.x = player_body.pos.x + offset * sign(body.pos.x - player_body.pos.x);
        self.target.y = player_body.pos.y;
    }

    fn go_to_weapon(&mut self, id: FighterId, body: &mut FighterBody, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        let available = self
            .target_weapon
            .and_then(|weapon_id| scene.weapon(weapon_id))
            .filter(|w| w.can_be_picked_up() && scene.field.on_screen(w.pos.x))
            .map(|w| w.pos);

        let Some(weapon_pos) = available else {
            self.target_weapon = None;
            self.make_decision(id, body, scene, ctx);
            return;
        };

        self.target = weapon_pos;
        if self.target != body.pos {
            return;
        }

        // Дошли: подбираем
        if let Some(weapon) = self.target_weapon.take().and_then(|wid| find_mut(scene.weapons, wid)) {
            ctx.trace(id, || "pick up weapon".to_string());
            weapon.pick_up(WEAPON_HOLD_HEIGHT, id);
            body.pickup_animation = Some(weapon.kind);
            body.frame = 0;
            body.weapon = Some(weapon.id);
        }
        self.make_decision(id, body, scene, ctx);
    }

    /// Выбор следующего состояния (тактика может перехватить)
    pub fn make_decision(&mut self, id: FighterId, body: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) {
        if self.state == AiState::Idle {
            return;
        }
        match &self.tactic {
            Tactic::Brawler => {}
            // Стоит на самокате, пока не собьют
            Tactic::Rider(_) if self.state == AiState::RidingMount => return,
            Tactic::Rider(_) => {}
            Tactic::Portal(_) => {
                self.state = AiState::Portal;
                return;
            }
            Tactic::BarrelSeeker => {
                if body.weapon.is_none() {
                    if let Some(weapon) = unclaimed_barrel(scene) {
                        ctx.trace(id, || "go to weapon".to_string());
                        self.state = AiState::GoToWeapon;
                        self.target_weapon = Some(weapon);
                        return;
                    }
                }
            }
        }
        self.decide_default(id, body, scene, ctx);
    }

    /// 7/10 к игроку (или фланг), 2/10 в точку на средней дистанции, 1/10 пауза
    fn decide_default(&mut self, id: FighterId, body: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) {
        let Some(player) = scene.peers.player() else {
            return;
        };
        let player_pos = player.body.pos;

        if scene.peers.enemies().next().is_none() {
            ctx.trace(id, || "only enemy, go to player".to_string());
            self.state = AiState::ApproachPlayer;
            return;
        }

        let r = ctx.rng.gen_range(0..10);
        if r < 7 {
            let my_side = sign(body.pos.x - player_pos.x);
            let same_side_attacking = scene.peers.enemies().any(|enemy| {
                enemy.enemy_brain().is_some_and(|b| b.state == AiState::ApproachPlayer)
                    && sign(enemy.body.pos.x - player_pos.x) == my_side
            });
            if same_side_attacking {
                // Обходим на другую сторону, оставаясь выше/ниже игрока
                ctx.trace(id, || "begin flanking".to_string());
                self.state = AiState::GoToPos;
                self.target.x = player_pos.x - my_side * ENEMY_FLANK_OFFSET;
                self.target.y = player_pos.y + sign(body.pos.y - player_pos.y) * ENEMY_FLANK_OFFSET;
                if self.target.y == player_pos.y {
                    let dir = if ctx.rng.gen_bool(0.5) { -1.0 } else { 1.0 };
                    self.target.y = player_pos.y + dir * ENEMY_FLANK_OFFSET;
                }
            } else {
                ctx.trace(id, || "go to player".to_string());
                self.state = AiState::ApproachPlayer;
            }
        } else if r < 9 {
            ctx.trace(id, || "go to distance from player".to_string());
            let mut side = sign(body.pos.x - player_pos.x);
            if side == 0.0 {
                side = if ctx.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            }
            let x1 = (player_pos.x + ENEMY_MID_RANGE_MIN * side) as i32;
            let x2 = (player_pos.x + ENEMY_MID_RANGE_MAX * side) as i32;
            let x = ctx.rng.gen_range(x1.min(x2)..=x1.max(x2));
            let boundary = &scene.field.boundary;
            let y = ctx.rng.gen_range(boundary.top as i32..=boundary.bottom() as i32);
            self.target = Vec2::new(x as f32, y as f32);
            self.state = AiState::GoToPos;
        } else {
            ctx.trace(id, || "pause".to_string());
            self.state_timer = ctx.rng.gen_range(50..=100);
            self.state = AiState::Pause;
        }
    }
}

impl IntentProvider for EnemyBrain {
    /// Бьём только подойдя: APPROACH_PLAYER, та же y, игрок стоит, |dx| в полосе
    /// вокруг approach distance (с бочкой любая), и 1 шанс из 20
    fn desired_attack(&self, me: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) -> Option<Arc<Attack>> {
        let player = scene.peers.player()?;
        let player_body = &player.body;
        let dx = (me.pos.x - player_body.pos.x).abs();
        let in_band = self.approach_distance * ENEMY_ATTACK_BAND_NEAR < dx
            && dx <= self.approach_distance * ENEMY_ATTACK_BAND_FAR;

        let ready = self.state == AiState::ApproachPlayer
            && player_body.falling_state == FallingState::Standing
            && me.pos.y == player_body.pos.y
            && (in_band || Self::holding_barrel(me, scene))
            && ctx.rng.gen_range(0..20) == 0;
        if !ready {
            return None;
        }

        if let Some(weapon) = me.weapon.and_then(|id| scene.weapon(id)) {
            return ctx.attacks.get(weapon.kind.attack_name());
        }

        let name = self.attacks.choose(&mut ctx.rng)?;
        let attack = ctx.attacks.get(name)?;
        // Захват во время flying kick игрока не работает
        let player_flying = player_body.last_attack.as_ref().is_some_and(|a| a.flying_kick);
        if attack.grab && player_flying {
            return None;
        }
        Some(attack)
    }

    fn wants_pickup(&self, _me: &FighterBody, _scene: &Scene<'_>) -> bool {
        false
    }

    fn wants_drop(&self, _me: &FighterBody, _scene: &Scene<'_>) -> bool {
        false
    }

    fn opponent_set(&self, _me: &FighterBody, scene: &Scene<'_>) -> Vec<FighterId> {
        scene.peers.player().map(|p| p.id).into_iter().collect()
    }

    fn move_target(&self, _me: &FighterBody, _scene: &Scene<'_>) -> Vec2 {
        self.target
    }

    fn desired_facing(&self, me: &FighterBody, scene: &Scene<'_>) -> Option<f32> {
        if self.is_riding() {
            return Some(me.facing);
        }
        let player = scene.peers.player()?;
        Some(if me.pos.x < player.body.pos.x { 1.0 } else { -1.0 })
    }

    fn overrides_walking(&self) -> bool {
        self.is_riding() || matches!(self.tactic, Tactic::Portal(_))
    }
}
