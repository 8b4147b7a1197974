//! Попадания: геометрия удара, получение урона, resolution атаки.
//!
//! Хиттер это либо боец (id + возможно оружие в руках), либо катящаяся бочка
//! (без id). Урон: health -= strength, stamina -= strength * 100 * mult,
//! hit-stun = strength * 8 * mult тиков.

use bevy::math::Vec2;
use rand::Rng;

use crate::ai::AiState;
use crate::combat::{Attack, FallingState, Fighter, IntentProvider};
use crate::config::{DEATH_THRESHOLD, EXHAUSTED_STAMINA, KNOCKBACK_SPEED, MIN_STAMINA};
use crate::encounter::scene::Scene;
use crate::encounter::{Cue, FighterId, SimContext, WeaponId};
use crate::kinematics::sign;
use crate::physics::weapon::{find_mut, Weapon};

/// Кто бьёт (снимок на момент удара)
#[derive(Debug, Clone, Copy)]
pub struct Hitter {
    pub id: Option<FighterId>,
    pub pos: Vec2,
    /// Оружие в руках хиттера: ему засчитывается использование
    pub armed_with: Option<WeaponId>,
}

/// Попадает ли атака из `attacker_pos` в цель.
///
/// Цель должна быть по направлению взгляда (за спиной для rear attack),
/// в пределах half_hit_area по y и reach + half_hit_area по x.
pub fn attack_connects(
    attacker_pos: Vec2,
    facing: f32,
    attack: &Attack,
    target_pos: Vec2,
    target_half_hit_area: Vec2,
) -> bool {
    let vec = target_pos - attacker_pos;
    let mut facing_correct = sign(facing) == sign(vec.x);
    if attack.rear_attack {
        facing_correct = !facing_correct;
    }
    facing_correct
        && vec.y.abs() < target_half_hit_area.y
        && vec.x.abs() < attack.reach + target_half_hit_area.x
}

impl Fighter {
    pub fn as_hitter(&self) -> Hitter {
        Hitter {
            id: Some(self.id),
            pos: self.body.pos,
            armed_with: self.body.weapon,
        }
    }

    /// Входящий удар. Возвращает false, если удар ничего не изменил:
    /// враг его проигнорировал (лежит, под внешним контролем) или боец
    /// ещё в hit-stun и не на самокате.
    pub fn hit(&mut self, hitter: &Hitter, attack: &Attack, weapons: &mut [Weapon], ctx: &mut SimContext) -> bool {
        if let Some(brain) = self.enemy_brain() {
            if brain.ignores_hits() {
                return false;
            }
        }

        let landed = self.receive_hit(hitter, attack, weapons, ctx);

        let riding = self.enemy_brain().is_some_and(|b| b.state == AiState::RidingMount);
        let body = &mut self.body;
        // Райдер падает от любого удара, независимо от stamina
        if riding {
            body.falling_state = FallingState::Falling;
            body.frame = 0;
            body.hit_timer = 0;
            body.just_knocked_off_mount = true;
            ctx.cue(Cue::EngineStop { rider: self.id });
        }

        if body.falling_state == FallingState::Falling {
            if let Some(brain) = self.enemy_brain_mut() {
                brain.state = AiState::KnockedDown;
            }
            ctx.trace(self.id, || "knocked down".to_string());
        }
        landed || riding
    }

    fn receive_hit(&mut self, hitter: &Hitter, attack: &Attack, weapons: &mut [Weapon], ctx: &mut SimContext) -> bool {
        let body = &mut self.body;
        // Лежачего/встающего не бьют
        let landed = matches!(body.falling_state, FallingState::Standing | FallingState::Grabbed) && body.hit_timer <= 0;
        if landed {
            body.stamina = (body.stamina - attack.stamina_damage()).max(MIN_STAMINA);
            body.health -= attack.strength;

            body.hit_timer = attack.stun_ticks();
            body.hit_frame = ctx.rng.gen_range(0..=1);

            // Flying kick не прерывается (в конце не будет анимации "ударили")
            let flying_kick = body.last_attack.as_ref().is_some_and(|a| a.flying_kick);
            if body.attack_timer > 0 && body.last_attack.is_some() && !flying_kick {
                body.attack_timer = 0;
            }

            if body.weapon.is_some() {
                body.drop_weapon(weapons);
            }

            if let Some(sound) = &attack.hit_sound {
                ctx.play(sound);
            }
            if let Some(sound) = &self.profile.hit_sound {
                ctx.play(sound);
            }

            let body = &mut self.body;
            if (body.stamina <= EXHAUSTED_STAMINA || body.health <= 0) && !body.knockdown_immune {
                body.falling_state = FallingState::Falling;
                body.frame = 0;
                body.hit_timer = 0;
                // Почти мёртвый после нокдауна: добиваем
                if body.health < DEATH_THRESHOLD {
                    body.health = 0;
                    body.use_die_animation = ctx.rng.gen_range(0..=1) == 0;
                }
            }

            if let Some(id) = hitter.armed_with {
                if let Some(weapon) = find_mut(weapons, id) {
                    weapon.used(ctx);
                }
            }
        }

        // Всегда разворачиваемся к хиттеру
        let body = &mut self.body;
        if hitter.pos.x != body.pos.x {
            body.facing = sign(hitter.pos.x - body.pos.x);
            if body.falling_state == FallingState::Falling && !body.use_die_animation {
                body.vel.x += -body.facing * KNOCKBACK_SPEED;
            }
        }
        landed
    }

    /// Hit frame текущей атаки: бьём всех оппонентов в зоне
    pub(crate) fn resolve_attack(&mut self, attack: &Attack, scene: &mut Scene<'_>, ctx: &mut SimContext) {
        if attack.strength <= 0 {
            return;
        }
        for id in self.brain.opponent_set(&self.body, scene) {
            let hitter = self.as_hitter();
            let Some(opponent) = scene.peers.get_mut(id) else {
                continue;
            };
            if !attack_connects(
                self.body.pos,
                self.body.facing,
                attack,
                opponent.body.pos,
                opponent.body.half_hit_area,
            ) {
                continue;
            }
            opponent.hit(&hitter, attack, scene.weapons, ctx);

            // Оружие могло сломаться от этого удара
            let broken = self
                .body
                .weapon
                .and_then(|id| scene.weapon(id))
                .is_some_and(|w| w.is_broken());
            if broken {
                self.body.drop_weapon(scene.weapons);
            }
        }
    }
}
