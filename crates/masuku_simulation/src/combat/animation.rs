//! Read-only вид бойца для рендерера.
//!
//! Симуляция не знает про спрайты; рендерер получает `AnimationView` и сам
//! собирает имя картинки (`{sprite}_{kind}_{facing}_{frame}_{colour}`).

use serde::Serialize;

use crate::ai::{AiState, Tactic};
use crate::combat::profile::Archetype;
use crate::combat::{FallingState, Fighter};
use crate::physics::weapon::{find, Weapon, WeaponKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnimationKind {
    Stand,
    Walk,
    /// Спрайт атаки (`Attack::sprite`)
    Attack(String),
    Hit,
    Pickup(WeaponKind),
    Knockdown,
    Die,
    KnockedOff,
    GetUp,
    Thrown,
    Ride,
    PortalGrow,
    PortalIdle,
    PortalHit,
    PortalGenerate,
    PortalDestroyed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationView {
    pub kind: AnimationKind,
    pub frame: i32,
    pub facing: f32,
    /// Оружие в руках (добавляется к stand/walk)
    pub armed_with: Option<WeaponKind>,
    /// false = ничего не рисовать (мигание при смерти, схвачен)
    pub visible: bool,
    pub colour_variant: Option<u8>,
}

impl Fighter {
    pub fn animation(&self, weapons: &[Weapon]) -> AnimationView {
        let body = &self.body;
        let armed_with = body.weapon.and_then(|id| find(weapons, id)).map(|w| w.kind);
        let mut view = AnimationView {
            kind: AnimationKind::Stand,
            frame: 0,
            facing: body.facing,
            armed_with: None,
            visible: true,
            colour_variant: self.profile.colour_variant,
        };

        if self.profile.archetype == Archetype::Portal {
            self.portal_animation(&mut view);
            return view;
        }

        if let Some(Tactic::Rider(rider)) = self.enemy_brain().map(|b| &b.tactic) {
            if self.enemy_brain().is_some_and(|b| b.state == AiState::RidingMount) {
                view.kind = AnimationKind::Ride;
                // Разгоняется: 3 кадра толчка ногой
                view.frame = if rider.speed < rider.target_speed {
                    (body.frame / 5).min(2)
                } else {
                    0
                };
                return view;
            }
        }

        let (kind, frame) = match body.falling_state {
            FallingState::Falling => {
                if body.frame > 60 && body.health <= 0 && (body.frame / 10) % 2 == 0 {
                    view.visible = false;
                }
                if body.just_knocked_off_mount {
                    (AnimationKind::KnockedOff, 0)
                } else if body.use_die_animation {
                    (AnimationKind::Die, (body.frame / 20).min(2))
                } else {
                    let last_frame = if self.profile.archetype == Archetype::Scooterboy { 3 } else { 2 };
                    (AnimationKind::Knockdown, (body.frame / 10).min(last_frame))
                }
            }
            FallingState::GettingUp => (AnimationKind::GetUp, (body.frame / 10).min(1)),
            FallingState::Grabbed => {
                view.visible = false;
                (AnimationKind::Stand, 0)
            }
            FallingState::Thrown => (AnimationKind::Thrown, (body.frame / 12).min(3)),
            FallingState::Standing => {
                if body.hit_timer > 0 {
                    (AnimationKind::Hit, i32::from(body.hit_frame))
                } else if let Some(kind) = body.pickup_animation {
                    (AnimationKind::Pickup(kind), (body.frame / 12).min(kind.end_pickup_frame()))
                } else if let Some(attack) = body.last_attack.as_ref().filter(|_| body.is_attacking()) {
                    (AnimationKind::Attack(attack.sprite.clone()), body.attack_frame() as i32)
                } else {
                    view.armed_with = armed_with;
                    let rate = self.profile.anim_update_rate.max(1);
                    if body.walking {
                        (AnimationKind::Walk, (body.frame / rate) % 4)
                    } else if armed_with.is_some() {
                        // Для оружия есть только walk-спрайты
                        (AnimationKind::Walk, 0)
                    } else {
                        (AnimationKind::Stand, (body.frame / rate) % self.profile.stand_frames.max(1))
                    }
                }
            }
        };
        view.kind = kind;
        view.frame = frame;
        view
    }

    fn portal_animation(&self, view: &mut AnimationView) {
        let body = &self.body;
        let Some(brain) = self.enemy_brain() else {
            return;
        };
        let spawning = match &brain.tactic {
            Tactic::Portal(portal) => portal.spawning.as_ref(),
            _ => None,
        };

        let (kind, frame) = if brain.state == AiState::Pause && body.frame / 8 < 4 {
            (AnimationKind::PortalGrow, (body.frame / 8).min(3))
        } else if brain.state == AiState::PortalExplode {
            (AnimationKind::PortalDestroyed, (body.frame / 6).min(7))
        } else if let Some(enemy) = spawning {
            // 3 нейтральных кадра, потом 3 кадра конкретного врага
            view.colour_variant = enemy.profile.colour_variant;
            (AnimationKind::PortalGenerate, (body.frame / 16).min(5))
        } else if body.hit_timer > 0 {
            (AnimationKind::PortalHit, 0)
        } else {
            (AnimationKind::PortalIdle, (body.frame / 8) % 8)
        };
        view.kind = kind;
        view.frame = frame;
    }
}
