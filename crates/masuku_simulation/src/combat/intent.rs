//! IntentProvider: чего боец хочет в этом тике.
//!
//! Тело спрашивает мозг, мозг не трогает тело напрямую (кроме AI think,
//! который вызывается отдельно до update тела).

use std::sync::Arc;

use bevy::math::Vec2;

use crate::combat::{Attack, Brain, FighterBody};
use crate::encounter::scene::Scene;
use crate::encounter::{FighterId, SimContext};

pub trait IntentProvider {
    /// Атака, которую начать сейчас (спрашивается только когда боец готов)
    fn desired_attack(&self, me: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) -> Option<Arc<Attack>>;

    fn wants_pickup(&self, me: &FighterBody, scene: &Scene<'_>) -> bool;

    fn wants_drop(&self, me: &FighterBody, scene: &Scene<'_>) -> bool;

    /// Кого бьют атаки этого бойца (порядок = порядок resolution)
    fn opponent_set(&self, me: &FighterBody, scene: &Scene<'_>) -> Vec<FighterId>;

    fn move_target(&self, me: &FighterBody, scene: &Scene<'_>) -> Vec2;

    /// None = оставить facing как есть
    fn desired_facing(&self, me: &FighterBody, scene: &Scene<'_>) -> Option<f32>;

    /// Особое состояние, в котором обычный STANDING update не выполняется
    fn overrides_walking(&self) -> bool {
        false
    }
}

impl IntentProvider for Brain {
    fn desired_attack(&self, me: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) -> Option<Arc<Attack>> {
        match self {
            Brain::Player(brain) => brain.desired_attack(me, scene, ctx),
            Brain::Enemy(brain) => brain.desired_attack(me, scene, ctx),
        }
    }

    fn wants_pickup(&self, me: &FighterBody, scene: &Scene<'_>) -> bool {
        match self {
            Brain::Player(brain) => brain.wants_pickup(me, scene),
            Brain::Enemy(brain) => brain.wants_pickup(me, scene),
        }
    }

    fn wants_drop(&self, me: &FighterBody, scene: &Scene<'_>) -> bool {
        match self {
            Brain::Player(brain) => brain.wants_drop(me, scene),
            Brain::Enemy(brain) => brain.wants_drop(me, scene),
        }
    }

    fn opponent_set(&self, me: &FighterBody, scene: &Scene<'_>) -> Vec<FighterId> {
        match self {
            Brain::Player(brain) => brain.opponent_set(me, scene),
            Brain::Enemy(brain) => brain.opponent_set(me, scene),
        }
    }

    fn move_target(&self, me: &FighterBody, scene: &Scene<'_>) -> Vec2 {
        match self {
            Brain::Player(brain) => brain.move_target(me, scene),
            Brain::Enemy(brain) => brain.move_target(me, scene),
        }
    }

    fn desired_facing(&self, me: &FighterBody, scene: &Scene<'_>) -> Option<f32> {
        match self {
            Brain::Player(brain) => brain.desired_facing(me, scene),
            Brain::Enemy(brain) => brain.desired_facing(me, scene),
        }
    }

    fn overrides_walking(&self) -> bool {
        match self {
            Brain::Player(brain) => brain.overrides_walking(),
            Brain::Enemy(brain) => brain.overrides_walking(),
        }
    }
}
