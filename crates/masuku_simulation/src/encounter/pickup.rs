//! Подбираемые бонусы: жизнь, здоровье, маска ёкая.

use bevy::math::Vec2;
use serde::Serialize;

use crate::combat::{Fighter, SoundRef};
use crate::config::{EXTRA_LIFE_FLASH_TICKS, MASK_SCORE, PICKUP_COLLECT_RADIUS};
use crate::encounter::SimContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickupKind {
    ExtraLife,
    Health,
    /// Выпадает из побеждённого ёкая
    Mask,
}

#[derive(Debug, Clone)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
    pub collected: bool,
    /// Для анимации (extra life крутится)
    pub timer: u32,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            collected: false,
            timer: 0,
        }
    }

    pub fn mask(pos: Vec2) -> Self {
        Self::new(PickupKind::Mask, pos)
    }

    pub fn tick(&mut self) {
        self.timer = self.timer.wrapping_add(1);
    }

    pub fn in_reach(&self, pos: Vec2) -> bool {
        !self.collected && (self.pos - pos).length() < PICKUP_COLLECT_RADIUS
    }

    /// Применяет бонус к игроку. Возвращает очки за подбор.
    pub fn collect(&mut self, collector: &mut Fighter, ctx: &mut SimContext) -> u32 {
        if self.collected {
            return 0;
        }
        self.collected = true;
        ctx.trace(collector.id, || format!("collected {:?}", self.kind));
        ctx.play(&SoundRef::new("sfx/ui/health"));

        match self.kind {
            PickupKind::ExtraLife => {
                collector.body.lives += 1;
                if let Some(brain) = collector.player_brain_mut() {
                    brain.extra_life_timer = EXTRA_LIFE_FLASH_TICKS;
                }
                0
            }
            PickupKind::Health => {
                collector.body.health = collector.body.start_health;
                0
            }
            PickupKind::Mask => MASK_SCORE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{attacks, hero_at};

    #[test]
    fn test_extra_life_adds_life_and_flashes() {
        let mut ctx = SimContext::seeded(1, attacks());
        let mut hero = hero_at(Vec2::new(400.0, 400.0));
        let lives = hero.body.lives;

        let mut pickup = Pickup::new(PickupKind::ExtraLife, Vec2::new(410.0, 400.0));
        assert!(pickup.in_reach(hero.body.pos));
        assert_eq!(pickup.collect(&mut hero, &mut ctx), 0);

        assert_eq!(hero.body.lives, lives + 1);
        assert_eq!(hero.player_brain().map(|b| b.extra_life_timer), Some(EXTRA_LIFE_FLASH_TICKS));
        assert!(pickup.collected);
    }

    #[test]
    fn test_health_restores_start_health() {
        let mut ctx = SimContext::seeded(1, attacks());
        let mut hero = hero_at(Vec2::new(400.0, 400.0));
        hero.body.health = 4;

        let mut pickup = Pickup::new(PickupKind::Health, hero.body.pos);
        pickup.collect(&mut hero, &mut ctx);
        assert_eq!(hero.body.health, hero.body.start_health);
    }

    #[test]
    fn test_mask_scores_once() {
        let mut ctx = SimContext::seeded(1, attacks());
        let mut hero = hero_at(Vec2::new(400.0, 400.0));

        let mut mask = Pickup::mask(hero.body.pos);
        assert_eq!(mask.collect(&mut hero, &mut ctx), MASK_SCORE);
        assert_eq!(mask.collect(&mut hero, &mut ctx), 0);
        assert!(!mask.in_reach(hero.body.pos));
    }

    #[test]
    fn test_out_of_reach() {
        let pickup = Pickup::new(PickupKind::Health, Vec2::new(0.0, 0.0));
        assert!(!pickup.in_reach(Vec2::new(30.0, 0.0)));
        assert!(pickup.in_reach(Vec2::new(29.0, 0.0)));
    }
}
