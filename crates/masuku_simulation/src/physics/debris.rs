//! Декоративные обломки (самокат, с которого сбили райдера).

use bevy::math::Vec2;

use crate::config::{SCOOTER_DEBRIS_FRICTION, SCOOTER_DEBRIS_LIFETIME, SCOOTER_DEBRIS_SPEED};

#[derive(Debug, Clone)]
pub struct Debris {
    pub pos: Vec2,
    pub facing: f32,
    pub colour_variant: u8,
    pub vel_x: f32,
    pub frame: u32,
}

impl Debris {
    /// Самокат отъезжает назад относительно направления райдера
    pub fn scooter(pos: Vec2, facing: f32, colour_variant: u8) -> Self {
        Self {
            pos,
            facing,
            colour_variant,
            vel_x: -facing * SCOOTER_DEBRIS_SPEED,
            frame: 0,
        }
    }

    pub fn tick(&mut self) {
        self.frame += 1;
        self.pos.x += self.vel_x;
        self.vel_x *= SCOOTER_DEBRIS_FRICTION;
    }

    pub fn expired(&self) -> bool {
        self.frame >= SCOOTER_DEBRIS_LIFETIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scooter_slides_back_and_slows() {
        let mut debris = Debris::scooter(Vec2::new(500.0, 400.0), 1.0, 0);
        debris.tick();
        assert_eq!(debris.pos.x, 492.0);
        assert!(debris.vel_x > -8.0 && debris.vel_x < 0.0);

        let mut last = debris.pos.x;
        for _ in 0..50 {
            debris.tick();
            assert!(debris.pos.x <= last);
            last = debris.pos.x;
        }
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut debris = Debris::scooter(Vec2::ZERO, -1.0, 2);
        for _ in 0..SCOOTER_DEBRIS_LIFETIME - 1 {
            debris.tick();
        }
        assert!(!debris.expired());
        debris.tick();
        assert!(debris.expired());
    }
}
