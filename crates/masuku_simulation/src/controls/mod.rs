//! Player controller binding: сырой input кадра → намерения игрока.
//!
//! Устройство ввода внешнее: каждый тик приходит `ControlFrame` (оси + 4
//! кнопки). Нет input'а = всё отпущено.

use std::sync::Arc;

use bevy::math::Vec2;
use rand::Rng;

use crate::combat::{Attack, FighterBody, IntentProvider};
use crate::config::COMBO_WINDOW;
use crate::encounter::scene::Scene;
use crate::encounter::{FighterId, SimContext};
use crate::kinematics::sign;

pub const NUM_BUTTONS: usize = 4;

/// Состояние устройства ввода на один тик
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlFrame {
    /// -1..1
    pub x: f32,
    /// -1..1
    pub y: f32,
    /// Кнопки зажаты (не "нажаты в этом кадре")
    pub buttons: [bool; NUM_BUTTONS],
}

impl ControlFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_button(mut self, button: usize) -> Self {
        if let Some(down) = self.buttons.get_mut(button) {
            *down = true;
        }
        self
    }
}

/// Edge detection: кнопка "нажата" только в кадре, где она стала зажатой
#[derive(Debug, Clone, Default)]
pub struct Controls {
    current: ControlFrame,
    previously_down: [bool; NUM_BUTTONS],
    pressed: [bool; NUM_BUTTONS],
}

impl Controls {
    pub fn update(&mut self, frame: &ControlFrame) {
        for button in 0..NUM_BUTTONS {
            let down = frame.buttons[button];
            self.pressed[button] = down && !self.previously_down[button];
            self.previously_down[button] = down;
        }
        self.current = *frame;
    }

    pub fn button_pressed(&self, button: usize) -> bool {
        self.pressed.get(button).copied().unwrap_or(false)
    }

    pub fn x(&self) -> f32 {
        self.current.x
    }

    pub fn y(&self) -> f32 {
        self.current.y
    }
}

/// Мозг игрока: controls + таймер анимации "новая жизнь" для UI
#[derive(Debug, Clone, Default)]
pub struct PlayerBrain {
    pub controls: Controls,
    pub extra_life_timer: i32,
}

impl PlayerBrain {
    pub fn new() -> Self {
        Self::default()
    }

    fn attack(name: &str, ctx: &SimContext) -> Option<Arc<Attack>> {
        ctx.attacks.get(name)
    }
}

impl IntentProvider for PlayerBrain {
    fn desired_attack(&self, me: &FighterBody, scene: &Scene<'_>, ctx: &mut SimContext) -> Option<Arc<Attack>> {
        let controls = &self.controls;

        if let Some(id) = me.weapon {
            // Во время подбора не бьём
            if me.pickup_animation.is_none() && controls.button_pressed(0) {
                let kind = scene.weapon(id)?.kind;
                return Self::attack(kind.attack_name(), ctx);
            }
            return None;
        }

        if controls.button_pressed(0) {
            // Комбо: та же кнопка вскоре после конца предыдущего приёма
            if me.attack_timer >= -COMBO_WINDOW {
                let next = me.last_attack.as_ref().and_then(|a| a.combo_successor(0));
                if let Some(next) = next {
                    return Self::attack(next, ctx);
                }
            }
            Self::attack("punch", ctx)
        } else if controls.button_pressed(1) {
            let name = if ctx.rng.gen_bool(0.5) { "kick" } else { "highkick" };
            Self::attack(name, ctx)
        } else if controls.button_pressed(2) {
            Self::attack("elbow", ctx)
        } else if controls.button_pressed(3) {
            Self::attack("flyingkick", ctx)
        } else {
            None
        }
    }

    fn wants_pickup(&self, _me: &FighterBody, _scene: &Scene<'_>) -> bool {
        self.controls.button_pressed(0)
    }

    fn wants_drop(&self, me: &FighterBody, _scene: &Scene<'_>) -> bool {
        me.weapon.is_some() && self.controls.button_pressed(1)
    }

    fn opponent_set(&self, _me: &FighterBody, scene: &Scene<'_>) -> Vec<FighterId> {
        scene.peers.enemies().map(|f| f.id).collect()
    }

    fn move_target(&self, me: &FighterBody, _scene: &Scene<'_>) -> Vec2 {
        me.pos + Vec2::new(self.controls.x() * me.speed.x, self.controls.y() * me.speed.y)
    }

    fn desired_facing(&self, _me: &FighterBody, _scene: &Scene<'_>) -> Option<f32> {
        let dx = self.controls.x();
        (dx != 0.0).then(|| sign(dx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_pressed_only_on_edge() {
        let mut controls = Controls::default();
        let held = ControlFrame::idle().with_button(0);

        controls.update(&held);
        assert!(controls.button_pressed(0));

        controls.update(&held);
        assert!(!controls.button_pressed(0), "holding the button is not a new press");

        controls.update(&ControlFrame::idle());
        controls.update(&held);
        assert!(controls.button_pressed(0));
    }

    #[test]
    fn test_out_of_range_button_is_never_pressed() {
        let mut controls = Controls::default();
        controls.update(&ControlFrame::idle().with_button(7));
        assert!(!controls.button_pressed(7));
        assert!(!(0..NUM_BUTTONS).any(|b| controls.button_pressed(b)));
    }

    #[test]
    fn test_axes_follow_latest_frame() {
        let mut controls = Controls::default();
        controls.update(&ControlFrame::idle().with_axis(1.0, -1.0));
        assert_eq!((controls.x(), controls.y()), (1.0, -1.0));
        controls.update(&ControlFrame::idle());
        assert_eq!((controls.x(), controls.y()), (0.0, 0.0));
    }
}
