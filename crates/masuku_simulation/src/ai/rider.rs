//! Scooter rider: едет по прямой, разворачивается за краем экрана, сбивает игрока.
//!
//! Пока едет, обычный STANDING update выключен (overrides_walking). Любое
//! попадание сбрасывает с самоката.

use bevy::math::Vec2;
use rand::Rng;

use crate::combat::{FallingState, FighterBody, Hitter, SoundRef};
use crate::config::{
    HEIGHT, MIN_WALK_Y, SCOOTER_ACCELERATION, SCOOTER_HIT_MAX_HEIGHT, SCOOTER_HIT_X, SCOOTER_HIT_Y,
    SCOOTER_REALIGN_MIN_DY, SCOOTER_SPEED_FAST, SCOOTER_SPEED_SLOW, WIDTH,
};
use crate::encounter::scene::Scene;
use crate::encounter::{Cue, FighterId, SimContext};
use crate::kinematics::{move_towards, remap_clamp};

/// Насколько далеко за краем экрана райдер разворачивается
const TURN_AROUND_MARGIN: f32 = 200.0;
/// Дистанция, на которой двигатель слышен в канале
const ENGINE_PAN_RANGE: f32 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RiderState {
    pub speed: f32,
    pub target_speed: f32,
    /// Последний отправленный pan (cue только при изменении)
    pub last_pan: Option<(f32, f32)>,
}

impl Default for RiderState {
    fn default() -> Self {
        Self {
            speed: SCOOTER_SPEED_SLOW,
            target_speed: SCOOTER_SPEED_SLOW,
            last_pan: None,
        }
    }
}

impl RiderState {
    pub fn accelerating(&self) -> bool {
        self.speed < self.target_speed
    }
}

/// Громкость двигателя в левом/правом канале по x относительно игрока
pub fn engine_pan(rider_x: f32, player_x: f32) -> (f32, f32) {
    let rel = rider_x - player_x;
    let half = ENGINE_PAN_RANGE / 2.0;
    let left = remap_clamp((rel + half).abs(), 0.0, ENGINE_PAN_RANGE, 1.0, 0.0);
    let right = remap_clamp((rel - half).abs(), 0.0, ENGINE_PAN_RANGE, 1.0, 0.0);
    (left, right)
}

pub(crate) fn ride(
    rider: &mut RiderState,
    target: &mut Vec2,
    id: FighterId,
    body: &mut FighterBody,
    scene: &mut Scene<'_>,
    ctx: &mut SimContext,
) {
    let Some(player) = scene.peers.player() else {
        return;
    };
    let player_pos = player.body.pos;
    let player_standing = player.body.falling_state == FallingState::Standing;
    let player_height = player.body.height_above_ground;

    let pan = engine_pan(body.pos.x, player_pos.x);
    if rider.last_pan != Some(pan) {
        rider.last_pan = Some(pan);
        let (left, right) = pan;
        ctx.cue(Cue::EnginePan { rider: id, left, right });
    }

    if rider.speed != rider.target_speed {
        rider.speed = move_towards(rider.speed, rider.target_speed, SCOOTER_ACCELERATION).0;
        body.frame += 1;
    } else if scene.field.on_screen(body.pos.x) && ctx.rng.gen_range(0..=30) == 0 {
        rider.target_speed = SCOOTER_SPEED_FAST;
        ctx.cue(Cue::Engine {
            rider: id,
            sound: SoundRef::varied("sfx/scooter/scooter_accelerate", 6),
            looping: false,
        });
        body.frame = 0;
    }

    target.x = body.pos.x + body.facing * rider.speed;
    body.pos.x = target.x;

    // Разворот по экранной координате, не по мировой
    let screen_x = scene.field.screen_x(body.pos.x);
    if (body.facing > 0.0 && screen_x > WIDTH + TURN_AROUND_MARGIN)
        || (body.facing < 0.0 && screen_x < -TURN_AROUND_MARGIN)
    {
        body.facing = -body.facing;
        target.y = player_pos.y;

        if player_standing {
            body.pos.y = target.y;
        } else {
            // Лежачего не добиваем: новая линия подальше от игрока
            while (body.pos.y - target.y).abs() < SCOOTER_REALIGN_MIN_DY {
                body.pos.y = ctx.rng.gen_range(MIN_WALK_Y as i32..=HEIGHT as i32 - 1) as f32;
            }
        }

        rider.target_speed = SCOOTER_SPEED_SLOW;
        rider.speed = SCOOTER_SPEED_SLOW;
        ctx.cue(Cue::Engine {
            rider: id,
            sound: SoundRef::new("sfx/scooter/scooter_slow"),
            looping: true,
        });
    }

    // Наезд на игрока
    let run_over = player_standing
        && (player_pos.y - body.pos.y).abs() < SCOOTER_HIT_Y
        && (body.pos.x - player_pos.x).abs() < SCOOTER_HIT_X
        && player_height < SCOOTER_HIT_MAX_HEIGHT;
    if !run_over {
        return;
    }
    let Some(attack) = ctx.attacks.get("scooter_hit") else {
        return;
    };
    let hitter = Hitter {
        id: Some(id),
        pos: body.pos,
        armed_with: body.weapon,
    };
    if let Some(player) = scene.peers.player_mut() {
        player.hit(&hitter, &attack, scene.weapons, ctx);
    }
}
