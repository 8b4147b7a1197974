//! Tuning constants + runtime config resource.
//!
//! Значения совпадают с оригинальной таблицей тюнинга игры; все единицы в
//! игровых пикселях и тиках (60 тиков = 1 секунда).

use bevy::prelude::*;

// ===== Screen / world =====

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 480.0;
/// Верхняя граница "пола", выше ходить нельзя
pub const MIN_WALK_Y: f32 = 310.0;

// ===== Gravity / impulses =====

pub const JUMP_GRAVITY: f32 = 0.4;
pub const THROWN_GRAVITY: f32 = 0.025;
pub const WEAPON_GRAVITY: f32 = 0.5;
pub const FLYING_KICK_VEL: Vec2 = Vec2::new(3.0, -8.0);
pub const BARREL_THROW_VEL: Vec2 = Vec2::new(4.0, 0.0);
pub const PLAYER_THROW_VEL: Vec2 = Vec2::new(5.0, 0.5);
pub const KNOCKBACK_SPEED: f32 = 10.0;
pub const KNOCKBACK_FRICTION: f32 = 0.5;

// ===== Combat =====

pub const BASE_STAMINA_DAMAGE_MULTIPLIER: f32 = 100.0;
pub const MIN_STAMINA: i32 = -100;
/// Stamina на этом уровне и ниже = "выдохся": knockdown при попадании,
/// тройной recovery. Полоса до MIN_STAMINA это овердрафт.
pub const EXHAUSTED_STAMINA: i32 = 0;
/// Попадание, оставившее меньше DEATH_THRESHOLD health, добивает до 0
pub const DEATH_THRESHOLD: i32 = 3;
pub const HIT_STUN_PER_STRENGTH: f32 = 8.0;
/// Окно (в тиках после конца атаки), в котором кнопка продолжает комбо
pub const COMBO_WINDOW: i32 = 30;

// ===== Fighter state machine dwell times =====

pub const KNOCKDOWN_TICKS: i32 = 120;
pub const DEATH_TICKS: i32 = 240;
pub const GET_UP_TICKS: i32 = 20;
pub const PICKUP_TICKS: i32 = 30;
/// THROWN → FALLING стартует с этого кадра (короче лежим на полу)
pub const THROWN_LANDING_FRAME: i32 = 80;
pub const THROWN_OFFSET_X: f32 = 50.0;
pub const THROWN_HEIGHT: f32 = 45.0;
/// Через сколько кадров падения с самоката отделяется debris
pub const SCOOTER_DETACH_FRAME: i32 = 10;

// ===== Weapons =====

pub const WEAPON_HOLD_HEIGHT: f32 = 100.0;
pub const WEAPON_HOLD_OFFSET_X: f32 = 20.0;
pub const PICKUP_RADIUS: f32 = 50.0;
pub const BARREL_HEIGHT: f32 = 40.0;
pub const BARREL_THROW_OFFSET_X: f32 = 104.0;
pub const BARREL_COLLISION_X: f32 = 30.0;
pub const BARREL_COLLISION_Y: f32 = 30.0;
pub const DEFAULT_AIR_FRICTION: f32 = 0.996;
pub const DEFAULT_GROUND_FRICTION: f32 = 0.5;
pub const STOP_VELOCITY: f32 = 0.05;
/// Оружие левее экрана дальше этого расстояния удаляется
pub const OFFSCREEN_CULL: f32 = 200.0;

// ===== Enemy AI =====

pub const ENEMY_APPROACH_PLAYER_DISTANCE: f32 = 85.0;
pub const ENEMY_APPROACH_PLAYER_DISTANCE_SCOOTERBOY: f32 = 140.0;
pub const ENEMY_APPROACH_PLAYER_DISTANCE_BARREL: f32 = 180.0;
pub const ENEMY_TARGET_DEDUP_DISTANCE: f32 = 20.0;
pub const ENEMY_BACK_AWAY_DISTANCE: f32 = 90.0;
pub const ENEMY_FLANK_OFFSET: f32 = 50.0;
pub const ENEMY_MID_RANGE_MIN: f32 = 150.0;
pub const ENEMY_MID_RANGE_MAX: f32 = 400.0;
/// Enemy бьёт, если |dx| в (0.9, 1.1] от approach distance
pub const ENEMY_ATTACK_BAND_NEAR: f32 = 0.9;
pub const ENEMY_ATTACK_BAND_FAR: f32 = 1.1;
pub const DEFAULT_ENEMY_START_TIMER: i32 = 20;

// ===== Scooter rider =====

pub const SCOOTER_SPEED_SLOW: f32 = 4.0;
pub const SCOOTER_SPEED_FAST: f32 = 12.0;
pub const SCOOTER_ACCELERATION: f32 = 0.2;
pub const SCOOTER_HIT_X: f32 = 60.0;
pub const SCOOTER_HIT_Y: f32 = 30.0;
pub const SCOOTER_HIT_MAX_HEIGHT: f32 = 20.0;
pub const SCOOTER_REALIGN_MIN_DY: f32 = 40.0;
pub const SCOOTER_DEBRIS_SPEED: f32 = 8.0;
pub const SCOOTER_DEBRIS_FRICTION: f32 = 0.94;
pub const SCOOTER_DEBRIS_LIFETIME: u32 = 200;

// ===== Portal =====

pub const PORTAL_GENERATE_TICKS: i32 = 96;
pub const PORTAL_RETRY_TICKS: i32 = 60;
pub const PORTAL_EXPLODE_TICKS: i32 = 50;
pub const PORTAL_START_TIMER: i32 = 90;

// ===== Encounter =====

pub const SCROLL_TRIGGER_X: f32 = WIDTH - 300.0;
pub const PICKUP_COLLECT_RADIUS: f32 = 30.0;
pub const EXTRA_LIFE_FLASH_TICKS: i32 = 30;
pub const BOSS_INTRO_TICKS: i32 = 180;
pub const MASK_SCORE: u32 = 50;

/// Runtime-настройки симуляции (то, что имеет смысл менять без перекомпиляции)
#[derive(Resource, Debug, Clone)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Логировать решения AI и переходы fighter'ов (шумно)
    pub debug_logging: bool,
    /// Какую кампанию запускать
    pub campaign: Campaign,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            debug_logging: false,
            campaign: Campaign::Streets,
        }
    }
}

/// Встроенные наборы стадий
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Campaign {
    /// Полная кампания: улицы → порталы → ёкаи
    #[default]
    Streets,
    /// Короткая дуэль с Юки-онной (boss intro)
    YukiOnnaTrial,
}
