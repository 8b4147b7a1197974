//! Описание стадий (data only).
//!
//! Стадия: враги + оружие + бонусы, которые появляются, когда камера начинает
//! скроллиться к `max_scroll_x`. Стадия кончается, когда врагов не осталось
//! и скролл дошёл до максимума.

use bevy::math::Vec2;

use crate::ai::PortalSpec;
use crate::combat::Archetype;
use crate::config::{Campaign, DEFAULT_ENEMY_START_TIMER, MIN_WALK_Y, PORTAL_START_TIMER};
use crate::encounter::pickup::PickupKind;
use crate::physics::WeaponKind;

/// Враг, которого надо создать при активации стадии
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySpawn {
    pub archetype: Archetype,
    pub pos: Vec2,
    /// Тиков в PAUSE до первого решения
    pub start_timer: i32,
    pub portal: Option<PortalSpec>,
}

impl EnemySpawn {
    pub fn new(archetype: Archetype, pos: Vec2) -> Self {
        let start_timer = if archetype == Archetype::Portal {
            PORTAL_START_TIMER
        } else {
            DEFAULT_ENEMY_START_TIMER
        };
        Self {
            archetype,
            pos,
            start_timer,
            portal: None,
        }
    }

    pub fn portal(pos: Vec2, spec: PortalSpec) -> Self {
        Self {
            portal: Some(spec),
            ..Self::new(Archetype::Portal, pos)
        }
    }

    pub fn with_start_timer(mut self, start_timer: i32) -> Self {
        self.start_timer = start_timer;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stage {
    pub enemies: Vec<EnemySpawn>,
    pub weapons: Vec<(WeaponKind, Vec2)>,
    pub pickups: Vec<(PickupKind, Vec2)>,
    pub max_scroll_x: f32,
    pub weather: Option<String>,
    pub music: Option<String>,
    /// Босс с intro (появляется замороженным, с заставкой)
    pub boss: Option<EnemySpawn>,
}

impl Stage {
    pub fn new(max_scroll_x: f32) -> Self {
        Self {
            max_scroll_x,
            ..Default::default()
        }
    }

    pub fn enemy(mut self, archetype: Archetype, x: f32, y: f32) -> Self {
        self.enemies.push(EnemySpawn::new(archetype, Vec2::new(x, y)));
        self
    }

    pub fn spawn(mut self, spawn: EnemySpawn) -> Self {
        self.enemies.push(spawn);
        self
    }

    pub fn weapon(mut self, kind: WeaponKind, x: f32, y: f32) -> Self {
        self.weapons.push((kind, Vec2::new(x, y)));
        self
    }

    pub fn pickup(mut self, kind: PickupKind, x: f32) -> Self {
        // Бонусы лежат у верхней границы пола
        self.pickups.push((kind, Vec2::new(x, MIN_WALK_Y)));
        self
    }

    pub fn weather(mut self, weather: &str) -> Self {
        self.weather = Some(weather.to_string());
        self
    }

    pub fn music(mut self, track: &str) -> Self {
        self.music = Some(track.to_string());
        self
    }

    pub fn boss(mut self, archetype: Archetype, x: f32, y: f32) -> Self {
        self.boss = Some(EnemySpawn::new(archetype, Vec2::new(x, y)));
        self
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }
}

pub fn stages_for(campaign: Campaign) -> Vec<Stage> {
    match campaign {
        Campaign::Streets => campaign_streets(),
        Campaign::YukiOnnaTrial => yuki_onna_trial(),
    }
}

/// Короткая проверка: разминка с худи, потом Юки-онна с intro
pub fn yuki_onna_trial() -> Vec<Stage> {
    vec![
        Stage::new(0.0).music("theme_jap"),
        Stage::new(1400.0).enemy(Archetype::Hoodie, 2100.0, 380.0),
        Stage::new(2400.0)
            .boss(Archetype::YukiOnna, 2800.0, 400.0)
            .music("final_boss")
            .weather("leaves"),
    ]
}

/// Полная кампания: улицы, порталы, ёкаи
pub fn campaign_streets() -> Vec<Stage> {
    use Archetype::*;

    let portal = |x: f32, y: f32, who: Archetype, change: i32| {
        EnemySpawn::portal(
            Vec2::new(x, y),
            PortalSpec::new(vec![who], 60).with_interval_change(change).with_max_enemies(20),
        )
        .with_start_timer(600)
    };

    vec![
        Stage::new(0.0).music("theme_jap"),
        Stage::new(600.0)
            .enemy(Vax, 1400.0, 400.0)
            .enemy(Hoodie, 1500.0, 500.0)
            .weapon(WeaponKind::Barrel, 1600.0, 400.0),
        Stage::new(600.0).enemy(Scooterboy, 200.0, 400.0),
        Stage::new(900.0).enemy(Boss, 1800.0, 400.0).enemy(Vax, 400.0, 400.0),
        Stage::new(1400.0)
            .enemy(Hoodie, 2100.0, 380.0)
            .enemy(Hoodie, 2100.0, 480.0)
            .enemy(Hoodie, 800.0, 420.0)
            .pickup(PickupKind::Health, 2300.0),
        Stage::new(1900.0)
            .enemy(Vax, 2400.0, 380.0)
            .enemy(Hoodie, 2500.0, 480.0)
            .enemy(Scooterboy, 2800.0, 400.0),
        Stage::new(2500.0)
            .enemy(Scooterboy, 3800.0, 380.0)
            .enemy(Scooterboy, 3300.0, 480.0)
            .enemy(Scooterboy, 1200.0, 400.0),
        Stage::new(3000.0)
            .enemy(Vax, 4000.0, 380.0)
            .enemy(Vax, 3900.0, 480.0)
            .enemy(Vax, 4200.0, 460.0)
            .enemy(Vax, 4200.0, 450.0)
            .enemy(Hoodie, 3900.0, 300.0)
            .enemy(Hoodie, 3950.0, 320.0),
        Stage::new(3600.0)
            .enemy(Vax, 4600.0, 380.0)
            .enemy(Scooterboy, 1200.0, 350.0)
            .enemy(Scooterboy, 1400.0, 350.0)
            .enemy(Scooterboy, 1600.0, 350.0)
            .enemy(Scooterboy, 1800.0, 350.0)
            .enemy(Scooterboy, 2000.0, 350.0)
            .pickup(PickupKind::Health, 5100.0),
        Stage::new(4600.0)
            .enemy(Hoodie, 4800.0, 380.0)
            .enemy(Hoodie, 4800.0, 350.0)
            .enemy(Scooterboy, 1200.0, 350.0)
            .enemy(Scooterboy, 1400.0, 350.0)
            .enemy(Scooterboy, 4800.0, 350.0)
            .enemy(Scooterboy, 4800.0, 400.0)
            .enemy(Scooterboy, 4900.0, 450.0),
        Stage::new(5500.0)
            .enemy(Boss, 6500.0, 380.0)
            .enemy(Boss, 6500.0, 360.0)
            .weapon(WeaponKind::Barrel, 6000.0, 400.0)
            .weapon(WeaponKind::Barrel, 5900.0, 370.0),
        Stage::new(6400.0)
            .enemy(Boss, 7000.0, 380.0)
            .enemy(Boss, 7000.0, 360.0)
            .enemy(Boss, 7000.0, 390.0)
            .weapon(WeaponKind::Barrel, 7000.0, 380.0),
        Stage::new(6900.0)
            .enemy(Scooterboy, 7400.0, 400.0)
            .enemy(Scooterboy, 7700.0, 400.0)
            .enemy(Scooterboy, 8000.0, 400.0)
            .enemy(Scooterboy, 8300.0, 400.0)
            .pickup(PickupKind::ExtraLife, 8600.0),
        Stage::new(8800.0)
            .enemy(Hoodie, 9300.0, 380.0)
            .enemy(Hoodie, 9300.0, 480.0)
            .enemy(Hoodie, 10000.0, 380.0)
            .enemy(Hoodie, 10000.0, 480.0)
            .enemy(Hoodie, 11000.0, 380.0)
            .enemy(Hoodie, 11000.0, 480.0),
        Stage::new(10000.0)
            .enemy(Boss, 11000.0, 380.0)
            .enemy(Boss, 11000.0, 360.0)
            .enemy(Boss, 11000.0, 390.0)
            .enemy(Scooterboy, 11000.0, 450.0)
            .weapon(WeaponKind::Barrel, 11000.0, 350.0)
            .weapon(WeaponKind::Barrel, 11000.0, 430.0)
            .weapon(WeaponKind::Barrel, 11100.0, 390.0),
        Stage::new(11200.0)
            .enemy(Vax, 11500.0, 380.0)
            .enemy(Vax, 11500.0, 400.0)
            .enemy(Vax, 11500.0, 420.0)
            .enemy(Vax, 11600.0, 380.0)
            .enemy(Vax, 11600.0, 400.0)
            .enemy(Vax, 11600.0, 420.0),
        Stage::new(13000.0)
            .enemy(Hoodie, 13300.0, 380.0)
            .enemy(Hoodie, 13300.0, 420.0)
            .enemy(Hoodie, 13300.0, 460.0)
            .enemy(Scooterboy, 13300.0, 330.0)
            .enemy(Scooterboy, 13300.0, 360.0)
            .enemy(Scooterboy, 13300.0, 390.0)
            .enemy(Scooterboy, 13300.0, 420.0)
            .pickup(PickupKind::Health, 13200.0),
        Stage::new(15000.0)
            .enemy(Boss, 15600.0, 360.0)
            .enemy(Boss, 15600.0, 380.0)
            .enemy(Boss, 15600.0, 400.0)
            .enemy(Scooterboy, 15600.0, 350.0)
            .enemy(Scooterboy, 15600.0, 430.0)
            .weapon(WeaponKind::Barrel, 15600.0, 350.0)
            .weapon(WeaponKind::Barrel, 15600.0, 410.0)
            .weapon(WeaponKind::Barrel, 15650.0, 390.0),
        Stage::new(17000.0)
            .enemy(Vax, 17400.0, 380.0)
            .enemy(Vax, 17400.0, 420.0)
            .enemy(Vax, 17500.0, 380.0)
            .enemy(Vax, 17500.0, 420.0)
            .enemy(Vax, 17700.0, 380.0)
            .enemy(Vax, 17700.0, 420.0),
        Stage::new(19000.0)
            .enemy(Hoodie, 19500.0, 380.0)
            .enemy(Hoodie, 19500.0, 420.0)
            .enemy(Scooterboy, 19500.0, 350.0)
            .enemy(Scooterboy, 19500.0, 390.0)
            .enemy(Scooterboy, 19500.0, 430.0)
            .pickup(PickupKind::ExtraLife, 19500.0),
        Stage::new(20500.0)
            .enemy(Boss, 21500.0, 390.0)
            .enemy(Boss, 18200.0, 320.0)
            .enemy(Boss, 17800.0, 390.0)
            .pickup(PickupKind::ExtraLife, 20900.0),
        Stage::new(20500.0)
            .spawn(portal(20700.0, 315.0, Vax, 5))
            .spawn(portal(20700.0, 440.0, Hoodie, 10))
            .spawn(portal(21100.0, 315.0, Scooterboy, 15))
            .spawn(portal(21100.0, 440.0, Boss, 20)),
        Stage::new(21400.0)
            .enemy(Kappa, 22000.0, 380.0)
            .enemy(Kappa, 22000.0, 440.0)
            .enemy(Kasaobake, 22200.0, 400.0)
            .weather("leaves"),
        Stage::new(22400.0)
            .boss(Tengu, 22900.0, 400.0)
            .music("final_boss")
            .weather("leaves"),
    ]
}
