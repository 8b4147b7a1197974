//! Фабрика бойцов: статы архетипов.

use bevy::math::Vec2;
use rand::Rng;

use crate::ai::{AiState, EnemyBrain, PortalState, RiderState, Tactic};
use crate::combat::{Archetype, Brain, EnemyRank, Fighter, FighterBody, Profile, SoundRef};
use crate::config::{ENEMY_APPROACH_PLAYER_DISTANCE, ENEMY_APPROACH_PLAYER_DISTANCE_SCOOTERBOY};
use crate::controls::PlayerBrain;
use crate::encounter::stage::EnemySpawn;
use crate::encounter::{FighterId, SimRng};

pub const HERO_START: Vec2 = Vec2::new(400.0, 400.0);

pub fn hero() -> Fighter {
    let body = FighterBody::new(HERO_START, Vec2::new(3.0, 2.0), 30, 500, 3);
    let profile = Profile {
        anim_update_rate: 8,
        ..Profile::new(Archetype::Hero)
    };
    Fighter::new(FighterId::PLAYER, body, Brain::Player(PlayerBrain::new()), profile)
}

/// Статы врага по архетипу (без позиции)
struct EnemyStats {
    attacks: &'static [&'static str],
    speed: Vec2,
    health: i32,
    stamina: i32,
    approach_distance: f32,
    half_hit_area: Vec2,
    coloured: bool,
    score: u32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            attacks: &[],
            speed: Vec2::new(1.0, 1.0),
            health: 15,
            stamina: 500,
            approach_distance: ENEMY_APPROACH_PLAYER_DISTANCE,
            half_hit_area: Vec2::new(25.0, 20.0),
            coloured: false,
            score: 10,
        }
    }
}

fn stats(archetype: Archetype) -> EnemyStats {
    match archetype {
        Archetype::Vax => EnemyStats {
            attacks: &["vax_lpunch", "vax_rpunch", "vax_pound"],
            coloured: true,
            score: 20,
            ..Default::default()
        },
        Archetype::Hoodie => EnemyStats {
            attacks: &["hoodie_lpunch", "hoodie_rpunch", "hoodie_special"],
            speed: Vec2::new(1.2, 1.0),
            health: 12,
            coloured: true,
            score: 20,
            ..Default::default()
        },
        Archetype::Scooterboy => EnemyStats {
            attacks: &["scooterboy_attack1"],
            approach_distance: ENEMY_APPROACH_PLAYER_DISTANCE_SCOOTERBOY,
            coloured: true,
            score: 30,
            ..Default::default()
        },
        Archetype::Boss => EnemyStats {
            attacks: &["boss_lpunch", "boss_rpunch", "boss_kick", "boss_grab_player"],
            speed: Vec2::new(0.9, 0.8),
            health: 25,
            stamina: 1000,
            half_hit_area: Vec2::new(30.0, 20.0),
            coloured: true,
            score: 75,
            ..Default::default()
        },
        Archetype::Portal => EnemyStats {
            half_hit_area: Vec2::new(50.0, 50.0),
            ..Default::default()
        },
        Archetype::Kasaobake => EnemyStats {
            attacks: &["kasaobake_attack"],
            speed: Vec2::new(0.5, 0.5),
            health: 100,
            stamina: 1000,
            score: 100,
            ..Default::default()
        },
        Archetype::YukiOnna => EnemyStats {
            attacks: &["onna_fight"],
            speed: Vec2::new(0.5, 0.5),
            health: 10,
            score: 200,
            ..Default::default()
        },
        Archetype::Tengu => EnemyStats {
            attacks: &["tengu_lattack", "tengu_rattack", "tengu_special"],
            speed: Vec2::new(0.5, 0.5),
            health: 10,
            stamina: 1000,
            score: 100,
            ..Default::default()
        },
        Archetype::Kappa => EnemyStats {
            attacks: &["kappa_fight", "kappa_kick"],
            speed: Vec2::new(0.5, 0.5),
            health: 5,
            score: 20,
            ..Default::default()
        },
        // Герой создаётся только через hero()
        Archetype::Hero => EnemyStats::default(),
    }
}

pub fn enemy(spawn: &EnemySpawn, id: FighterId, rng: &mut SimRng) -> Fighter {
    let archetype = spawn.archetype;
    debug_assert!(archetype != Archetype::Hero, "hero is not an enemy archetype");
    let stats = stats(archetype);

    let mut body = FighterBody::new(spawn.pos, stats.speed, stats.health, stats.stamina, 1);
    body.half_hit_area = stats.half_hit_area;

    let mut profile = Profile {
        score: stats.score,
        ..Profile::new(archetype)
    };
    if stats.coloured {
        profile.colour_variant = Some(rng.gen_range(0..=2));
    }

    let tactic = match archetype {
        Archetype::Boss => Tactic::BarrelSeeker,
        Archetype::Scooterboy => Tactic::Rider(RiderState::default()),
        Archetype::Portal => Tactic::Portal(PortalState::new(spawn.portal.clone().unwrap_or_default())),
        _ => Tactic::Brawler,
    };
    let attacks = stats.attacks.iter().map(|name| name.to_string()).collect();
    let mut brain = EnemyBrain::new(spawn.pos, attacks, stats.approach_distance, spawn.start_timer, tactic);

    match archetype {
        Archetype::Vax => profile.stand_frames = 3,
        Archetype::Scooterboy => brain.state = AiState::RidingMount,
        Archetype::Portal => {
            body.knockdown_immune = true;
            profile.hit_sound = Some(SoundRef::new("sfx/portal/portal_hit"));
        }
        Archetype::YukiOnna => {
            profile.rank = EnemyRank::MidBoss;
            profile.title = "雪女 (Yuki-onna)".to_string();
            profile.intro_image = Some("onna_boss_intro".to_string());
        }
        Archetype::Tengu => {
            profile.rank = EnemyRank::MidBoss;
            profile.title = "天狗 (Tengu)".to_string();
            profile.intro_image = Some("tengu_boss_intro".to_string());
        }
        _ => {}
    }

    Fighter::new(id, body, Brain::Enemy(brain), profile)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn spawn(archetype: Archetype) -> Fighter {
        let mut rng = SimRng::seed_from_u64(7);
        enemy(&EnemySpawn::new(archetype, Vec2::new(600.0, 400.0)), FighterId(5), &mut rng)
    }

    #[test]
    fn test_hero_stats() {
        let hero = hero();
        assert!(hero.is_player());
        assert_eq!(hero.id, FighterId::PLAYER);
        assert_eq!((hero.body.health, hero.body.lives, hero.body.stamina), (30, 3, 500));
        assert_eq!(hero.body.speed, Vec2::new(3.0, 2.0));
    }

    #[test]
    #[should_panic(expected = "hero is not an enemy archetype")]
    fn test_hero_cannot_be_spawned_as_enemy() {
        spawn(Archetype::Hero);
    }

    #[test]
    fn test_enemies_start_paused_with_one_life() {
        let vax = spawn(Archetype::Vax);
        assert_eq!(vax.body.lives, 1);
        assert_eq!(vax.enemy_brain().map(|b| b.state), Some(AiState::Pause));
        assert_eq!(vax.profile.stand_frames, 3);
        assert!(vax.profile.colour_variant.is_some_and(|c| c <= 2));
    }

    #[test]
    fn test_scooterboy_starts_riding() {
        let rider = spawn(Archetype::Scooterboy);
        let brain = rider.enemy_brain().cloned();
        assert_eq!(brain.as_ref().map(|b| b.state), Some(AiState::RidingMount));
        assert!(matches!(brain.map(|b| b.tactic), Some(Tactic::Rider(_))));
    }

    #[test]
    fn test_portal_is_immune_and_uses_default_spec() {
        let portal = spawn(Archetype::Portal);
        assert!(portal.body.knockdown_immune);
        assert_eq!(portal.body.half_hit_area, Vec2::new(50.0, 50.0));
        match portal.enemy_brain().map(|b| &b.tactic) {
            Some(Tactic::Portal(state)) => assert_eq!(state.spawn_timer, 60),
            other => panic!("expected portal tactic, got {other:?}"),
        }
    }

    #[test]
    fn test_mid_boss_profile() {
        let onna = spawn(Archetype::YukiOnna);
        assert_eq!(onna.profile.rank, EnemyRank::MidBoss);
        assert_eq!(onna.profile.intro_image.as_deref(), Some("onna_boss_intro"));
        assert_eq!(onna.profile.score, 200);
    }
}
