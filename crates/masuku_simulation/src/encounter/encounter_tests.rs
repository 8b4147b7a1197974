//! Tests for the encounter orchestrator: stages, scrolling, GC, spawns.

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;

    use super::super::{Cue, EnemySpawn, Encounter, Outcome, PickupKind, Stage};
    use crate::ai::{AiState, PortalSpec};
    use crate::combat::{Archetype, FallingState, SoundRef};
    use crate::config::{BOSS_INTRO_TICKS, MASK_SCORE};
    use crate::controls::ControlFrame;
    use crate::encounter::FighterId;
    use crate::physics::WeaponKind;
    use crate::test_support::ctx;

    fn encounter(stages: Vec<Stage>) -> Encounter {
        Encounter::new(stages, ctx(11))
    }

    fn idle(encounter: &mut Encounter, ticks: usize) {
        for _ in 0..ticks {
            encounter.step(&ControlFrame::idle());
        }
    }

    #[test]
    fn test_first_tick_starts_first_stage() {
        let mut enc = encounter(vec![Stage::new(0.0).music("theme_jap"), Stage::new(600.0)]);
        assert_eq!(enc.stage_index(), None);

        enc.step(&ControlFrame::idle());

        assert_eq!(enc.stage_index(), Some(0));
        assert_eq!(enc.frame(), 1);
        let cues = enc.drain_cues();
        assert!(cues.contains(&Cue::StageStarted { index: 0 }));
        assert!(cues.contains(&Cue::Weather(None)));
        assert!(cues.contains(&Cue::Music("theme_jap".to_string())));
    }

    #[test]
    fn test_stage_objects_appear_when_scrolling_starts() {
        let mut enc = encounter(vec![Stage::new(0.0), Stage::new(600.0).enemy(Archetype::Vax, 1400.0, 400.0)]);
        idle(&mut enc, 2);
        assert_eq!(enc.stage_index(), Some(1));
        assert_eq!(enc.max_scroll_x(), 600.0);
        assert_eq!(enc.fighters().len(), 1, "enemies wait for the camera");

        let right = ControlFrame::idle().with_axis(1.0, 0.0);
        let mut ticks = 0;
        while !enc.is_scrolling() && ticks < 200 {
            enc.step(&right);
            ticks += 1;
        }
        assert!(enc.is_scrolling());
        assert_eq!(enc.enemies().count(), 1);

        while (enc.is_scrolling() || enc.field().scroll_x < 600.0) && ticks < 2000 {
            enc.step(&right);
            ticks += 1;
        }
        assert_eq!(enc.field().scroll_x, 600.0);
        assert_eq!(enc.field().boundary.left, 600.0);
        // Объекты стадии создаются один раз
        assert_eq!(enc.enemies().count(), 1);
    }

    #[test]
    fn test_cleared_stages_lead_to_victory() {
        let mut enc = encounter(vec![
            Stage::new(0.0),
            Stage::new(0.0).enemy(Archetype::Vax, 600.0, 400.0).weather("rain"),
        ]);
        idle(&mut enc, 2);
        assert_eq!(enc.stage_index(), Some(1));
        let vax = enc.enemies().map(|f| f.id).next().expect("stage enemy spawned");
        assert!(enc.drain_cues().contains(&Cue::Weather(Some("rain".to_string()))));

        if let Some(fighter) = enc.fighter_mut(vax) {
            fighter.body.lives = 0;
        }
        enc.step(&ControlFrame::idle());

        assert_eq!(enc.score(), 20);
        assert_eq!(enc.outcome(), Outcome::Won);
        let cues = enc.drain_cues();
        assert!(cues.contains(&Cue::Victory));
        assert!(cues.contains(&Cue::Weather(None)));

        // Больше ничего не происходит
        let frame = enc.frame();
        idle(&mut enc, 5);
        assert_eq!(enc.frame(), frame);
    }

    #[test]
    fn test_player_out_of_lives_is_game_over() {
        let mut enc = encounter(vec![Stage::new(0.0), Stage::new(600.0)]);
        idle(&mut enc, 1);
        if let Some(player) = enc.player_mut() {
            player.body.lives = 0;
        }
        enc.step(&ControlFrame::idle());

        assert_eq!(enc.outcome(), Outcome::Lost);
        assert!(enc.drain_cues().contains(&Cue::GameOver));
        assert!(enc.player().is_some(), "player stays in the roster");
    }

    #[test]
    fn test_walking_over_mask_scores() {
        let mut enc = encounter(vec![
            Stage::new(0.0).pickup(PickupKind::Mask, 400.0).enemy(Archetype::Vax, 700.0, 400.0),
        ]);
        idle(&mut enc, 1);
        assert_eq!(enc.pickups().len(), 1);

        if let Some(player) = enc.player_mut() {
            player.body.pos = Vec2::new(400.0, 320.0);
        }
        enc.step(&ControlFrame::idle());

        assert_eq!(enc.score(), MASK_SCORE);
        assert!(enc.pickups().is_empty(), "collected pickups are removed");
    }

    #[test]
    fn test_health_pickup_saves_dying_player() {
        let mut enc = encounter(vec![
            Stage::new(0.0).pickup(PickupKind::Health, 400.0).enemy(Archetype::Vax, 700.0, 400.0),
        ]);
        idle(&mut enc, 1);

        if let Some(player) = enc.player_mut() {
            player.body.pos = Vec2::new(400.0, 320.0);
            player.body.falling_state = FallingState::Falling;
            player.body.health = 0;
            player.body.frame = 5;
        }
        enc.step(&ControlFrame::idle());
        assert_eq!(enc.player().map(|p| p.body.health), Some(30));

        let mut ticks = 0;
        while enc.player().is_some_and(|p| p.body.falling_state == FallingState::Falling) && ticks < 300 {
            enc.step(&ControlFrame::idle());
            ticks += 1;
        }
        let player = enc.player().expect("player");
        assert_eq!(player.body.falling_state, FallingState::GettingUp);
        assert_eq!(player.body.lives, 3, "no life lost");
    }

    #[test]
    fn test_boss_intro_holds_boss_then_releases() {
        let mut enc = encounter(vec![Stage::new(0.0).boss(Archetype::YukiOnna, 600.0, 400.0)]);
        idle(&mut enc, 1);

        let boss = FighterId(1);
        let boss_state = |enc: &Encounter| enc.fighter(boss).and_then(|f| f.enemy_brain()).map(|b| b.state);
        assert_eq!(boss_state(&enc), Some(AiState::Idle));
        assert_eq!(enc.boss_intro_remaining(), Some(BOSS_INTRO_TICKS));
        assert!(enc.drain_cues().contains(&Cue::BossIntro {
            boss,
            title: "雪女 (Yuki-onna)".to_string(),
            image: Some("onna_boss_intro".to_string()),
        }));

        idle(&mut enc, BOSS_INTRO_TICKS as usize - 1);
        assert_eq!(enc.boss_intro_remaining(), Some(1));
        assert_eq!(boss_state(&enc), Some(AiState::Idle));

        idle(&mut enc, 1);
        assert_eq!(enc.boss_intro_remaining(), None);
        assert_eq!(boss_state(&enc), Some(AiState::Pause));
    }

    #[test]
    fn test_portal_spawns_join_roster() {
        let mut enc = encounter(vec![Stage::new(0.0)]);
        enc.spawn_enemy(&EnemySpawn::portal(
            Vec2::new(650.0, 400.0),
            PortalSpec::new(vec![Archetype::Vax], 60),
        ));
        assert!(enc
            .drain_cues()
            .contains(&Cue::Sound(SoundRef::new("sfx/portal/portal_appear"))));

        idle(&mut enc, 200);

        let vaxes = enc.enemies().filter(|f| f.profile.archetype == Archetype::Vax).count();
        assert!(vaxes >= 1, "portal should have produced at least one enemy");
        assert_eq!(enc.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_offscreen_and_broken_weapons_are_removed() {
        let mut enc = encounter(vec![Stage::new(0.0).enemy(Archetype::Vax, 700.0, 400.0)]);
        let far = enc.place_weapon(WeaponKind::Barrel, Vec2::new(-300.0, 400.0));
        let kept = enc.place_weapon(WeaponKind::Barrel, Vec2::new(-100.0, 400.0));
        enc.step(&ControlFrame::idle());

        let ids: Vec<_> = enc.weapons().iter().map(|w| w.id).collect();
        assert!(!ids.contains(&far));
        assert!(ids.contains(&kept));
    }

    #[test]
    fn test_rider_engine_cues() {
        let mut enc = encounter(vec![Stage::new(0.0)]);
        let rider = enc.spawn_enemy(&EnemySpawn::new(Archetype::Scooterboy, Vec2::new(200.0, 350.0)));
        assert!(enc.drain_cues().iter().any(|c| matches!(c, Cue::Engine { rider: r, looping: true, .. } if *r == rider)));

        enc.step(&ControlFrame::idle());
        assert!(enc
            .drain_cues()
            .iter()
            .any(|c| matches!(c, Cue::EnginePan { rider: r, .. } if *r == rider)));

        enc.shutdown();
        assert!(enc.drain_cues().contains(&Cue::EngineStop { rider }));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut enc = encounter(vec![Stage::new(0.0).enemy(Archetype::Hoodie, 700.0, 400.0)]);
        idle(&mut enc, 3);

        let snapshot = enc.snapshot();
        assert_eq!(snapshot.frame, 3);
        assert_eq!(snapshot.fighters.len(), 2);
        assert_eq!(snapshot.fighters[0].archetype, Archetype::Hero);

        let json = String::from_utf8(enc.snapshot_bytes().expect("snapshot serializes")).expect("utf8");
        assert!(json.contains("\"archetype\":\"Hoodie\""));
    }
}
