//! Tests for the enemy decision state machine.

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;

    use super::super::brain::AiState;
    use crate::combat::{Archetype, Brain, FallingState, Fighter, IntentProvider};
    use crate::encounter::{Field, FighterId, SimContext, WeaponId};
    use crate::physics::Weapon;
    use crate::test_support::{ctx, enemy_at, hero_at, with_scene};

    fn think(fighters: &mut [Fighter], index: usize, weapons: &mut [Weapon], ctx: &mut SimContext) {
        let field = Field::default();
        with_scene(fighters, index, weapons, &field, |me, scene| {
            if let Brain::Enemy(brain) = &mut me.brain {
                brain.think(me.id, &mut me.body, scene, ctx);
            }
        });
    }

    fn state(fighter: &Fighter) -> Option<AiState> {
        fighter.enemy_brain().map(|b| b.state)
    }

    fn set_state(fighter: &mut Fighter, state: AiState) {
        if let Some(brain) = fighter.enemy_brain_mut() {
            brain.state = state;
        }
    }

    #[test]
    fn test_waits_for_start_timer() {
        let mut ctx = ctx(1);
        let mut fighters = vec![
            hero_at(Vec2::new(400.0, 400.0)),
            enemy_at(Archetype::Vax, 1, Vec2::new(600.0, 400.0)),
        ];

        // start_timer 20: решение на 21-м тике
        for _ in 0..20 {
            think(&mut fighters, 1, &mut [], &mut ctx);
            assert_eq!(state(&fighters[1]), Some(AiState::Pause));
        }
        think(&mut fighters, 1, &mut [], &mut ctx);
        assert_ne!(state(&fighters[1]), Some(AiState::Pause));
    }

    #[test]
    fn test_only_enemy_goes_straight_for_player() {
        let mut ctx = ctx(1);
        let mut fighters = vec![
            hero_at(Vec2::new(400.0, 400.0)),
            enemy_at(Archetype::Vax, 1, Vec2::new(600.0, 420.0)),
        ];
        if let Some(brain) = fighters[1].enemy_brain_mut() {
            brain.state_timer = 0;
        }

        think(&mut fighters, 1, &mut [], &mut ctx);
        assert_eq!(state(&fighters[1]), Some(AiState::ApproachPlayer));

        // Встаёт на approach distance со своей стороны, на линии игрока
        think(&mut fighters, 1, &mut [], &mut ctx);
        assert_eq!(fighters[1].enemy_brain().map(|b| b.target), Some(Vec2::new(485.0, 400.0)));
    }

    #[test]
    fn test_second_enemy_on_same_target_rethinks() {
        let mut ctx = ctx(2);
        let mut fighters = vec![
            hero_at(Vec2::new(400.0, 400.0)),
            enemy_at(Archetype::Vax, 1, Vec2::new(600.0, 400.0)),
            enemy_at(Archetype::Vax, 2, Vec2::new(620.0, 400.0)),
        ];
        set_state(&mut fighters[1], AiState::ApproachPlayer);
        set_state(&mut fighters[2], AiState::ApproachPlayer);

        think(&mut fighters, 1, &mut [], &mut ctx);
        think(&mut fighters, 2, &mut [], &mut ctx);

        // Первый занял точку, второй выбрал что-то другое
        assert_eq!(state(&fighters[1]), Some(AiState::ApproachPlayer));
        assert_ne!(state(&fighters[2]), Some(AiState::ApproachPlayer));
    }

    #[test]
    fn test_attacks_only_when_in_band_and_level() {
        let mut ctx = ctx(3);
        let mut fighters = vec![
            hero_at(Vec2::new(400.0, 400.0)),
            enemy_at(Archetype::Vax, 1, Vec2::new(485.0, 400.0)),
        ];

        let mut attempt = |fighters: &mut Vec<Fighter>, tries: usize| -> Option<String> {
            let field = Field::default();
            with_scene(fighters, 1, &mut [], &field, |me, scene| {
                me.enemy_brain().and_then(|brain| {
                    (0..tries).find_map(|_| {
                        brain
                            .desired_attack(&me.body, &*scene, &mut ctx)
                            .map(|a| a.name.clone())
                    })
                })
            })
        };

        // В PAUSE не бьёт никогда
        assert_eq!(attempt(&mut fighters, 200), None);

        set_state(&mut fighters[1], AiState::ApproachPlayer);
        let name = attempt(&mut fighters, 2000).expect("1 in 20 chance fires within 2000 tries");
        assert!(["vax_lpunch", "vax_rpunch", "vax_pound"].contains(&name.as_str()));

        // Не на одной линии
        fighters[1].body.pos.y = 401.0;
        assert_eq!(attempt(&mut fighters, 200), None);

        // Слишком близко
        fighters[1].body.pos = Vec2::new(440.0, 400.0);
        assert_eq!(attempt(&mut fighters, 200), None);

        // Игрок лежит
        fighters[1].body.pos = Vec2::new(485.0, 400.0);
        fighters[0].body.falling_state = FallingState::Falling;
        assert_eq!(attempt(&mut fighters, 200), None);
    }

    #[test]
    fn test_boss_walks_to_barrel_and_picks_it_up() {
        let mut ctx = ctx(4);
        let field = Field::default();
        let mut fighters = vec![
            hero_at(Vec2::new(100.0, 400.0)),
            enemy_at(Archetype::Boss, 1, Vec2::new(560.0, 400.0)),
        ];
        if let Some(brain) = fighters[1].enemy_brain_mut() {
            brain.state_timer = 0;
        }
        let mut weapons = vec![Weapon::barrel(WeaponId(0), Vec2::new(500.0, 400.0))];

        think(&mut fighters, 1, &mut weapons, &mut ctx);
        assert_eq!(state(&fighters[1]), Some(AiState::GoToWeapon));
        assert_eq!(fighters[1].enemy_brain().and_then(|b| b.target_weapon), Some(WeaponId(0)));

        for _ in 0..300 {
            with_scene(&mut fighters, 1, &mut weapons, &field, |me, scene| me.tick(scene, &mut ctx));
            if fighters[1].body.weapon.is_some() {
                break;
            }
        }

        assert_eq!(fighters[1].body.weapon, Some(WeaponId(0)));
        assert!(weapons[0].held);
        assert_eq!(weapons[0].holder, Some(FighterId(1)));
        assert_eq!(fighters[1].enemy_brain().and_then(|b| b.target_weapon), None);
    }

    #[test]
    fn test_claimed_barrel_is_left_alone() {
        let mut ctx = ctx(4);
        let mut fighters = vec![
            hero_at(Vec2::new(100.0, 400.0)),
            enemy_at(Archetype::Boss, 1, Vec2::new(560.0, 400.0)),
            enemy_at(Archetype::Boss, 2, Vec2::new(700.0, 450.0)),
        ];
        if let Some(brain) = fighters[2].enemy_brain_mut() {
            brain.state = AiState::GoToWeapon;
            brain.target_weapon = Some(WeaponId(0));
            brain.target = Vec2::new(500.0, 400.0);
        }
        if let Some(brain) = fighters[1].enemy_brain_mut() {
            brain.state_timer = 0;
        }
        let mut weapons = vec![Weapon::barrel(WeaponId(0), Vec2::new(500.0, 400.0))];

        think(&mut fighters, 1, &mut weapons, &mut ctx);
        assert_ne!(state(&fighters[1]), Some(AiState::GoToWeapon));
        assert_eq!(fighters[1].enemy_brain().and_then(|b| b.target_weapon), None);
    }

    #[test]
    fn test_knocked_down_enemy_decides_after_getting_up() {
        let mut ctx = ctx(5);
        let mut fighters = vec![
            hero_at(Vec2::new(400.0, 400.0)),
            enemy_at(Archetype::Hoodie, 1, Vec2::new(600.0, 400.0)),
        ];
        set_state(&mut fighters[1], AiState::KnockedDown);
        fighters[1].body.falling_state = FallingState::GettingUp;

        think(&mut fighters, 1, &mut [], &mut ctx);
        assert_eq!(state(&fighters[1]), Some(AiState::KnockedDown));

        fighters[1].body.falling_state = FallingState::Standing;
        think(&mut fighters, 1, &mut [], &mut ctx);
        assert_eq!(state(&fighters[1]), Some(AiState::ApproachPlayer));
    }

    #[test]
    fn test_hold_and_release() {
        let mut ctx = ctx(6);
        let mut fighters = vec![
            hero_at(Vec2::new(400.0, 400.0)),
            enemy_at(Archetype::Tengu, 1, Vec2::new(600.0, 400.0)),
        ];
        if let Some(brain) = fighters[1].enemy_brain_mut() {
            brain.hold();
            brain.state_timer = -5;
        }

        for _ in 0..10 {
            think(&mut fighters, 1, &mut [], &mut ctx);
        }
        assert_eq!(state(&fighters[1]), Some(AiState::Idle));
        assert!(fighters[1].enemy_brain().is_some_and(|b| b.ignores_hits()));

        if let Some(brain) = fighters[1].enemy_brain_mut() {
            brain.release();
            assert_eq!(brain.state, AiState::Pause);
            assert_eq!(brain.state_timer, 0);
            // Повторный release ничего не ломает
            brain.state = AiState::ApproachPlayer;
            brain.release();
            assert_eq!(brain.state, AiState::ApproachPlayer);
        }
    }
}
