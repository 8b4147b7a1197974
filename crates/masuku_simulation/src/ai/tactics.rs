//! Специализации врагов поверх общего state machine.

use crate::ai::portal::PortalState;
use crate::ai::rider::RiderState;
use crate::encounter::scene::Scene;
use crate::encounter::WeaponId;
use crate::physics::WeaponKind;

/// Strategy: что архетип делает иначе, чем обычный драчун
#[derive(Debug, Clone, Default)]
pub enum Tactic {
    /// Только общий цикл решений
    #[default]
    Brawler,
    /// Босс: сначала ищет свободную бочку
    BarrelSeeker,
    /// На самокате, пока не собьют
    Rider(RiderState),
    /// Не ходит, порождает врагов
    Portal(PortalState),
}

/// Бочка на экране, которую можно поднять и за которой никто не идёт
pub fn unclaimed_barrel(scene: &Scene<'_>) -> Option<WeaponId> {
    scene
        .weapons
        .iter()
        .filter(|w| w.kind == WeaponKind::Barrel && w.can_be_picked_up() && scene.field.on_screen(w.pos.x))
        .find(|w| {
            !scene
                .peers
                .enemies()
                .any(|enemy| enemy.enemy_brain().and_then(|b| b.target_weapon) == Some(w.id))
        })
        .map(|w| w.id)
}
