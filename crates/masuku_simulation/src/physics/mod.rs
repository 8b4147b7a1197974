//! Physics для объектов без мозга: оружие/снаряды и обломки.

pub mod debris;
pub mod weapon;

pub use debris::Debris;
pub use weapon::{ground_contact, tick_weapon, Weapon, WeaponKind};
