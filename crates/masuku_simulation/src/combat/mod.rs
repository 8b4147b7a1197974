//! Combat: приёмы, бойцы, попадания.
//!
//! Архитектура:
//! - `Attack` / `AttackTable`: неизменяемый каталог приёмов (JSON, load once)
//! - `Fighter { body, brain, profile }`: один тип для игрока и врагов
//! - `IntentProvider`: мозг говорит, что хочет; тело исполняет state machine
//! - hit: геометрия удара + урон/stamina/stun/knockdown

pub mod animation;
pub mod attack;
pub mod fighter;
pub mod hit;
pub mod intent;
pub mod profile;

pub use animation::{AnimationKind, AnimationView};
pub use attack::{Attack, AttackTable, SoundRef, REQUIRED_ATTACKS};
pub use fighter::{Brain, FallingState, Fighter, FighterBody};
pub use hit::{attack_connects, Hitter};
pub use intent::IntentProvider;
pub use profile::{Archetype, EnemyRank, Profile};
