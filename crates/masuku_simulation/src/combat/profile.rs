//! Профиль бойца: кто это (архетип), сколько очков стоит, как рендерить.

use serde::Serialize;

use crate::combat::SoundRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Archetype {
    Hero,
    Vax,
    Hoodie,
    Scooterboy,
    Boss,
    Portal,
    Kasaobake,
    YukiOnna,
    Tengu,
    Kappa,
}

impl Archetype {
    /// Префикс спрайтов
    pub fn sprite(&self) -> &'static str {
        match self {
            Archetype::Hero => "hero",
            Archetype::Vax => "vax",
            Archetype::Hoodie => "hoodie",
            Archetype::Scooterboy => "scooterboy",
            Archetype::Boss => "boss",
            Archetype::Portal => "portal",
            Archetype::Kasaobake => "kasaobake",
            Archetype::YukiOnna => "onna",
            Archetype::Tengu => "tengu",
            Archetype::Kappa => "kappa",
        }
    }
}

/// Ранг врага (mid/final boss показываются с именем и полоской здоровья)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EnemyRank {
    #[default]
    Normal,
    MidBoss,
    FinalBoss,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub archetype: Archetype,
    /// Цветовой вариант спрайта (0..=2), если у архетипа они есть
    pub colour_variant: Option<u8>,
    /// Очки за победу
    pub score: u32,
    pub rank: EnemyRank,
    /// Имя для UI боссов
    pub title: String,
    pub intro_image: Option<String>,
    /// Звук "меня ударили" (только портал)
    pub hit_sound: Option<SoundRef>,
    /// Тиков на кадр ходьбы/стойки
    pub anim_update_rate: i32,
    pub stand_frames: i32,
}

impl Profile {
    pub fn new(archetype: Archetype) -> Self {
        Self {
            archetype,
            colour_variant: None,
            score: 10,
            rank: EnemyRank::Normal,
            title: archetype.sprite().to_string(),
            intro_image: None,
            hit_sound: None,
            anim_update_rate: 14,
            stand_frames: 2,
        }
    }
}
