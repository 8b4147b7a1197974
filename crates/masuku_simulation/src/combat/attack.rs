//! Attack definitions: immutable каталог приёмов, загружается один раз из JSON.
//!
//! Формат файла: объект `name → definition`. Поля с дефолтами можно
//! опускать; `strength` и `anim_time` обязательны. Ключи `combo_next`
//! в JSON строки ("0"), при загрузке нормализуются в номер кнопки.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::{BASE_STAMINA_DAMAGE_MULTIPLIER, HIT_STUN_PER_STRENGTH};
use crate::error::ConfigError;

/// Встроенная таблица (assets/attacks.json)
const BUILTIN_ATTACKS: &str = include_str!("../../assets/attacks.json");

/// Имена, без которых симуляция не может работать: приёмы игрока,
/// атаки оружием, столкновения с объектами и атаки всех архетипов врагов.
pub const REQUIRED_ATTACKS: &[&str] = &[
    // hero
    "punch",
    "kick",
    "highkick",
    "elbow",
    "flyingkick",
    // weapons / hazards
    "barrel",
    "stick",
    "chain",
    "scooter_hit",
    // enemies
    "vax_lpunch",
    "vax_rpunch",
    "vax_pound",
    "hoodie_lpunch",
    "hoodie_rpunch",
    "hoodie_special",
    "scooterboy_attack1",
    "boss_lpunch",
    "boss_rpunch",
    "boss_kick",
    "boss_grab_player",
    "kasaobake_attack",
    "onna_fight",
    "tengu_lattack",
    "tengu_rattack",
    "tengu_special",
    "kappa_fight",
    "kappa_kick",
];

/// Ссылка на звук: имя + количество вариантов (рендерер/аудио выбирает сам)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, u32)")]
pub struct SoundRef {
    pub name: String,
    pub variants: u32,
}

impl SoundRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self::varied(name, 1)
    }

    pub fn varied(name: impl Into<String>, variants: u32) -> Self {
        Self {
            name: name.into(),
            variants,
        }
    }
}

impl From<(String, u32)> for SoundRef {
    fn from((name, variants): (String, u32)) -> Self {
        Self { name, variants }
    }
}

/// Один приём. Shared через `Arc`, никогда не мутируется после загрузки.
#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub name: String,
    /// Имя анимации для рендерера
    pub sprite: String,
    pub strength: i32,
    /// Длительность атаки в тиках
    pub anim_time: i32,
    pub frame_time: i32,
    pub frames: usize,
    /// Кадры анимации, на которых атака "бьёт"
    pub hit_frames: Vec<usize>,
    /// Задержка после атаки до следующей (в тиках после конца)
    pub recovery_time: i32,
    pub reach: f32,
    pub throw: bool,
    pub grab: bool,
    pub rear_attack: bool,
    pub flying_kick: bool,
    pub stamina_cost: i32,
    pub stamina_damage_multiplier: f32,
    pub stun_time_multiplier: f32,
    /// button → имя следующего приёма в комбо
    pub combo_next: BTreeMap<u8, String>,
    pub initial_sound: Option<SoundRef>,
    pub hit_sound: Option<SoundRef>,
}

impl Attack {
    /// Приём с дефолтами для всех необязательных полей
    pub fn new(name: impl Into<String>, strength: i32, anim_time: i32) -> Self {
        let name = name.into();
        Self {
            sprite: name.clone(),
            name,
            strength,
            anim_time,
            frame_time: 5,
            frames: 1,
            hit_frames: Vec::new(),
            recovery_time: 0,
            reach: 80.0,
            throw: false,
            grab: false,
            rear_attack: false,
            flying_kick: false,
            stamina_cost: 10,
            stamina_damage_multiplier: 1.0,
            stun_time_multiplier: 1.0,
            combo_next: BTreeMap::new(),
            initial_sound: None,
            hit_sound: None,
        }
    }

    /// Кадр анимации для тика `frame` с начала атаки (последний кадр держится)
    pub fn frame_at(&self, frame: i32) -> usize {
        let index = (frame.max(0) / self.frame_time.max(1)) as usize;
        index.min(self.frames.saturating_sub(1))
    }

    pub fn is_hit_frame(&self, frame_index: usize) -> bool {
        self.hit_frames.contains(&frame_index)
    }

    /// Сколько stamina снимает попадание
    pub fn stamina_damage(&self) -> i32 {
        (self.strength as f32 * BASE_STAMINA_DAMAGE_MULTIPLIER * self.stamina_damage_multiplier).round()
            as i32
    }

    /// Hit-stun в тиках
    pub fn stun_ticks(&self) -> i32 {
        (self.strength as f32 * HIT_STUN_PER_STRENGTH * self.stun_time_multiplier).ceil() as i32
    }

    pub fn combo_successor(&self, button: u8) -> Option<&str> {
        self.combo_next.get(&button).map(String::as_str)
    }
}

/// Raw JSON shape (ключи combo ещё строки)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttackDef {
    sprite: Option<String>,
    strength: i32,
    anim_time: i32,
    #[serde(default = "default_frame_time")]
    frame_time: i32,
    #[serde(default = "default_frames")]
    frames: usize,
    #[serde(default)]
    hit_frames: Vec<usize>,
    #[serde(default)]
    recovery_time: i32,
    #[serde(default = "default_reach")]
    reach: f32,
    #[serde(default)]
    throw: bool,
    #[serde(default)]
    grab: bool,
    #[serde(default)]
    rear_attack: bool,
    #[serde(default, rename = "flyingkick")]
    flying_kick: bool,
    #[serde(default = "default_stamina_cost")]
    stamina_cost: i32,
    #[serde(default = "default_multiplier")]
    stamina_damage_multiplier: f32,
    #[serde(default = "default_multiplier")]
    stun_time_multiplier: f32,
    #[serde(default)]
    combo_next: HashMap<String, String>,
    #[serde(default)]
    initial_sound: Option<SoundRef>,
    #[serde(default)]
    hit_sound: Option<SoundRef>,
}

fn default_frame_time() -> i32 {
    5
}

fn default_frames() -> usize {
    1
}

fn default_reach() -> f32 {
    80.0
}

fn default_stamina_cost() -> i32 {
    10
}

fn default_multiplier() -> f32 {
    1.0
}

impl AttackDef {
    fn into_attack(self, name: &str) -> Result<Attack, ConfigError> {
        if self.frame_time <= 0 {
            return Err(ConfigError::ZeroFrameTime {
                attack: name.to_string(),
            });
        }

        let frames = self.frames.max(1);
        if let Some(&frame) = self.hit_frames.iter().find(|&&f| f >= frames) {
            return Err(ConfigError::HitFrameOutOfRange {
                attack: name.to_string(),
                frame,
                frames,
            });
        }

        let mut combo_next = BTreeMap::new();
        for (key, next) in self.combo_next {
            let button = key.trim().parse::<u8>().map_err(|_| ConfigError::InvalidComboKey {
                attack: name.to_string(),
                key: key.clone(),
            })?;
            combo_next.insert(button, next);
        }

        let mut attack = Attack::new(name, self.strength, self.anim_time);
        if let Some(sprite) = self.sprite {
            attack.sprite = sprite;
        }
        attack.frame_time = self.frame_time;
        attack.frames = frames;
        attack.hit_frames = self.hit_frames;
        attack.recovery_time = self.recovery_time;
        attack.reach = self.reach;
        attack.throw = self.throw;
        attack.grab = self.grab;
        attack.rear_attack = self.rear_attack;
        attack.flying_kick = self.flying_kick;
        attack.stamina_cost = self.stamina_cost;
        attack.stamina_damage_multiplier = self.stamina_damage_multiplier;
        attack.stun_time_multiplier = self.stun_time_multiplier;
        attack.combo_next = combo_next;
        attack.initial_sound = self.initial_sound;
        attack.hit_sound = self.hit_sound;
        Ok(attack)
    }
}

/// Каталог приёмов по имени
#[derive(Debug, Clone, Default)]
pub struct AttackTable {
    attacks: HashMap<String, Arc<Attack>>,
}

impl AttackTable {
    /// Парсит и валидирует таблицу. Всё или ничего: первая ошибка прерывает загрузку.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        // BTreeMap: ошибки всегда репортятся в одном и том же порядке
        let defs: BTreeMap<String, AttackDef> = serde_json::from_str(json)?;

        let mut attacks = HashMap::with_capacity(defs.len());
        for (name, def) in defs {
            let attack = def.into_attack(&name)?;
            attacks.insert(name, Arc::new(attack));
        }

        let table = Self { attacks };
        table.check_combo_links()?;
        Ok(table)
    }

    /// Читает таблицу с диска и проверяет, что все обязательные приёмы есть
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        table.ensure_contains(REQUIRED_ATTACKS)?;
        Ok(table)
    }

    /// Таблица, вшитая в бинарник
    pub fn builtin() -> Result<Self, ConfigError> {
        let table = Self::from_json_str(BUILTIN_ATTACKS)?;
        table.ensure_contains(REQUIRED_ATTACKS)?;
        Ok(table)
    }

    pub fn from_attacks(attacks: impl IntoIterator<Item = Attack>) -> Self {
        Self {
            attacks: attacks
                .into_iter()
                .map(|attack| (attack.name.clone(), Arc::new(attack)))
                .collect(),
        }
    }

    pub fn ensure_contains(&self, names: &[&str]) -> Result<(), ConfigError> {
        match names.iter().find(|name| !self.attacks.contains_key(**name)) {
            Some(missing) => Err(ConfigError::MissingAttack(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Attack>> {
        self.attacks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attacks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    fn check_combo_links(&self) -> Result<(), ConfigError> {
        let mut names: Vec<&String> = self.attacks.keys().collect();
        names.sort();
        for name in names {
            let attack = &self.attacks[name];
            if let Some(next) = attack.combo_next.values().find(|next| !self.attacks.contains_key(*next)) {
                return Err(ConfigError::UnknownComboSuccessor {
                    attack: name.clone(),
                    next: next.clone(),
                });
            }
        }
        Ok(())
    }
}
