//! SimContext: всё, что update получает "сверху" на один тик.
//!
//! RNG, таблица атак, буфер cue'ов (звук/музыка/погода, fire-and-forget) и
//! очередь спавнов. Спавны применяются оркестратором после прохода по
//! сущностям, поэтому порядок update'ов внутри тика не ломается.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::combat::{AttackTable, Fighter, SoundRef};
use crate::encounter::pickup::Pickup;
use crate::physics::{Debris, Weapon};

pub type SimRng = ChaCha8Rng;

/// Stable handle бойца внутри encounter'а (игрок всегда 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FighterId(pub u32);

impl FighterId {
    pub const PLAYER: FighterId = FighterId(0);
}

/// Stable handle оружия (non-owning ссылка holder ↔ weapon)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeaponId(pub u32);

/// Уведомления для внешних коллабораторов (аудио, рендер, UI)
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    Sound(SoundRef),
    /// Звук двигателя самоката (панорамируется отдельно)
    Engine {
        rider: FighterId,
        sound: SoundRef,
        looping: bool,
    },
    EnginePan {
        rider: FighterId,
        left: f32,
        right: f32,
    },
    EngineStop {
        rider: FighterId,
    },
    Music(String),
    /// None = погода выключена
    Weather(Option<String>),
    BossIntro {
        boss: FighterId,
        title: String,
        image: Option<String>,
    },
    StageStarted {
        index: usize,
    },
    Victory,
    GameOver,
}

/// Запрос на добавление сущности в roster после текущего прохода
#[derive(Debug)]
pub enum Spawn {
    Enemy(Box<Fighter>),
    Weapon(Weapon),
    Debris(Debris),
    Pickup(Pickup),
}

pub struct SimContext {
    pub rng: SimRng,
    pub attacks: Arc<AttackTable>,
    /// Номер текущего тика (для логов)
    pub frame: u64,
    pub debug_logging: bool,
    cues: Vec<Cue>,
    spawns: Vec<Spawn>,
    next_fighter: u32,
    next_weapon: u32,
}

impl SimContext {
    pub fn new(rng: SimRng, attacks: Arc<AttackTable>) -> Self {
        Self {
            rng,
            attacks,
            frame: 0,
            debug_logging: false,
            cues: Vec::new(),
            spawns: Vec::new(),
            // 0 зарезервирован под игрока
            next_fighter: FighterId::PLAYER.0 + 1,
            next_weapon: 0,
        }
    }

    pub fn seeded(seed: u64, attacks: Arc<AttackTable>) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), attacks)
    }

    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    pub fn next_fighter_id(&mut self) -> FighterId {
        let id = FighterId(self.next_fighter);
        self.next_fighter += 1;
        id
    }

    pub fn next_weapon_id(&mut self) -> WeaponId {
        let id = WeaponId(self.next_weapon);
        self.next_weapon += 1;
        id
    }

    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn play(&mut self, sound: &SoundRef) {
        self.cues.push(Cue::Sound(sound.clone()));
    }

    pub fn spawn(&mut self, spawn: Spawn) {
        self.spawns.push(spawn);
    }

    /// Враги, которые уже запрошены, но ещё не в roster'е
    pub fn pending_enemies(&self) -> usize {
        self.spawns
            .iter()
            .filter(|spawn| matches!(spawn, Spawn::Enemy(_)))
            .count()
    }

    pub fn take_spawns(&mut self) -> Vec<Spawn> {
        std::mem::take(&mut self.spawns)
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Debug-лог с номером тика; сообщение строится только если логирование включено
    pub fn trace(&self, id: FighterId, message: impl FnOnce() -> String) {
        if self.debug_logging {
            crate::log(&format!("[tick {}] fighter#{} {}", self.frame, id.0, message()));
        }
    }
}

impl std::fmt::Debug for SimContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimContext")
            .field("frame", &self.frame)
            .field("attacks", &self.attacks.len())
            .field("pending_cues", &self.cues.len())
            .field("pending_spawns", &self.spawns.len())
            .finish()
    }
}
