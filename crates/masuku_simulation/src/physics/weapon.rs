//! Оружие на земле / в руках / в полёте.
//!
//! Held оружие физикой не двигается: позицию ставит держатель каждый тик.
//! Свободное падает с WEAPON_GRAVITY, отскакивает по `bounciness`, тормозит
//! трением (земля / воздух). Катящаяся бочка бьёт бойцов на пути.

use bevy::math::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::combat::{FallingState, Fighter, Hitter, SoundRef};
use crate::config::{
    BARREL_COLLISION_X, BARREL_COLLISION_Y, BARREL_HEIGHT, BARREL_THROW_OFFSET_X, BARREL_THROW_VEL,
    DEFAULT_AIR_FRICTION, DEFAULT_GROUND_FRICTION, STOP_VELOCITY, WEAPON_GRAVITY,
};
use crate::encounter::{FighterId, SimContext, SimRng, WeaponId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Barrel,
    Stick,
    Chain,
}

impl WeaponKind {
    /// Имя атаки, которой бьёт держатель этого оружия
    pub fn attack_name(&self) -> &'static str {
        match self {
            WeaponKind::Barrel => "barrel",
            WeaponKind::Stick => "stick",
            WeaponKind::Chain => "chain",
        }
    }

    /// Последний кадр анимации подбора
    pub fn end_pickup_frame(&self) -> i32 {
        match self {
            WeaponKind::Barrel => 2,
            WeaponKind::Stick | WeaponKind::Chain => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub id: WeaponId,
    pub kind: WeaponKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub height_above_ground: f32,
    pub held: bool,
    /// Non-owning ссылка на держателя (разрывается с обеих сторон при drop)
    pub holder: Option<FighterId>,
    pub bounciness: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    /// None = неломаемое
    pub durability: Option<u32>,
    /// Кто бросил (бочка его не бьёт)
    pub last_thrower: Option<FighterId>,
    /// Кадр анимации качения
    pub frame: u32,
}

impl Weapon {
    fn new(id: WeaponId, kind: WeaponKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            height_above_ground: 0.0,
            held: false,
            holder: None,
            bounciness: 0.0,
            ground_friction: DEFAULT_GROUND_FRICTION,
            air_friction: DEFAULT_AIR_FRICTION,
            durability: None,
            last_thrower: None,
            frame: 0,
        }
    }

    pub fn barrel(id: WeaponId, pos: Vec2) -> Self {
        Self {
            bounciness: 0.75,
            ground_friction: 0.96,
            ..Self::new(id, WeaponKind::Barrel, pos)
        }
    }

    pub fn stick(id: WeaponId, pos: Vec2, rng: &mut SimRng) -> Self {
        Self {
            durability: Some(rng.gen_range(12..=16)),
            ..Self::new(id, WeaponKind::Stick, pos)
        }
    }

    pub fn chain(id: WeaponId, pos: Vec2, rng: &mut SimRng) -> Self {
        Self {
            durability: Some(rng.gen_range(18..=25)),
            ..Self::new(id, WeaponKind::Chain, pos)
        }
    }

    pub fn of_kind(kind: WeaponKind, id: WeaponId, pos: Vec2, rng: &mut SimRng) -> Self {
        match kind {
            WeaponKind::Barrel => Self::barrel(id, pos),
            WeaponKind::Stick => Self::stick(id, pos, rng),
            WeaponKind::Chain => Self::chain(id, pos, rng),
        }
    }

    pub fn can_be_picked_up(&self) -> bool {
        let resting = !self.held && self.height_above_ground == 0.0;
        match self.kind {
            // Катящуюся бочку не поднять
            WeaponKind::Barrel => resting && self.vel.length() < 1.0,
            _ => resting,
        }
    }

    pub fn pick_up(&mut self, hold_height: f32, holder: FighterId) {
        debug_assert!(!self.held, "weapon {:?} picked up while already held", self.id);
        self.held = true;
        self.holder = Some(holder);
        // Высота, с которой упадёт при drop
        self.height_above_ground = hold_height;
        self.vel = Vec2::ZERO;
    }

    pub fn dropped(&mut self) {
        debug_assert!(self.held, "weapon {:?} dropped while not held", self.id);
        self.held = false;
        self.holder = None;
    }

    pub fn throw(&mut self, dir_x: f32, thrower: FighterId) {
        self.dropped();
        self.vel = Vec2::new(dir_x * BARREL_THROW_VEL.x, BARREL_THROW_VEL.y);
        self.last_thrower = Some(thrower);
        // Сдвиг под анимацию броска
        self.pos.x += dir_x * BARREL_THROW_OFFSET_X;
    }

    /// Вызывается при каждом успешном ударе этим оружием
    pub fn used(&mut self, ctx: &mut SimContext) {
        if let Some(durability) = self.durability.as_mut() {
            *durability = durability.saturating_sub(1);
            if *durability == 0 {
                ctx.play(&SoundRef::new(match self.kind {
                    WeaponKind::Chain => "sfx/weapons/chain_break",
                    _ => "sfx/weapons/stick_break",
                }));
            }
        }
    }

    pub fn is_broken(&self) -> bool {
        self.durability == Some(0)
    }

    /// Гравитация, отскок, трение (без столкновений)
    pub fn integrate(&mut self) {
        if self.held {
            return;
        }

        if self.height_above_ground > 0.0 || self.vel.y != 0.0 {
            self.vel.y += WEAPON_GRAVITY;
            if self.vel.y > self.height_above_ground {
                let (height, vel_y) = ground_contact(self.height_above_ground, self.vel.y, self.bounciness);
                self.height_above_ground = height;
                self.vel.y = vel_y;
            } else {
                self.height_above_ground -= self.vel.y;
            }
            debug_assert!(self.height_above_ground >= 0.0);
        }

        self.pos.x += self.vel.x;

        let friction = if self.height_above_ground == 0.0 {
            self.ground_friction
        } else {
            self.air_friction
        };
        self.vel.x *= friction;
        if self.vel.x.abs() < STOP_VELOCITY {
            self.vel.x = 0.0;
        }
    }

    /// Вертикальный диапазон бочки (anchor в центре)
    fn barrel_top(&self) -> f32 {
        self.height_above_ground - BARREL_HEIGHT / 2.0 + BARREL_HEIGHT
    }
}

/// Касание земли при падении на `vel_y` с высоты `height`.
///
/// Возвращает новые (height, vel_y): отскок, если есть bounciness и скорость
/// ещё заметная, иначе оружие ложится на землю.
pub fn ground_contact(height: f32, vel_y: f32, bounciness: f32) -> (f32, f32) {
    if bounciness > 0.0 && vel_y > 1.0 {
        ((height - vel_y).abs() * bounciness, -vel_y * bounciness)
    } else {
        (0.0, 0.0)
    }
}

pub fn find(weapons: &[Weapon], id: WeaponId) -> Option<&Weapon> {
    weapons.iter().find(|w| w.id == id)
}

pub fn find_mut(weapons: &mut [Weapon], id: WeaponId) -> Option<&mut Weapon> {
    weapons.iter_mut().find(|w| w.id == id)
}

/// Update оружия `index`: физика + столкновения катящейся бочки с бойцами
pub fn tick_weapon(index: usize, weapons: &mut [Weapon], fighters: &mut [Fighter], ctx: &mut SimContext) {
    let Some(weapon) = weapons.get_mut(index) else {
        return;
    };
    weapon.integrate();

    let rolling = weapon.kind == WeaponKind::Barrel
        && !weapon.held
        && !weapon.can_be_picked_up()
        && weapon.vel.x != 0.0;
    if !rolling {
        return;
    }

    weapon.frame += 1;
    let pos = weapon.pos;
    let top = weapon.barrel_top();
    let thrower = weapon.last_thrower;

    let Some(attack) = ctx.attacks.get(WeaponKind::Barrel.attack_name()) else {
        return;
    };
    let hitter = Hitter {
        id: None,
        pos,
        armed_with: None,
    };

    for fighter in fighters.iter_mut() {
        if Some(fighter.id) == thrower || fighter.body.falling_state != FallingState::Standing {
            continue;
        }
        let body = &fighter.body;
        let in_window = (body.pos.y - pos.y).abs() < BARREL_COLLISION_Y
            && (pos.x - body.pos.x).abs() < BARREL_COLLISION_X
            && body.height_above_ground < top;
        if in_window {
            fighter.hit(&hitter, &attack, weapons, ctx);
        }
    }
}
