//! World view для update'а одного бойца.
//!
//! Roster хранится одним `Vec<Fighter>`; на время update'а бойца `i` он
//! режется через `split_at_mut` на "до" и "после", так что сам боец
//! мутируется напрямую, а остальные доступны через `Peers`. Бойцы до `i`
//! уже обновлены в этом тике, после `i` ещё нет.

use crate::combat::Fighter;
use crate::config::{HEIGHT, MIN_WALK_Y, WIDTH};
use crate::encounter::context::{FighterId, SimContext};
use crate::physics::Weapon;

/// Прямоугольник, в котором можно ходить
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Boundary {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Геометрия уровня: boundary + scroll offset камеры
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub boundary: Boundary,
    pub scroll_x: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            boundary: Boundary {
                left: 0.0,
                top: MIN_WALK_Y,
                width: WIDTH - 1.0,
                height: HEIGHT - MIN_WALK_Y,
            },
            scroll_x: 0.0,
        }
    }
}

impl Field {
    pub fn screen_x(&self, world_x: f32) -> f32 {
        world_x - self.scroll_x
    }

    pub fn on_screen(&self, world_x: f32) -> bool {
        let x = self.screen_x(world_x);
        x > 0.0 && x < WIDTH
    }

    pub fn set_scroll(&mut self, scroll_x: f32) {
        self.scroll_x = scroll_x;
        self.boundary.left = scroll_x;
    }
}

/// Все бойцы, кроме текущего
pub struct Peers<'w> {
    before: &'w mut [Fighter],
    after: &'w mut [Fighter],
}

impl<'w> Peers<'w> {
    pub fn new(before: &'w mut [Fighter], after: &'w mut [Fighter]) -> Self {
        Self { before, after }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fighter> + '_ {
        self.before.iter().chain(self.after.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Fighter> + '_ {
        self.before.iter_mut().chain(self.after.iter_mut())
    }

    pub fn get(&self, id: FighterId) -> Option<&Fighter> {
        self.iter().find(|f| f.id == id)
    }

    pub fn get_mut(&mut self, id: FighterId) -> Option<&mut Fighter> {
        self.iter_mut().find(|f| f.id == id)
    }

    pub fn player(&self) -> Option<&Fighter> {
        self.iter().find(|f| f.is_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Fighter> {
        self.iter_mut().find(|f| f.is_player())
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Fighter> + '_ {
        self.iter().filter(|f| f.is_enemy())
    }
}

/// Всё, что боец видит и может трогать во время своего update'а
pub struct Scene<'w> {
    pub peers: Peers<'w>,
    pub weapons: &'w mut [Weapon],
    pub field: &'w Field,
}

impl Scene<'_> {
    pub fn weapon(&self, id: crate::encounter::WeaponId) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }
}

/// Режет roster вокруг бойца `index`
pub fn split_roster(fighters: &mut [Fighter], index: usize) -> Option<(&mut Fighter, Peers<'_>)> {
    let (before, rest) = fighters.split_at_mut(index.min(fighters.len()));
    let (me, after) = rest.split_first_mut()?;
    Some((me, Peers::new(before, after)))
}

/// Один update бойца `index` (то же самое делает оркестратор в своём проходе)
pub fn tick_fighter(
    fighters: &mut [Fighter],
    index: usize,
    weapons: &mut [Weapon],
    field: &Field,
    ctx: &mut SimContext,
) {
    if let Some((me, peers)) = split_roster(fighters, index) {
        let mut scene = Scene {
            peers,
            weapons,
            field,
        };
        me.tick(&mut scene, ctx);
    }
}
