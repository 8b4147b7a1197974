//! Scalar helpers для движения и интерполяции.
//!
//! Всё здесь pure: без RNG, без состояния. Используется fighter'ами, AI и
//! физикой оружия.

/// Ограничивает `value` диапазоном `[min, max]`.
///
/// В отличие от `f32::clamp` не паникует при `min > max`: возвращает `min`
/// (сначала применяется верхняя граница, потом нижняя).
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Линейно переносит `value` из `[old_min, old_max]` в `[new_min, new_max]`.
///
/// Вырожденный исходный диапазон (`old_min == old_max`) даёт `new_min`.
pub fn remap(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    let old_range = old_max - old_min;
    if old_range == 0.0 {
        return new_min;
    }
    (value - old_min) * (new_max - new_min) / old_range + new_min
}

/// `remap` + clamp результата в целевой диапазон (порядок границ не важен).
pub fn remap_clamp(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    let lo = new_min.min(new_max);
    let hi = new_min.max(new_max);
    clamp(remap(value, old_min, old_max, new_min, new_max), lo, hi)
}

/// Знак числа: -1, 0 или 1 (в отличие от `f32::signum`, ноль даёт 0).
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Двигает `current` к `target` максимум на `speed`, не проскакивая цель.
///
/// Возвращает `(new_value, direction)`, где direction ∈ {-1, 0, 1}.
/// Если шаг перекрывает цель, результат ровно `target` (важно для AI, который
/// сравнивает позицию с целью через `==`).
pub fn move_towards(current: f32, target: f32, speed: f32) -> (f32, f32) {
    if current < target {
        ((current + speed).min(target), 1.0)
    } else if current > target {
        ((current - speed).max(target), -1.0)
    } else {
        (current, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(42.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_remap() {
        assert_eq!(remap(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(remap(0.0, 0.0, 10.0, 1.0, 0.0), 1.0);
        // Вне диапазона remap не ограничивает
        assert_eq!(remap(20.0, 0.0, 10.0, 0.0, 1.0), 2.0);
        assert_eq!(remap(3.0, 4.0, 4.0, 7.0, 9.0), 7.0);
    }

    #[test]
    fn test_remap_clamp_inverted_range() {
        assert_eq!(remap_clamp(20.0, 0.0, 10.0, 0.0, 1.0), 1.0);
        assert_eq!(remap_clamp(-5.0, 0.0, 10.0, 1.0, 0.0), 1.0);
        assert_eq!(remap_clamp(15.0, 0.0, 10.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }

    #[test]
    fn test_move_towards_never_overshoots() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), (3.0, 1.0));
        assert_eq!(move_towards(9.0, 10.0, 3.0), (10.0, 1.0));
        assert_eq!(move_towards(10.0, 0.0, 4.0), (6.0, -1.0));
        assert_eq!(move_towards(1.0, 0.0, 4.0), (0.0, -1.0));
        assert_eq!(move_towards(5.0, 5.0, 2.0), (5.0, 0.0));
    }

    #[test]
    fn test_move_towards_repeated_reaches_target_exactly() {
        let target = 417.3;
        let mut x = 100.0;
        for _ in 0..1000 {
            x = move_towards(x, target, 1.2).0;
        }
        assert_eq!(x, target);
    }
}
