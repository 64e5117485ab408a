use crate::events::{Direction, Point, Window};

/// Мёртвая зона вдоль оси движения: не выбирать текущее окно повторно
pub const DEAD_ZONE: f64 = 10.0;

/// Вес отклонения поперёк оси движения
pub const OFF_AXIS_WEIGHT: f64 = 2.0;

/// Кандидат лежит с нужной стороны и дальше мёртвой зоны
fn passes_dead_zone(direction: Direction, dx: f64, dy: f64) -> bool {
    match direction {
        Direction::Left => dx < -DEAD_ZONE,
        Direction::Right => dx > DEAD_ZONE,
        Direction::Up => dy < -DEAD_ZONE,
        Direction::Down => dy > DEAD_ZONE,
    }
}

/// Оценка кандидата: вдоль оси 1:1, поперёк 2:1. Меньше значит лучше
pub fn score(direction: Direction, dx: f64, dy: f64) -> f64 {
    if direction.is_horizontal() {
        dx.abs() + OFF_AXIS_WEIGHT * dy.abs()
    } else {
        dy.abs() + OFF_AXIS_WEIGHT * dx.abs()
    }
}

/// Выбрать центр ближайшего окна в направлении `direction` от точки `from`.
///
/// При равной оценке остаётся первый встреченный кандидат.
pub fn select(from: Point, direction: Direction, candidates: &[Window]) -> Option<Point> {
    let mut best: Option<(f64, Point)> = None;

    for window in candidates {
        let dx = window.center.x - from.x;
        let dy = window.center.y - from.y;

        if !passes_dead_zone(direction, dx, dy) {
            continue;
        }

        let candidate_score = score(direction, dx, dy);
        match best {
            Some((best_score, _)) if candidate_score >= best_score => {}
            _ => best = Some((candidate_score, window.center)),
        }
    }

    best.map(|(_, center)| center)
}
