//! Flat-map geometry. The map wraps east-west only.

use empire_types::Direction;

use crate::uid::{MAP_HEIGHT, MAP_SIZE, MAP_WIDTH};

const WIDTH: i32 = MAP_WIDTH as i32;
const HEIGHT: i32 = MAP_HEIGHT as i32;

/// Shifts `(x, y)` by `(dx, dy)`, wrapping x. `None` when the start is off
/// the map or the result falls off the top or bottom.
pub fn coord_shift(x: i32, y: i32, dx: i32, dy: i32) -> Option<(i32, i32)> {
    if !(0..WIDTH).contains(&x) || !(0..HEIGHT).contains(&y) {
        return None;
    }
    let nx = (x + dx).rem_euclid(WIDTH);
    let ny = y + dy;
    (0..HEIGHT).contains(&ny).then_some((nx, ny))
}

/// Straight-line distance in whole tiles. Unknown locations are infinitely far.
pub fn compute_map_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    if x1 == x2 && y1 == y2 {
        return 0;
    }
    if x1 < 0 || x2 < 0 || y1 < 0 || y2 < 0 {
        return MAP_SIZE as i32;
    }
    let mut dx = x1 - x2;
    let dy = y1 - y2;
    if dx < -WIDTH / 2 {
        dx += WIDTH;
    }
    if dx > WIDTH / 2 {
        dx -= WIDTH;
    }
    f64::from(dx * dx + dy * dy).sqrt() as i32
}

/// Rough compass direction from one point to another. A few tiles of
/// sideways drift per five straight ones still counts as straight.
pub fn direction_between(x1: i32, y1: i32, x2: i32, y2: i32) -> Option<Direction> {
    let mut dx = x2 - x1;
    let dy = y2 - y1;
    if dx < -WIDTH / 2 {
        dx += WIDTH;
    }
    if dx > WIDTH / 2 {
        dx -= WIDTH;
    }
    let dir = if dx == 0 && dy == 0 {
        return None;
    } else if (dy / 5).abs() >= dx.abs() {
        if dy > 0 { Direction::North } else { Direction::South }
    } else if (dx / 5).abs() >= dy.abs() {
        if dx > 0 { Direction::East } else { Direction::West }
    } else {
        match (dx > 0, dy > 0) {
            (true, true) => Direction::Northeast,
            (true, false) => Direction::Southeast,
            (false, true) => Direction::Northwest,
            (false, false) => Direction::Southwest,
        }
    };
    Some(dir)
}

/// Map room vnum at `(x, y)`.
pub fn map_vnum(x: i32, y: i32) -> i32 {
    y * WIDTH + x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_wraps_x_only() {
        assert_eq!(coord_shift(0, 5, -1, 0), Some((WIDTH - 1, 5)));
        assert_eq!(coord_shift(WIDTH - 1, 5, 1, 1), Some((0, 6)));
        assert_eq!(coord_shift(3, 0, 0, -1), None);
        assert_eq!(coord_shift(3, HEIGHT - 1, 0, 1), None);
        assert_eq!(coord_shift(-1, 0, 0, 0), None);
    }

    #[test]
    fn compass_directions() {
        assert_eq!(direction_between(5, 5, 5, 5), None);
        assert_eq!(direction_between(5, 5, 6, 15), Some(Direction::North));
        assert_eq!(direction_between(5, 5, 2, 5), Some(Direction::West));
        assert_eq!(direction_between(5, 5, 8, 2), Some(Direction::Southeast));
        assert_eq!(direction_between(1, 5, WIDTH - 1, 5), Some(Direction::West));
    }

    #[test]
    fn distance() {
        assert_eq!(compute_map_distance(1, 1, 1, 1), 0);
        assert_eq!(compute_map_distance(0, 0, 3, 4), 5);
        assert_eq!(compute_map_distance(0, 0, WIDTH - 2, 0), 2);
        assert_eq!(compute_map_distance(-1, 0, 3, 4), MAP_SIZE as i32);
    }
}
