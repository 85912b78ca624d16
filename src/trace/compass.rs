//! Eight-direction compass codes, clockwise with the row axis growing
//! downward: E=0, SE=1, S=2, SW=3, W=4, NW=5, N=6, NE=7.

use crate::shapes::Pixel;

/// Step offsets `(drow, dcol)` per compass code.
pub(super) const STEPS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Compass code of the unit step from `from` to `to`, or `None` when the two
/// pixels are not 8-adjacent.
pub(super) fn relative_location(from: Pixel, to: Pixel) -> Option<u8> {
    let d = (to.row - from.row, to.col - from.col);
    STEPS.iter().position(|&s| s == d).map(|i| i as u8)
}

/// Clockwise code difference in `0..8`.
pub(super) fn deviation(current: u8, previous: u8) -> u8 {
    (current + 8 - previous) % 8
}

/// Within one compass step of the previous direction.
pub(super) fn is_small(dev: u8) -> bool {
    matches!(dev, 0 | 1 | 7)
}

/// The path reversed onto itself.
pub(super) fn is_fold_back(dev: u8) -> bool {
    dev == 4
}

/// Where the clockwise candidate scan starts, given the direction of the
/// previous step: three codes counter-clockwise of it.
pub(super) fn scan_start(prev: u8) -> u8 {
    (prev + 5) % 8
}
