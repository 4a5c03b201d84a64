//////////////////////////////////////////////////////////////////////
// enumerate every rhombus dual to a crossing of two visible
// pentagrid lines, i.e. lines with level in [-size, size]

use std::iter::FusedIterator;

use tracing::debug;

use crate::errors::*;
use crate::geom::Rect2d;
use crate::pentagrid::{Pentagrid, Rhombus, DIRECTION_PAIRS, NUM_DIRECTIONS};

// 10 * (2 * size + 1)^2, or None on overflow
fn tile_count(size: usize) -> Option<usize> {
    let side = size.checked_mul(2)?.checked_add(1)?;
    side.checked_mul(side)?.checked_mul(DIRECTION_PAIRS.len())
}

// lazy iterator over tiles, in (r, s, kr, ks) order with ks
// varying fastest. clone it (or call tiling() again) to restart.
#[derive(Debug, Clone)]
pub struct Tiling {

    grid:      Pentagrid,
    size:      i64,

    pair:      usize, // index into DIRECTION_PAIRS
    kr:        i64,
    ks:        i64,
    remaining: usize

}

impl Tiling {

    pub fn new(grid: Pentagrid, size: usize) -> Result<Self> {

        // a count that fits in usize also keeps size + 1 well inside i64
        let total = match tile_count(size) {
            Some(total) => total,
            None => bail!(ErrorKind::SizeOutOfRange(size))
        };

        debug!(size, total, offset_sum = grid.offset_sum(), "new tiling");

        let size = size as i64;

        Ok(Tiling {
            grid,
            size,
            pair: 0,
            kr: -size,
            ks: -size,
            remaining: total
        })

    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    // bounding rect of all tile vertices still to be produced
    pub fn bounds(&self) -> Rect2d {

        let mut rect = Rect2d::empty();

        for rhombus in self.clone() {
            for p in rhombus.points.iter() {
                rect.expand(p);
            }
        }

        rect

    }

}

impl Iterator for Tiling {

    type Item = Rhombus;

    fn next(&mut self) -> Option<Rhombus> {

        if self.remaining == 0 {
            return None;
        }

        let (r, s) = DIRECTION_PAIRS[self.pair];
        let rhombus = self.grid.rhombus_unchecked(r, s, self.kr, self.ks);

        self.remaining -= 1;

        self.ks += 1;

        if self.ks > self.size {
            self.ks = -self.size;
            self.kr += 1;
            if self.kr > self.size {
                self.kr = -self.size;
                self.pair += 1;
            }
        }

        Some(rhombus)

    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

}

impl ExactSizeIterator for Tiling {}

impl FusedIterator for Tiling {}

impl Pentagrid {

    pub fn tiling(&self, size: usize) -> Result<Tiling> {
        Tiling::new(*self, size)
    }

}

// all tiles for the given offsets with line levels in [-size, size]
pub fn tiling(offsets: &[f64; NUM_DIRECTIONS], size: usize) -> Result<Tiling> {
    Pentagrid::new(*offsets).tiling(size)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::pentagrid::RhombusShape;
    use std::collections::HashSet;

    const OFFSETS: [f64; 5] = [0.3, 0.2, -0.1, -0.4, 0.0];

    #[test]
    fn tile_counts() {
        for &(size, expected) in &[(0, 10), (1, 90), (2, 250), (10, 4410)] {
            let t = tiling(&OFFSETS, size).unwrap();
            assert_eq!(t.size(), size);
            assert_eq!(t.len(), expected);
            assert_eq!(t.count(), expected);
        }
    }

    #[test]
    fn huge_sizes_fail_instead_of_overflowing() {

        for &size in &[usize::MAX, usize::MAX / 2, usize::MAX / 20] {
            let err = tiling(&OFFSETS, size).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::SizeOutOfRange(s) if *s == size), "{}", err);
        }

        assert_eq!(tile_count(usize::MAX), None);
        assert_eq!(tile_count(3), Some(490));

    }

    #[test]
    fn every_crossing_exactly_once() {

        let size = 3;

        let keys: Vec<_> = tiling(&OFFSETS, size).unwrap()
            .map(|rh| (rh.r, rh.s, rh.kr, rh.ks))
            .collect();

        let unique: HashSet<_> = keys.iter().cloned().collect();
        assert_eq!(unique.len(), keys.len());

        for &(r, s, kr, ks) in &keys {
            assert!(r < s);
            assert!(kr.abs() <= 3 && ks.abs() <= 3);
        }

    }

    #[test]
    fn nested_iteration_order() {

        let keys: Vec<_> = tiling(&OFFSETS, 1).unwrap()
            .map(|rh| (rh.r.index(), rh.s.index(), rh.kr, rh.ks))
            .collect();

        assert_eq!(keys[0], (0, 1, -1, -1));
        assert_eq!(keys[1], (0, 1, -1, 0));
        assert_eq!(keys[3], (0, 1, 0, -1));
        assert_eq!(keys[9], (0, 2, -1, -1));
        assert_eq!(keys[89], (3, 4, 1, 1));

    }

    #[test]
    fn matches_single_rhombus() {

        let pg = Pentagrid::new(OFFSETS);

        for rh in pg.tiling(2).unwrap() {
            let single = pg.rhombus(rh.r.index(), rh.s.index(), rh.kr, rh.ks).unwrap();
            assert_eq!(rh, single);
        }

    }

    #[test]
    fn colors_are_deterministic() {

        let a: Vec<_> = tiling(&OFFSETS, 2).unwrap().map(|rh| (rh.points, rh.shape())).collect();
        let b: Vec<_> = tiling(&OFFSETS, 2).unwrap().map(|rh| (rh.points, rh.shape())).collect();

        assert_eq!(a, b);

        for rh in tiling(&OFFSETS, 1).unwrap() {
            let thick = match rh.s.index() - rh.r.index() {
                1 | 4 => RhombusShape::Thick,
                _ => RhombusShape::Thin
            };
            assert_eq!(rh.shape(), thick);
        }

        let thick = tiling(&OFFSETS, 1).unwrap().filter(|rh| rh.shape() == RhombusShape::Thick).count();
        assert_eq!(thick, 5 * 9);

    }

    #[test]
    fn restartable() {

        let fresh = tiling(&OFFSETS, 1).unwrap();

        let mut partial = fresh.clone();
        partial.nth(40);
        assert_eq!(partial.len(), 90 - 41);

        let again: Vec<_> = fresh.clone().collect();
        assert_eq!(again.len(), 90);
        assert_eq!(again, fresh.collect::<Vec<_>>());

        let mut done = tiling(&OFFSETS, 0).unwrap();
        done.by_ref().for_each(drop);
        assert!(done.next().is_none());
        assert!(done.next().is_none());

    }

    #[test]
    fn bounds_cover_all_points() {

        let t = tiling(&OFFSETS, 2).unwrap();
        let rect = t.bounds();

        assert!(!rect.is_empty());

        for rh in t {
            for p in rh.points.iter() {
                assert!(rect.contains(p));
            }
        }

    }

}
