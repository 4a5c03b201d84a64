//////////////////////////////////////////////////////////////////////
// pentagrid geometry
//
// a pentagrid is five families of unit-spaced parallel lines. line
// (d, k) is the set of points z with
//
//     Re(z / zeta_d) + offset_d = k
//
// where zeta_d is the d'th fifth root of unity. two lines from
// different families cross at exactly one point, and that crossing
// maps to one rhombus of the Penrose tiling.
//
// caveat: if three lines meet at a point, the ceilings taken in
// grid_coords are ambiguous and the resulting tile is garbage. pick
// offsets that avoid it; nothing here checks.

use crate::errors::*;
use crate::geom::{rot90, Point2d, Vec2d};

//////////////////////////////////////////////////////////////////////
// some useful constants for the five line families

pub const NUM_DIRECTIONS: usize = 5;

const COS_72: f64 = 0.30901699437494745;
const SIN_72: f64 = 0.9510565162951535;
const COS_36: f64 = 0.8090169943749475;
const SIN_36: f64 = 0.5877852522924731;

// fifth roots of unity as (x, y), i.e. unit vectors at 2*pi*k/5
pub const DIRECTIONS: [(f64, f64); NUM_DIRECTIONS] = [
    (1.0, 0.0),
    (COS_72, SIN_72),
    (-COS_36, SIN_36),
    (-COS_36, -SIN_36),
    (COS_72, -SIN_72)
];

// grid coordinates of a point: one line level per family
pub type GridCoords = [i64; NUM_DIRECTIONS];

// corner order around a rhombus, as steps added to (kr, ks)
const CORNER_STEPS: [(i64, i64); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

//////////////////////////////////////////////////////////////////////
// index of a line family, always in 0..5

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub struct Direction(usize);

// every unordered pair of distinct families, r < s
pub const DIRECTION_PAIRS: [(Direction, Direction); 10] = [
    (Direction(0), Direction(1)),
    (Direction(0), Direction(2)),
    (Direction(0), Direction(3)),
    (Direction(0), Direction(4)),
    (Direction(1), Direction(2)),
    (Direction(1), Direction(3)),
    (Direction(1), Direction(4)),
    (Direction(2), Direction(3)),
    (Direction(2), Direction(4)),
    (Direction(3), Direction(4))
];

impl Direction {

    pub const ALL: [Direction; NUM_DIRECTIONS] = [
        Direction(0), Direction(1), Direction(2), Direction(3), Direction(4)
    ];

    pub fn new(index: usize) -> Option<Self> {
        if index < NUM_DIRECTIONS {
            Some(Direction(index))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0
    }

    pub fn unit(self) -> Vec2d {
        let (x, y) = DIRECTIONS[self.0];
        Vec2d::new(x, y)
    }

    // direction whose root of unity is zeta_self / zeta_other
    fn minus(self, other: Direction) -> Direction {
        Direction((self.0 + NUM_DIRECTIONS - other.0) % NUM_DIRECTIONS)
    }

}

// validate a pair of raw indices as two distinct families
fn direction_pair(r: usize, s: usize) -> Result<(Direction, Direction)> {
    match (Direction::new(r), Direction::new(s)) {
        (Some(dr), Some(ds)) if dr != ds => Ok((dr, ds)),
        _ => bail!(ErrorKind::InvalidDirectionPair(r, s))
    }
}

//////////////////////////////////////////////////////////////////////
// a single line of the pentagrid

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct GridLine {
    pub dir: Direction,
    pub level: i64
}

impl GridLine {

    pub fn new(dir: Direction, level: i64) -> Self {
        GridLine { dir, level }
    }

}

//////////////////////////////////////////////////////////////////////
// tile shape, which is also the color class for rendering.
//
// the tile dual to a crossing of families r and s has unit edges
// along zeta_r and zeta_s, so families one step apart (72 degrees)
// give the thick rhombus and families two steps apart (144 degrees,
// i.e. 36) give the thin one.

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum RhombusShape {
    Thick,
    Thin
}

impl RhombusShape {

    pub fn from_pair(r: Direction, s: Direction) -> Self {
        let d = r.0 as i64 - s.0 as i64;
        if (d * d) % 5 == 1 {
            RhombusShape::Thick
        } else {
            RhombusShape::Thin
        }
    }

}

//////////////////////////////////////////////////////////////////////
// one tile of the tiling, dual to the crossing of lines (r, kr)
// and (s, ks)

#[derive(Debug, PartialEq, Clone)]
pub struct Rhombus {

    pub r:            Direction,
    pub s:            Direction,
    pub kr:           i64,
    pub ks:           i64,
    pub intersection: Point2d,           // crossing point in the grid plane
    pub corners:      [GridCoords; 4],   // grid coordinates of each vertex
    pub points:       [Point2d; 4]       // vertices in the tiling plane

}

impl Rhombus {

    pub fn shape(&self) -> RhombusShape {
        RhombusShape::from_pair(self.r, self.s)
    }

    pub fn center(&self) -> Point2d {
        let sum = self.points.iter().fold(Vec2d::zeros(), |acc, p| acc + p.coords);
        Point2d::from(0.25 * sum)
    }

    // unsigned area via the shoelace formula
    pub fn area(&self) -> f64 {

        let n = self.points.len();

        let twice = (0..n).map(|i| {
            let p = &self.points[i];
            let q = &self.points[(i + 1) % n];
            p.x * q.y - q.x * p.y
        }).sum::<f64>();

        0.5 * twice.abs()

    }

}

//////////////////////////////////////////////////////////////////////
// map grid coordinates to a tiling vertex: sum of k_t * zeta_t

pub fn grid_to_point(k: &GridCoords) -> Point2d {

    let v = Direction::ALL.iter().fold(Vec2d::zeros(), |acc, &d| {
        acc + (k[d.0] as f64) * d.unit()
    });

    Point2d::from(v)

}

//////////////////////////////////////////////////////////////////////
// the pentagrid itself: just five offsets, one per family. any
// values are allowed, there is no constraint on their sum.

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Pentagrid {
    offsets: [f64; NUM_DIRECTIONS]
}

impl Pentagrid {

    pub fn new(offsets: [f64; NUM_DIRECTIONS]) -> Self {
        Pentagrid { offsets }
    }

    pub fn offsets(&self) -> &[f64; NUM_DIRECTIONS] {
        &self.offsets
    }

    pub fn offset_sum(&self) -> f64 {
        self.offsets.iter().sum()
    }

    // Re(p / zeta_d) + offset_d, i.e. fractional line level at p
    pub fn project(&self, p: &Point2d, d: Direction) -> f64 {
        p.coords.dot(&d.unit()) + self.offsets[d.0]
    }

    // crossing point of two lines from different families
    pub fn intersection(&self, l1: &GridLine, l2: &GridLine) -> Result<Point2d> {

        if l1.dir == l2.dir {
            bail!(ErrorKind::InvalidDirectionPair(l1.dir.0, l2.dir.0));
        }

        Ok(self.intersect_unchecked(l1.dir, l2.dir, l1.level, l2.level))

    }

    // closed form solution of the 2x2 system
    //
    //   z0 = i (zeta_r (ks - o_s) - zeta_s (kr - o_r)) / Im(zeta_{s-r})
    //
    // r != s is required so the denominator is nonzero
    pub(crate) fn intersect_unchecked(&self,
                                      r: Direction, s: Direction,
                                      kr: i64, ks: i64) -> Point2d {

        debug_assert!(r != s);

        let a = kr as f64 - self.offsets[r.0];
        let b = ks as f64 - self.offsets[s.0];

        let numer = b * r.unit() - a * s.unit();
        let denom = s.minus(r).unit().y;

        Point2d::from(rot90(&numer) / denom)

    }

    // for each family, the level of the first line at or past p
    pub fn grid_coords(&self, p: &Point2d) -> GridCoords {

        let mut k = [0; NUM_DIRECTIONS];

        for &d in &Direction::ALL {
            k[d.0] = self.project(p, d).ceil() as i64;
        }

        k

    }

    // rhombus dual to the crossing of lines (r, kr) and (s, ks)
    pub fn rhombus(&self, r: usize, s: usize, kr: i64, ks: i64) -> Result<Rhombus> {
        let (r, s) = direction_pair(r, s)?;
        if kr.checked_add(1).is_none() || ks.checked_add(1).is_none() {
            bail!(ErrorKind::LevelOutOfRange(kr, ks));
        }
        Ok(self.rhombus_unchecked(r, s, kr, ks))
    }

    // kr + 1 and ks + 1 must not overflow
    pub(crate) fn rhombus_unchecked(&self,
                                    r: Direction, s: Direction,
                                    kr: i64, ks: i64) -> Rhombus {

        let intersection = self.intersect_unchecked(r, s, kr, ks);

        // the three unpinned coordinates are shared by all corners
        let base = self.grid_coords(&intersection);

        let mut corners = [base; 4];

        for (k, &(dr, ds)) in corners.iter_mut().zip(CORNER_STEPS.iter()) {
            k[r.0] = kr + dr;
            k[s.0] = ks + ds;
        }

        let points = [
            grid_to_point(&corners[0]),
            grid_to_point(&corners[1]),
            grid_to_point(&corners[2]),
            grid_to_point(&corners[3])
        ];

        Rhombus { r, s, kr, ks, intersection, corners, points }

    }

}

//////////////////////////////////////////////////////////////////////
// convenience wrapper for renderers that only want the four vertices

pub fn rhombus_vertices(offsets: &[f64; NUM_DIRECTIONS],
                        r: usize, s: usize,
                        kr: i64, ks: i64) -> Result<[Point2d; 4]> {

    let rhombus = Pentagrid::new(*offsets).rhombus(r, s, kr, ks)?;

    Ok(rhombus.points)

}
