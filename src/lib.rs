/*

Penrose tilings from de Bruijn's pentagrid.

Five families of evenly spaced parallel lines, one per fifth root of
unity, each shifted by its own offset. Every crossing of two lines
from different families is dual to one rhombus of the tiling.

Reference: "Algebraic theory of Penrose's non-periodic tilings of the
plane", N.G. de Bruijn.

 */

#[macro_use]
extern crate error_chain;

pub mod errors;
pub mod geom;
pub mod pentagrid;
pub mod tiling;

pub use geom::{Point2d, Rect2d, Vec2d};
pub use pentagrid::{
    grid_to_point, rhombus_vertices, Direction, GridCoords, GridLine, Pentagrid, Rhombus,
    RhombusShape, DIRECTIONS,
};
pub use tiling::{tiling, Tiling};
