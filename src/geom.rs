//////////////////////////////////////////////////////////////////////
// pull in some types from nalgebra

pub type Vec2d = nalgebra::Vector2<f64>;
pub type Point2d = nalgebra::geometry::Point2<f64>;

//////////////////////////////////////////////////////////////////////
// multiply by i, i.e. rotate a quarter turn counterclockwise

pub fn rot90(v: &Vec2d) -> Vec2d {
    Vec2d::new(-v.y, v.x)
}

//////////////////////////////////////////////////////////////////////
// Rect2d type has lower-left p0 and upper-right p1

#[derive(Debug, Clone, PartialEq)]
pub struct Rect2d {

    pub p0: Point2d,
    pub p1: Point2d

}

impl Rect2d {

    // empty rectangle has p0 > p1
    pub fn empty() -> Self {

        let p0 = Point2d::new(f64::MAX, f64::MAX);
        let p1 = -p0;

        Rect2d { p0, p1 }

    }

    // new rect from points
    pub fn new(p0: Point2d, p1: Point2d) -> Self {
        Rect2d { p0, p1 }
    }

    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }

    // expand this rect to include the given point
    pub fn expand(&mut self, p: &Point2d) {
        self.p0 = self.p0.inf(p);
        self.p1 = self.p1.sup(p);
    }

    pub fn contains(&self, p: &Point2d) -> bool {
        p.x >= self.p0.x && p.x <= self.p1.x &&
            p.y >= self.p0.y && p.y <= self.p1.y
    }

    // dimensions of this rect
    pub fn dims(&self) -> Vec2d {
        self.p1 - self.p0
    }

    // center of this rect
    pub fn center(&self) -> Point2d {
        self.p0 + 0.5*(self.p1 - self.p0)
    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rot90_is_multiplication_by_i() {
        assert_abs_diff_eq!(rot90(&Vec2d::new(1.0, 0.0)), Vec2d::new(0.0, 1.0));
        assert_abs_diff_eq!(rot90(&Vec2d::new(0.0, 1.0)), Vec2d::new(-1.0, 0.0));
        assert_abs_diff_eq!(rot90(&rot90(&Vec2d::new(3.0, -2.0))), Vec2d::new(-3.0, 2.0));
    }

    #[test]
    fn empty_rect_expands_to_points() {

        let mut rect = Rect2d::empty();
        assert!(rect.is_empty());

        rect.expand(&Point2d::new(1.0, -2.0));
        assert!(!rect.is_empty());
        assert_eq!(rect.dims(), Vec2d::zeros());

        rect.expand(&Point2d::new(-3.0, 4.0));

        assert_eq!(rect.p0, Point2d::new(-3.0, -2.0));
        assert_eq!(rect.p1, Point2d::new(1.0, 4.0));
        assert_abs_diff_eq!(rect.center(), Point2d::new(-1.0, 1.0));
        assert!(rect.contains(&Point2d::new(0.0, 0.0)));
        assert!(!rect.contains(&Point2d::new(2.0, 0.0)));

    }

}
