//! Axis-aligned rectangles and the collision tests the game is built on.

/// Screen-space box. `y` grows downward, like every backend we draw to.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// A retired or never-spawned slot has no area and takes part in no test.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Fully scrolled past the left screen edge.
    pub fn is_off_screen_left(&self) -> bool {
        self.right() < 0.0
    }

    /// Standard box intersection; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Horizontal-only test: does either vertical edge of `self` fall inside
    /// the column spanned by `corridor`? Heights are ignored entirely.
    ///
    /// ```text
    ///        corridor.x ................ corridor.right
    ///   self.x ........ self.right                       left edge outside, right inside
    ///                 self.x ........ self.right         both inside
    ///                           self.x ........ self.right
    /// ```
    pub fn corridor_overlaps(&self, corridor: &Rect) -> bool {
        let inside = |x: f32| corridor.x <= x && x <= corridor.right();
        inside(self.x) || inside(self.right())
    }

    /// Zero the rectangle in place so it stops colliding.
    pub fn retire(&mut self) {
        *self = Rect::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_requires_both_axes() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(5.0, 20.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 5.0, 10.0, 10.0)));
        // shared edge only
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn zero_sized_rect_never_overlaps() {
        let player = Rect::new(300.0, 600.0, 60.0, 60.0);
        let inside = Rect::new(320.0, 620.0, 0.0, 0.0);
        assert!(!player.overlaps(&inside));
        assert!(!inside.overlaps(&player));
        assert!(!player.overlaps(&Rect::ZERO));
    }

    #[test]
    fn corridor_ignores_height() {
        let hole = Rect::new(100.0, 700.0, 200.0, 200.0);
        let high_up = Rect::new(150.0, 0.0, 60.0, 60.0);
        assert!(high_up.corridor_overlaps(&hole));
    }

    #[test]
    fn corridor_matches_either_edge() {
        let hole = Rect::new(100.0, 0.0, 200.0, 10.0);
        // right edge inside
        assert!(Rect::new(60.0, 0.0, 60.0, 1.0).corridor_overlaps(&hole));
        // left edge inside
        assert!(Rect::new(280.0, 0.0, 60.0, 1.0).corridor_overlaps(&hole));
        // edges are inclusive
        assert!(Rect::new(40.0, 0.0, 60.0, 1.0).corridor_overlaps(&hole));
        assert!(!Rect::new(0.0, 0.0, 60.0, 1.0).corridor_overlaps(&hole));
        assert!(!Rect::new(301.0, 0.0, 60.0, 1.0).corridor_overlaps(&hole));
    }

    #[test]
    fn retire_zeroes_everything() {
        let mut r = Rect::new(1.0, 2.0, 3.0, 4.0);
        r.retire();
        assert_eq!(r, Rect::ZERO);
        assert!(r.is_empty());
        assert!(!r.is_off_screen_left());
    }
}
