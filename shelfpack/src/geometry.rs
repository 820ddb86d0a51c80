/// An axis-aligned rectangle in canvas pixels, with its origin in the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub pos: (u32, u32),
    pub size: (u32, u32),
}

impl Rect {
    pub fn max(&self) -> (u32, u32) {
        (self.pos.0 + self.size.0, self.pos.1 + self.size.1)
    }

    /// Whether the two rectangles share at least one pixel. Rectangles that
    /// only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (self_max, other_max) = (self.max(), other.max());

        self.pos.0 < other_max.0
            && other.pos.0 < self_max.0
            && self.pos.1 < other_max.1
            && other.pos.1 < self_max.1
    }
}
