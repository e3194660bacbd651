use core::convert::From;

use glam::IVec2;

/// A coordinate in the offset coordinate system.
///
/// The origin `(0, 0)` is the north-west corner of the grid, `x` grows towards the east and
/// `y` grows towards the south. Valid coordinates satisfy `x ∈ [0, width)` and
/// `y ∈ [0, height)`; the grid does not wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetCoordinate(pub IVec2);

impl OffsetCoordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub const fn x(&self) -> i32 {
        self.0.x
    }

    pub const fn y(&self) -> i32 {
        self.0.y
    }

    pub const fn into_inner(self) -> IVec2 {
        self.0
    }

    pub const fn to_array(self) -> [i32; 2] {
        [self.0.x, self.0.y]
    }
}

impl From<[u32; 2]> for OffsetCoordinate {
    fn from(value: [u32; 2]) -> Self {
        OffsetCoordinate::new(value[0] as i32, value[1] as i32)
    }
}

impl From<IVec2> for OffsetCoordinate {
    fn from(value: IVec2) -> Self {
        Self(value)
    }
}
