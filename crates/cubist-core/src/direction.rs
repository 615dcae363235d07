use glam::IVec3;

/// One of the 6 axis-aligned faces of a block (or chunk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

/// All 6 faces, in exposure-bit order.
pub const ALL_FACES: [Face; 6] = [
    Face::PosX,
    Face::NegX,
    Face::PosY,
    Face::NegY,
    Face::PosZ,
    Face::NegZ,
];

/// Bitmask with every face bit set.
pub const ALL_FACE_BITS: u8 = 0x3F;

impl Face {
    /// Unit offset toward the neighbour across this face. Y-up.
    pub fn offset(self) -> IVec3 {
        match self {
            Face::PosX => IVec3::X,
            Face::NegX => IVec3::NEG_X,
            Face::PosY => IVec3::Y,
            Face::NegY => IVec3::NEG_Y,
            Face::PosZ => IVec3::Z,
            Face::NegZ => IVec3::NEG_Z,
        }
    }

    /// Bit in a block's exposure mask: +X = 0x01, -X = 0x02, +Y = 0x04,
    /// -Y = 0x08, +Z = 0x10, -Z = 0x20.
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Per-vertex face attribute consumed by the shading stage.
    pub fn shading_id(self) -> u8 {
        match self {
            Face::NegZ => 0,
            Face::PosZ => 1,
            Face::NegX => 2,
            Face::PosX => 3,
            Face::PosY => 4,
            Face::NegY => 5,
        }
    }

    /// Axis index (0 = x, 1 = y, 2 = z) of the face normal.
    pub fn axis(self) -> usize {
        match self {
            Face::PosX | Face::NegX => 0,
            Face::PosY | Face::NegY => 1,
            Face::PosZ | Face::NegZ => 2,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Face::PosX | Face::PosY | Face::PosZ)
    }

    /// Quad corners on the unit cube, counter-clockwise seen from outside
    /// the block. Paired with UVs (0,0) (1,0) (1,1) (0,1).
    pub fn corners(self) -> [[f32; 3]; 4] {
        match self {
            Face::PosX => [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
            Face::NegX => [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
            Face::PosY => [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
            Face::NegY => [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            Face::PosZ => [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
            Face::NegZ => [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
        }
    }
}
