//! Lattice coordinates and direction offsets.

/// A discrete 3D coordinate in lattice space, or a direction offset between
/// two lattice cells.
///
/// Lattice coordinates of a [`VoxelLattice`](crate::VoxelLattice) are always
/// non-negative; negative components only appear in offsets such as the
/// `{-1, 0, 1}³` neighborhood.
///
/// # Example
///
/// ```
/// use nav_spatial::VoxelCoord;
///
/// let coord = VoxelCoord::new(1, 2, 3);
/// let step = VoxelCoord::new(1, 0, -1);
/// assert_eq!(coord + step, VoxelCoord::new(2, 2, 2));
/// assert_eq!(step.axis_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelCoord {
    /// X coordinate (width axis).
    pub x: i32,
    /// Y coordinate (vertical axis, up is `+y`).
    pub y: i32,
    /// Z coordinate (depth axis).
    pub z: i32,
}

impl VoxelCoord {
    /// Unit offset pointing straight up.
    pub const UP: Self = Self::new(0, 1, 0);

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate (0, 0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Sum of the absolute components, `|x| + |y| + |z|`.
    ///
    /// For a neighborhood offset this is the number of axes the step moves
    /// along, which is what the move cost is weighted by.
    ///
    /// ```
    /// use nav_spatial::VoxelCoord;
    ///
    /// assert_eq!(VoxelCoord::new(-1, 0, 1).abs_sum(), 2);
    /// assert_eq!(VoxelCoord::new(3, -4, 5).abs_sum(), 12);
    /// ```
    #[must_use]
    pub const fn abs_sum(self) -> u32 {
        self.x
            .unsigned_abs()
            .saturating_add(self.y.unsigned_abs())
            .saturating_add(self.z.unsigned_abs())
    }

    /// Number of non-zero components.
    #[must_use]
    pub fn axis_count(self) -> u32 {
        u32::from(self.x != 0) + u32::from(self.y != 0) + u32::from(self.z != 0)
    }

    /// Returns `true` if every component is non-zero (a pure corner offset).
    #[must_use]
    pub fn is_corner(self) -> bool {
        self.axis_count() == 3
    }

    /// Returns `true` if exactly one component is non-zero.
    #[must_use]
    pub fn is_axis_aligned(self) -> bool {
        self.axis_count() == 1
    }

    /// Chebyshev distance (largest per-axis difference) to another coordinate.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }

    /// The 26 offsets of the Moore neighborhood `{-1, 0, 1}³ \ {0}`.
    ///
    /// Ordered with x outermost and z innermost, each running from -1 to 1.
    ///
    /// ```
    /// use nav_spatial::VoxelCoord;
    ///
    /// let offsets = VoxelCoord::moore_offsets();
    /// assert_eq!(offsets.len(), 26);
    /// assert_eq!(offsets[0], VoxelCoord::new(-1, -1, -1));
    /// assert_eq!(offsets.iter().filter(|o| o.is_corner()).count(), 8);
    /// ```
    #[must_use]
    pub fn moore_offsets() -> [Self; 26] {
        let mut result = [Self::origin(); 26];
        let mut idx = 0;

        for dx in -1i32..=1 {
            for dy in -1i32..=1 {
                for dz in -1i32..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    result[idx] = Self::new(dx, dy, dz);
                    idx += 1;
                }
            }
        }

        result
    }

    /// Adds an offset, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
            self.z.checked_add(other.z)?,
        ))
    }
}

impl From<[i32; 3]> for VoxelCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl std::ops::Add for VoxelCoord {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_add(other.x),
            self.y.wrapping_add(other.y),
            self.z.wrapping_add(other.z),
        )
    }
}

impl std::ops::Sub for VoxelCoord {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

impl std::ops::Neg for VoxelCoord {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(
            self.x.wrapping_neg(),
            self.y.wrapping_neg(),
            self.z.wrapping_neg(),
        )
    }
}
