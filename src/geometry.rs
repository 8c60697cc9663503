//! Coordinate codec for the packed cube state.
//!
//! The whole cube is a single [`LedState`] word. Bits are grouped per anode
//! column: column `c` owns bits `c * LEVELS .. (c + 1) * LEVELS`, and inside
//! that group bit `z` is cathode level `z`.
//!
//! ```text
//!   Y
//!  /         C3---C7---C11--C15
//!  --X       /    /    /    / |
//! |        C2---C6---C10--C14 @
//! Z        /    /    /    / |/|
//!        C1---C5---C9---C13 @ @
//!        /    /    /    / |/|/|
//!  L0  C0---C4---C8---C12 @ @ @
//!  ..
//!  L3  C0---C4---C8---C12
//! ```
//!
//! A LED at `(x, y, z)` sits on column `LEVELS * x + y`, level `z`, so its bit
//! index is `LEVELS² * x + LEVELS * y + z`. Every mask in this module is
//! derived from [`LEVELS`] at compile time.
//!
//! The unchecked functions take raw coordinates. Out-of-range values trip a
//! `debug_assert!` in debug builds and wrap modulo [`LEVELS`] in release
//! builds. Use [`Voxel::new`] when coordinates come from untrusted input.

/// Packed on/off state of every LED in the cube.
pub type LedState = u64;

/// One cathode level compressed to a column pattern, bit `c` = column `c`.
pub type ColumnPattern = u16;

/// Cube edge length; also the number of cathode levels.
pub const LEVELS: usize = 4;

/// Number of anode columns.
pub const COLUMNS: usize = LEVELS * LEVELS;

/// Number of meaningful bits in a [`LedState`].
pub const STATE_BITS: usize = LEVELS * COLUMNS;

const _: () = assert!(STATE_BITS <= LedState::BITS as usize);
const _: () = assert!(COLUMNS <= ColumnPattern::BITS as usize);

/// Selects every meaningful bit of a [`LedState`].
pub const LED_STATE_MASK: LedState = LedState::MAX >> (LedState::BITS as usize - STATE_BITS);

/// Every LED lit.
pub const LED_STATE_ALL_ON: LedState = LED_STATE_MASK;

/// Every LED dark.
pub const LED_STATE_ALL_OFF: LedState = 0;

/// A cube axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Left to right along the front.
    X,
    /// Front to back.
    Y,
    /// Top level to bottom level (cathode levels).
    Z,
}

impl Axis {
    /// All axes in X, Y, Z order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Distance in bits between neighbouring LEDs along this axis.
    #[inline]
    pub const fn stride(self) -> u32 {
        match self {
            Axis::X => (LEVELS * LEVELS) as u32,
            Axis::Y => LEVELS as u32,
            Axis::Z => 1,
        }
    }
}

const fn build_slice_mask(axis: Axis, coord: usize) -> LedState {
    let stride = axis.stride() as usize;
    let mut mask: LedState = 0;
    let mut bit = 0;
    while bit < STATE_BITS {
        if (bit / stride) % LEVELS == coord {
            mask |= 1 << bit;
        }
        bit += 1;
    }
    mask
}

const fn build_slices(axis: Axis) -> [LedState; LEVELS] {
    let mut slices = [0; LEVELS];
    let mut coord = 0;
    while coord < LEVELS {
        slices[coord] = build_slice_mask(axis, coord);
        coord += 1;
    }
    slices
}

/// Constant-x planes, indexed by x.
pub const X_SLICES: [LedState; LEVELS] = build_slices(Axis::X);

/// Constant-y planes, indexed by y.
pub const Y_SLICES: [LedState; LEVELS] = build_slices(Axis::Y);

/// Constant-z planes, indexed by z. These are the cathode levels.
pub const Z_SLICES: [LedState; LEVELS] = build_slices(Axis::Z);

#[inline]
const fn wrap(coord: usize) -> usize {
    debug_assert!(coord < LEVELS, "cube coordinate out of range");
    coord % LEVELS
}

/// Bit position of the LED at `(x, y, z)`.
#[inline]
pub const fn bit_index(x: usize, y: usize, z: usize) -> u32 {
    (LEVELS * LEVELS * wrap(x) + LEVELS * wrap(y) + wrap(z)) as u32
}

/// Anode column driving the LEDs at `(x, y, *)`.
#[inline]
pub const fn column_index(x: usize, y: usize) -> usize {
    LEVELS * wrap(x) + wrap(y)
}

/// All bits belonging to one cathode level.
#[inline]
pub const fn level_mask(level: usize) -> LedState {
    Z_SLICES[wrap(level)]
}

/// The `LEVELS`-bit group of one anode column.
#[inline]
pub const fn column_mask(column: usize) -> LedState {
    debug_assert!(column < COLUMNS, "anode column out of range");
    let group: LedState = (1 << LEVELS) - 1;
    group << ((column % COLUMNS) * LEVELS)
}

/// The constant-coordinate plane `axis == coord`.
#[inline]
pub const fn axis_slice_mask(axis: Axis, coord: usize) -> LedState {
    let coord = wrap(coord);
    match axis {
        Axis::X => X_SLICES[coord],
        Axis::Y => Y_SLICES[coord],
        Axis::Z => Z_SLICES[coord],
    }
}

/// A state with only the LED at `(x, y, z)` lit.
#[inline]
pub const fn pixel(x: usize, y: usize, z: usize) -> LedState {
    1 << bit_index(x, y, z)
}

/// Returns true if the LED at `(x, y, z)` is lit in `state`.
#[inline]
pub const fn is_lit(state: LedState, x: usize, y: usize, z: usize) -> bool {
    state & pixel(x, y, z) != 0
}

/// Returns `state` with the LED at `(x, y, z)` lit.
#[inline]
pub const fn set_pixel(state: LedState, x: usize, y: usize, z: usize) -> LedState {
    state | pixel(x, y, z)
}

/// Returns `state` with the LED at `(x, y, z)` dark.
#[inline]
pub const fn clear_pixel(state: LedState, x: usize, y: usize, z: usize) -> LedState {
    state & !pixel(x, y, z)
}

/// Compresses one cathode level of `state` into a column pattern.
///
/// Bit `c` of the result is set iff column `c` is lit on `level`. This is the
/// word the refresh driver clocks into the shift register chain.
pub const fn level_pattern(state: LedState, level: usize) -> ColumnPattern {
    let level = wrap(level);
    let mut pattern: ColumnPattern = 0;
    let mut column = 0;
    while column < COLUMNS {
        if state & (1 << (column * LEVELS + level)) != 0 {
            pattern |= 1 << column;
        }
        column += 1;
    }
    pattern
}

/// Validation errors for checked coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// A coordinate was not in `0..LEVELS`.
    CoordinateOutOfRange {
        /// Axis of the offending coordinate.
        axis: Axis,
        /// The rejected value.
        value: usize,
    },
}

impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GeometryError::CoordinateOutOfRange { axis, value } => {
                write!(
                    f,
                    "{:?} coordinate {} is outside the cube (0..{})",
                    axis, value, LEVELS
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GeometryError {}

/// A validated cube coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Voxel {
    x: u8,
    y: u8,
    z: u8,
}

impl Voxel {
    /// Creates a voxel, rejecting coordinates outside the cube.
    pub fn new(x: usize, y: usize, z: usize) -> Result<Self, GeometryError> {
        for (axis, value) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
            if value >= LEVELS {
                return Err(GeometryError::CoordinateOutOfRange { axis, value });
            }
        }

        Ok(Self {
            x: x as u8,
            y: y as u8,
            z: z as u8,
        })
    }

    /// Coordinate along X.
    pub fn x(&self) -> usize {
        self.x as usize
    }

    /// Coordinate along Y.
    pub fn y(&self) -> usize {
        self.y as usize
    }

    /// Coordinate along Z (the cathode level).
    pub fn z(&self) -> usize {
        self.z as usize
    }

    /// Coordinate along `axis`.
    pub fn coord(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.x(),
            Axis::Y => self.y(),
            Axis::Z => self.z(),
        }
    }

    /// Bit position of this voxel.
    pub fn bit_index(&self) -> u32 {
        bit_index(self.x(), self.y(), self.z())
    }

    /// A state with only this voxel lit.
    pub fn mask(&self) -> LedState {
        pixel(self.x(), self.y(), self.z())
    }

    /// The cathode level this voxel is on.
    pub fn level(&self) -> usize {
        self.z()
    }

    /// The anode column this voxel is on.
    pub fn column(&self) -> usize {
        column_index(self.x(), self.y())
    }
}
