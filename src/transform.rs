//! Translations of the lit pattern along the cube axes.
//!
//! Shifts are translations, not rotations: the plane that leaves the cube is
//! lost and the plane that opens up on the other side is dark.

use crate::geometry::{Axis, LED_STATE_ALL_OFF, LED_STATE_MASK, LEVELS, LedState, axis_slice_mask};

/// Moves every lit LED one step toward increasing `axis` coordinate.
#[inline]
pub const fn shift(state: LedState, axis: Axis) -> LedState {
    let moved = (state & LED_STATE_MASK) << axis.stride();
    moved & !axis_slice_mask(axis, 0) & LED_STATE_MASK
}

/// Moves every lit LED one step toward decreasing `axis` coordinate.
#[inline]
pub const fn unshift(state: LedState, axis: Axis) -> LedState {
    let moved = (state & LED_STATE_MASK) >> axis.stride();
    moved & !axis_slice_mask(axis, LEVELS - 1) & LED_STATE_MASK
}

/// Translates `state` by `delta` steps along `axis`. Negative deltas move
/// toward lower coordinates.
pub fn translate_axis(state: LedState, axis: Axis, delta: i8) -> LedState {
    let steps = delta.unsigned_abs() as usize;
    if steps >= LEVELS {
        return LED_STATE_ALL_OFF;
    }

    let mut state = state & LED_STATE_MASK;
    for _ in 0..steps {
        state = if delta > 0 {
            shift(state, axis)
        } else {
            unshift(state, axis)
        };
    }
    state
}

/// Translates `state` by the vector `(dx, dy, dz)`.
///
/// Axes are independent, so the order the components are applied in does
/// not change the result.
pub fn translate(state: LedState, dx: i8, dy: i8, dz: i8) -> LedState {
    [(Axis::X, dx), (Axis::Y, dy), (Axis::Z, dz)]
        .into_iter()
        .fold(state, |state, (axis, delta)| translate_axis(state, axis, delta))
}

/// Scroll styles for feeding new content into the cube one plane at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Marquee {
    /// Content travels right to left across the front, entering at the
    /// rightmost x plane.
    Across,

    /// Content travels from the back plane toward the front.
    BackToFront,
}

impl Marquee {
    /// Axis the content travels along.
    pub const fn axis(self) -> Axis {
        match self {
            Marquee::Across => Axis::X,
            Marquee::BackToFront => Axis::Y,
        }
    }

    /// Plane new content enters through.
    pub const fn entry_plane(self) -> LedState {
        axis_slice_mask(self.axis(), LEVELS - 1)
    }

    /// Advances `frame` by one step and fills the entry plane from `incoming`.
    ///
    /// Only the bits of `incoming` inside [`Marquee::entry_plane`] are used.
    pub const fn step(self, frame: LedState, incoming: LedState) -> LedState {
        unshift(frame, self.axis()) | (incoming & self.entry_plane())
    }
}
