//! Fixed-size row-major 2D storage addressed by [`Position`].
//!
//! [`Layer`] is the shared backing store for the ground-truth [`Grid`] and
//! every observer's [`Memory`], and doubles as the visited/predecessor
//! scratch space for the breadth- and depth-first searches in this crate.
//!
//! [`Grid`]: crate::grid::Grid
//! [`Memory`]: crate::memory::Memory

use forage_types::Position;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A `width x height` rectangle of `T`, stored row-major.
///
/// Dimensions are fixed at construction and always fit in `i32`, so every
/// in-bounds [`Position`] maps to exactly one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer<T> {
    /// Number of columns.
    width: i32,
    /// Number of rows.
    height: i32,
    /// Row-major cell storage, `width * height` entries long.
    cells: Vec<T>,
}

impl<T: Copy> Layer<T> {
    /// Create a layer with every slot set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is
    /// zero or the layer would not be addressable.
    pub fn filled(width: u32, height: u32, value: T) -> Result<Self, WorldError> {
        let invalid = || WorldError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        let w = i32::try_from(width).map_err(|_e| invalid())?;
        let h = i32::try_from(height).map_err(|_e| invalid())?;
        let len = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or_else(invalid)?;
        Ok(Self {
            width: w,
            height: h,
            cells: vec![value; len],
        })
    }

    /// A layer of the same shape with every slot transformed by `f`.
    pub fn map<U, F: FnMut(T) -> U>(&self, f: F) -> Layer<U> {
        Layer {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().copied().map(f).collect(),
        }
    }

    /// Number of columns.
    pub const fn width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    /// Number of rows.
    pub const fn height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Total slot count.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; zero-sized layers cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `pos` lies inside the rectangle.
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Storage index of `pos`, or `None` when out of bounds.
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let w = usize::try_from(self.width).ok()?;
        y.checked_mul(w)?.checked_add(x)
    }

    /// The value at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<T> {
        self.index(pos).and_then(|i| self.cells.get(i)).copied()
    }

    /// Overwrite the value at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `pos` is outside the layer.
    pub fn set(&mut self, pos: Position, value: T) -> Result<(), WorldError> {
        self.replace(pos, value)
            .map(|_| ())
            .ok_or(WorldError::OutOfBounds(pos))
    }

    /// Overwrite the value at `pos`, returning the previous value.
    ///
    /// Returns `None` (and writes nothing) when `pos` is out of bounds.
    pub fn replace(&mut self, pos: Position, value: T) -> Option<T> {
        let slot = self.index(pos).and_then(|i| self.cells.get_mut(i))?;
        Some(core::mem::replace(slot, value))
    }

    /// Every in-bounds position, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<T> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Every position paired with its value, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, T)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// The orthogonal neighbors of `pos` that lie inside the layer.
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.neighbors().into_iter().filter(|n| self.contains(*n))
    }

    /// Number of slots whose value satisfies `predicate`.
    pub fn count(&self, mut predicate: impl FnMut(T) -> bool) -> usize {
        self.cells.iter().filter(|v| predicate(**v)).count()
    }
}
