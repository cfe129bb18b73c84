//! Row-major grid storage
//!
//! One value per cell, indexed `(i, j)` with `i` along x. The same container
//! holds the temperature buffers, the status grid and both gradient components,
//! so every stage can hand whole rows to rayon.

use crate::error::SimError;

/// Grid-shaped buffer, `data[j * width + i]`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData<T = f64> {
    pub data: Vec<T>,
    pub width: usize,
    pub height: usize,
}

impl<T: Copy + Default> FieldData<T> {
    /// Buffer of `T::default()` (0.0 for fields, outside for status grids)
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_value(width, height, T::default())
    }

    #[must_use]
    pub fn with_value(width: usize, height: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Like [`FieldData::with_value`], but an oversized grid is an error rather
    /// than an abort
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Allocation`] when `width × height` overflows or the
    /// buffer cannot be reserved.
    pub fn try_with_value(width: usize, height: usize, value: T) -> Result<Self, SimError> {
        let cells = width
            .checked_mul(height)
            .ok_or(SimError::Allocation { cells: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| SimError::Allocation { cells })?;
        data.resize(cells, value);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Buffer filled from a function of the cell indices
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let data = (0..height)
            .flat_map(|j| (0..width).map(move |i| (i, j)))
            .map(|(i, j)| f(i, j))
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Value of cell `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    #[must_use]
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(i < self.width && j < self.height, "Cell ({i}, {j}) outside grid");
        self.data[j * self.width + i]
    }

    /// Overwrite cell `(i, j)`
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        assert!(i < self.width && j < self.height, "Cell ({i}, {j}) outside grid");
        self.data[j * self.width + i] = value;
    }

    /// Row `j` as a slice
    pub fn row(&self, j: usize) -> &[T] {
        &self.data[j * self.width..(j + 1) * self.width]
    }

    /// Whether both buffers cover the same grid
    pub fn same_shape<U>(&self, other: &FieldData<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}
