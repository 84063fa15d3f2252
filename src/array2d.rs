use itertools::Itertools;

use crate::vec::Color3;

/// Row-major 2D buffer (frame buffers, per-tile outputs)
pub struct Array2d<T> {
    data: Vec<T>,
    size_x: u32,
    size_y: u32,
}

impl<T: Clone> Array2d<T> {
    pub fn with_size(size_x: u32, size_y: u32, value: T) -> Self {
        let mut m_data = Vec::with_capacity((size_x * size_y) as usize);
        m_data.resize((size_x * size_y) as usize, value);
        Self {
            data: m_data,
            size_x,
            size_y,
        }
    }

    #[must_use]
    pub const fn get_index_1d(&self, x: u32, y: u32) -> usize {
        y as usize * self.size_x as usize + x as usize
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size_x
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size_y
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size_x * self.size_y
    }

    #[must_use]
    pub fn at(&self, x: u32, y: u32) -> &T {
        &self.data[self.get_index_1d(x, y)]
    }

    pub fn at_mut(&mut self, x: u32, y: u32) -> &mut T {
        let index = self.get_index_1d(x, y);
        &mut self.data[index]
    }

    /// Copy `other` into this buffer with its top-left corner at `(x, y)`
    pub fn blit(&mut self, other: &Self, x: u32, y: u32) {
        for (lx, ly) in (0..other.size_x).cartesian_product(0..other.size_y) {
            *self.at_mut(x + lx, y + ly) = other.at(lx, ly).clone();
        }
    }
}

impl Array2d<Color3> {
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data
            .iter()
            .all(|c| c.x.is_finite() && c.y.is_finite() && c.z.is_finite())
    }
}
