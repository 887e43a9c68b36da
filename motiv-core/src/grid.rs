/// A dense, row-major 2-D array.
///
/// One shape serves the whole Newton pipeline: the complex working grid,
/// the basin-label grid, and the iteration-count grid are all `Grid2`s of
/// the same dimensions. Row-major layout keeps a row contiguous, which is
/// what the parallel per-row sweep in the solver relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid2<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width * height],
        }
    }
}

impl<T> Grid2<T> {
    /// Build a grid by evaluating `f(col, row)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(col, row));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> &T {
        &self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: T) {
        self.data[row * self.width + col] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width)
    }
}
