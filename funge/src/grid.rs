use crate::Fault;

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_HEIGHT: usize = 25;

/// Fixed-size program surface, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// A grid filled with spaces.
    #[must_use]
    pub fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![b' '; width * height],
        }
    }

    /// Lays program text out on a `width` x `height` grid.
    ///
    /// Lines are split on `\n` (a trailing `\r` is dropped), longer lines and
    /// extra rows are cut off, and everything else is padded with spaces.
    #[must_use]
    pub fn parse(source: &[u8], width: usize, height: usize) -> Self {
        let mut grid = Self::blank(width, height);
        for (y, line) in source.split(|&b| b == b'\n').take(height).enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let len = line.len().min(width);
            grid.row_mut(y)[..len].copy_from_slice(&line[..len]);
        }
        grid
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The byte under an in-bounds coordinate, as held by the pointer.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y * self.width + x]
    }

    /// Bounds-checked read used by `g`.
    pub fn get(&self, x: i64, y: i64) -> Result<u8, Fault> {
        let index = self.index(x, y)?;
        Ok(self.cells[index])
    }

    /// Bounds-checked write used by `p`.
    pub fn put(&mut self, x: i64, y: i64, value: u8) -> Result<(), Fault> {
        let index = self.index(x, y)?;
        self.cells[index] = value;
        Ok(())
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width)
    }

    fn index(&self, x: i64, y: i64) -> Result<usize, Fault> {
        let in_bounds = (0..self.width as i64).contains(&x) && (0..self.height as i64).contains(&y);
        if !in_bounds {
            return Err(Fault::GridBounds { x, y });
        }
        Ok(y as usize * self.width + x as usize)
    }
}
