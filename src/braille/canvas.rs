/// Braille Unicode canvas. Each character cell holds a 2x4 dot grid,
/// encoded as the low byte of U+2800..U+28FF.
#[derive(Clone)]
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>,
}

/// Dot bit for (x % 2, y % 4) inside a cell.
/// ```text
/// (0,0) (1,0)   bits: 0x01 0x08
/// (0,1) (1,1)   bits: 0x02 0x10
/// (0,2) (1,2)   bits: 0x04 0x20
/// (0,3) (1,3)   bits: 0x40 0x80
/// ```
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

impl BrailleCanvas {
    /// Canvas of `width` x `height` characters, i.e. `width*2` x `height*4` dots.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    /// Set a dot. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }
        self.cells[cy * self.width + cx] |= DOT_BITS[x % 2][y % 4];
    }

    /// Set a dot from signed coordinates; negatives are off-canvas.
    #[inline]
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return false;
        }
        self.cells[cy * self.width + cx] & DOT_BITS[x % 2][y % 4] != 0
    }

    /// Glyph for a character cell; U+2800 (blank) when empty or out of range.
    pub fn glyph(&self, col: usize, row: usize) -> char {
        let bits = if col < self.width && row < self.height {
            self.cells[row * self.width + col]
        } else {
            0
        };
        char::from_u32(0x2800 + bits as u32).unwrap_or(' ')
    }

    /// Non-blank cells as (col, row, glyph), row-major.
    pub fn glyphs(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.cells.iter().enumerate().filter(|&(_, &bits)| bits != 0).map(move |(idx, _)| {
            let (col, row) = (idx % self.width, idx / self.width);
            (col, row, self.glyph(col, row))
        })
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|row| (0..self.width).map(|col| self.glyph(col, row)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
