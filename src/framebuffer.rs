use crate::error::{Bounds, Chip8Error};

pub const CHIP8_WIDTH: usize = 64;
pub const CHIP8_HEIGHT: usize = 32;

/// The 64x32 monochrome screen. Pixels persist until a sprite erases them or
/// the screen is cleared; nothing is wiped between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; CHIP8_WIDTH]; CHIP8_HEIGHT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; CHIP8_WIDTH]; CHIP8_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; CHIP8_WIDTH]; CHIP8_HEIGHT];
    }

    /// XOR an 8-pixel-wide sprite onto the screen, one byte per row, MSB on
    /// the left. The origin wraps onto the screen; after that columns wrap
    /// within their row and rows falling off the bottom are dropped.
    /// Returns true if any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let start_x = x as usize % CHIP8_WIDTH;
        let start_y = y as usize % CHIP8_HEIGHT;
        let mut collision = false;
        for (j, byte) in rows.iter().enumerate() {
            let row = start_y + j;
            if row >= CHIP8_HEIGHT {
                break;
            }
            for i in 0..8 {
                if byte & (0x80 >> i) == 0 {
                    continue;
                }
                let px = &mut self.pixels[row][(start_x + i) % CHIP8_WIDTH];
                collision |= *px;
                *px = !*px;
            }
        }
        collision
    }

    pub fn is_pixel_set(&self, x: usize, y: usize) -> Result<bool, Chip8Error> {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .ok_or(Chip8Error::OutOfBounds(Bounds::Pixel { x, y }))
    }

    /// every pixel as (x, y, lit), row by row
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.pixels.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, lit)| (x, y, *lit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPH_0: [u8; 5] = [0xF0, 0x90, 0x90, 0x90, 0xF0];

    fn lit(fb: &FrameBuffer) -> Vec<(usize, usize)> {
        fb.pixels().filter(|p| p.2).map(|(x, y, _)| (x, y)).collect()
    }

    #[test]
    fn test_new_is_dark() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.pixels().count(), 2048);
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_draw_glyph_0() -> Result<(), Chip8Error> {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw_sprite(0, 0, &GLYPH_0));
        for y in 0..5 {
            for x in 0..8 {
                let expected = x < 4 && (y == 0 || y == 4 || x == 0 || x == 3);
                assert_eq!(fb.is_pixel_set(x, y)?, expected, "({}, {})", x, y);
            }
        }
        assert_eq!(lit(&fb).len(), 14);
        Ok(())
    }

    #[test]
    fn test_draw_twice_erases() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(10, 7, &GLYPH_0);
        assert!(fb.draw_sprite(10, 7, &GLYPH_0));
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_zero_bits_leave_pixels() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 0, &[0xff]);
        assert!(!fb.draw_sprite(0, 0, &[0x00]));
        assert_eq!(lit(&fb).len(), 8);
    }

    #[test]
    fn test_origin_wraps() -> Result<(), Chip8Error> {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(64 + 3, 32 + 2, &[0x80]);
        assert!(fb.is_pixel_set(3, 2)?);
        Ok(())
    }

    #[test]
    fn test_columns_wrap_within_row() -> Result<(), Chip8Error> {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(60, 0, &[0xff]);
        assert_eq!(
            lit(&fb),
            vec![(0, 0), (1, 0), (2, 0), (3, 0), (60, 0), (61, 0), (62, 0), (63, 0)]
        );
        Ok(())
    }

    #[test]
    fn test_rows_clip_at_bottom() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);
        assert_eq!(lit(&fb), vec![(0, 30), (0, 31)]);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.draw_sprite(5, 5, &GLYPH_0);
        fb.clear();
        assert!(lit(&fb).is_empty());
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let fb = FrameBuffer::new();
        assert!(fb.is_pixel_set(63, 31).is_ok());
        assert!(matches!(
            fb.is_pixel_set(64, 0),
            Err(Chip8Error::OutOfBounds(Bounds::Pixel { x: 64, y: 0 }))
        ));
        assert!(fb.is_pixel_set(0, 32).is_err());
    }
}
