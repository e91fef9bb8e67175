use crate::framebuffer::{FrameBuffer, CHIP8_HEIGHT, CHIP8_WIDTH};
use log::warn;
use std::io;
use tui::backend::{Backend, CrosstermBackend};
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the host loop to put the framebuffer on a screen. It
/// should abstract the implementation details, so a variety of kinds of
/// screen would work. The interpreter itself never calls it.
pub trait Display {
    /// present one frame
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error>;
}

// store useful metadata about the canvas
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel in the given state; y is flipped
    /// because the canvas origin is bottom-left
    fn bitplane_from_frame(&self, frame: &FrameBuffer, lit: bool) -> Vec<(f64, f64)> {
        frame
            .pixels()
            .filter(|&(_, _, px)| px == lit)
            .map(|(x, y, _)| (x as f64, -1.0 * y as f64))
            .collect()
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay<B: Backend> {
    terminal: Terminal<B>,
    resolution: Resolution,
}

impl MonoTermDisplay<CrosstermBackend<io::Stdout>> {
    pub fn new() -> Result<Self, io::Error> {
        Self::with_backend(CrosstermBackend::new(io::stdout()))
    }
}

impl<B: Backend> MonoTermDisplay<B> {
    pub fn with_backend(backend: B) -> Result<Self, io::Error> {
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(CHIP8_WIDTH, CHIP8_HEIGHT),
        })
    }

    /// border plus one cell per pixel, cut down to what the terminal has
    fn area(&self) -> Result<Rect, io::Error> {
        let full = Rect::new(
            0,
            0,
            2 + self.resolution.0 as u16,
            2 + self.resolution.1 as u16,
        );
        Ok(self.terminal.size()?.intersection(full))
    }

    /// park the cursor on the line below the last frame, so whatever
    /// prints next doesn't land on top of it
    pub fn release(&mut self) -> Result<(), io::Error> {
        let area = self.area()?;
        let below = area.bottom().min(self.terminal.size()?.height.saturating_sub(1));
        self.terminal.set_cursor(0, below)?;
        self.terminal.show_cursor()
    }
}

impl<B: Backend> Drop for MonoTermDisplay<B> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Could not restore the cursor: {}", e);
        }
    }
}

impl<B: Backend> Display for MonoTermDisplay<B> {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        // expand each bitplane into x, y float coords, suitable for
        // rendering with TUI. this just prints blocky points for now
        let dark = self.resolution.bitplane_from_frame(frame, false);
        let lit = self.resolution.bitplane_from_frame(frame, true);
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();
        // 1:1 between terminal cells and chip8 pixels, plus the border
        let size = self.area()?;

        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &dark,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines
pub struct DummyDisplay {
    pub frames: usize,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay { frames: 0 }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _frame: &FrameBuffer) -> Result<(), io::Error> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui::backend::TestBackend;

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_bitplanes_partition_frame() {
        let r = Resolution(64, 32);
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(2, 3, &[0xc0]);
        let lit = r.bitplane_from_frame(&frame, true);
        assert_eq!(lit, vec![(2.0, -3.0), (3.0, -3.0)]);
        assert_eq!(r.bitplane_from_frame(&frame, false).len(), 2046);
    }

    #[test]
    fn test_draws_frame_with_border() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::with_backend(TestBackend::new(80, 40))?;
        d.draw(&FrameBuffer::new())?;
        let buf = d.terminal.backend().buffer();
        assert_eq!(buf.get(0, 0).symbol, "┌");
        assert_eq!(buf.get(65, 33).symbol, "┘");
        assert_eq!(buf.get(66, 0).symbol, " ");
        Ok(())
    }

    #[test]
    fn test_small_terminal_is_cropped() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::with_backend(TestBackend::new(40, 20))?;
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(60, 30, &[0xf0, 0x90]);
        d.draw(&frame)?;
        d.draw(&frame)?;
        let buf = d.terminal.backend().buffer();
        assert_eq!(buf.get(0, 0).symbol, "┌");
        assert_eq!(buf.get(39, 19).symbol, "┘");
        Ok(())
    }

    #[test]
    fn test_release_leaves_cursor_below_frame() -> Result<(), io::Error> {
        let mut d = MonoTermDisplay::with_backend(TestBackend::new(80, 40))?;
        d.draw(&FrameBuffer::new())?;
        d.release()?;
        assert_eq!(d.terminal.get_cursor()?, (0, 34));

        let mut small = MonoTermDisplay::with_backend(TestBackend::new(40, 20))?;
        small.draw(&FrameBuffer::new())?;
        small.release()?;
        assert_eq!(small.terminal.get_cursor()?, (0, 19));
        Ok(())
    }

    #[test]
    fn test_dummy_counts_frames() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        d.draw(&FrameBuffer::new())?;
        d.draw(&FrameBuffer::new())?;
        assert_eq!(d.frames, 2);
        Ok(())
    }
}
