//! Terminal output: frames drawn with half-block characters, two pixels
//! per cell.

use std::io::{self, Stdout, Write, stdout};

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{self, Color as CColor},
    terminal,
};
use tracing::debug;

use crate::entity::Rect;
use crate::render::{Canvas, Frame, Observe, PixelBuf, Renderer};
use crate::sprite::{Rgb, Sprite};
use crate::window::Window;

/// Raw mode and the alternate screen for as long as it lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(TerminalGuard { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Largest pixel size that fits `cols` x `rows` cells at the source's
/// aspect ratio. The height is even so every cell gets two pixels.
pub fn fit(src_w: usize, src_h: usize, cols: u16, rows: u16) -> (usize, usize) {
    if src_w == 0 || src_h == 0 {
        return (0, 0);
    }
    let (pw, ph) = (cols as f64, rows as f64 * 2.0);
    let scale = (pw / src_w as f64).min(ph / src_h as f64);
    let w = (src_w as f64 * scale).floor() as usize;
    let h = (src_h as f64 * scale).floor() as usize;
    (w.max(1), (h - h % 2).max(2))
}

fn fg(c: Rgb) -> style::SetForegroundColor {
    style::SetForegroundColor(CColor::Rgb { r: c.0, g: c.1, b: c.2 })
}

fn bg(c: Rgb) -> style::SetBackgroundColor {
    style::SetBackgroundColor(CColor::Rgb { r: c.0, g: c.1, b: c.2 })
}

/// Writes `buf` starting at column `left`, one cell per column and two
/// rows per line. Colour changes are only emitted when they differ.
pub fn write_half_blocks(buf: &PixelBuf, out: &mut impl Write, left: u16) -> io::Result<()> {
    let rows = buf.height() / 2;
    for row in 0..rows {
        queue!(out, cursor::MoveTo(left, row as u16))?;
        let mut prev_fg: Option<Rgb> = None;
        let mut prev_bg: Option<Rgb> = None;
        for col in 0..buf.width() {
            let top = buf.get(col, row * 2);
            let bot = buf.get(col, row * 2 + 1);

            if top == bot {
                if prev_bg != Some(top) {
                    queue!(out, bg(top))?;
                    prev_bg = Some(top);
                }
                queue!(out, style::Print(' '))?;
            } else {
                if prev_fg != Some(top) {
                    queue!(out, fg(top))?;
                    prev_fg = Some(top);
                }
                if prev_bg != Some(bot) {
                    queue!(out, bg(bot))?;
                    prev_bg = Some(bot);
                }
                queue!(out, style::Print('\u{2580}'))?; // ▀
            }
        }
        queue!(out, style::ResetColor)?;
    }
    out.flush()
}

/// Draws into a window-sized canvas and shows it scaled to the terminal.
pub struct TerminalRenderer {
    canvas: Canvas,
    out: Stdout,
    size: (u16, u16),
}

impl TerminalRenderer {
    pub fn new(window: &Window, debug: bool) -> io::Result<Self> {
        Ok(TerminalRenderer {
            canvas: Canvas::new(window, debug),
            out: stdout(),
            size: terminal::size()?,
        })
    }
}

impl Renderer for TerminalRenderer {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64) {
        self.canvas.draw_image(sprite, x, y);
    }

    fn draw_debug_rect(&mut self, rect: Rect, label: &str) {
        self.canvas.draw_debug_rect(rect, label);
    }

    fn present(&mut self) -> io::Result<()> {
        let size = terminal::size()?;
        if size != self.size {
            debug!(cols = size.0, rows = size.1, "terminal_resized");
            self.size = size;
            queue!(self.out, style::ResetColor, terminal::Clear(terminal::ClearType::All))?;
        }
        let src = self.canvas.buffer();
        let (w, h) = fit(src.width(), src.height(), size.0, size.1);
        let scaled = src.scaled(w, h);
        let left = (size.0 as usize).saturating_sub(w) / 2;
        write_half_blocks(&scaled, &mut self.out, left as u16)?;
        self.canvas.present()
    }

    fn debug_overlay(&self) -> bool {
        self.canvas.debug_overlay()
    }
}

impl Observe for TerminalRenderer {
    fn observe(&self) -> Frame {
        self.canvas.observe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_the_aspect_ratio() {
        assert_eq!(fit(288, 512, 80, 24), (27, 48));
        assert_eq!(fit(288, 512, 400, 300), (337, 600));
        let (w, h) = fit(288, 512, 300, 100);
        assert_eq!(h, 200);
        assert_eq!(w, 112);
    }

    #[test]
    fn odd_heights_round_down_to_whole_cells() {
        // 28 columns scale 512 rows to 49.8 pixels.
        let (_, h) = fit(288, 512, 28, 100);
        assert_eq!(h, 48);
        let mut buf = PixelBuf::new(1, h);
        buf.set(0, h as i32 - 1, Rgb(0, 0, 255));
        let mut out = Vec::new();
        write_half_blocks(&buf, &mut out, 0).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().matches('\u{2580}').count(), 1);
    }

    #[test]
    fn degenerate_sizes_stay_drawable() {
        assert_eq!(fit(288, 512, 0, 0), (1, 2));
        assert_eq!(fit(0, 512, 80, 24), (0, 0));
    }

    #[test]
    fn split_cells_use_the_half_block() {
        let mut buf = PixelBuf::new(2, 2);
        buf.set(0, 0, Rgb(255, 0, 0));
        buf.set(0, 1, Rgb(0, 0, 255));
        let mut out = Vec::new();
        write_half_blocks(&buf, &mut out, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('\u{2580}').count(), 1);
    }

    #[test]
    fn flat_cells_are_spaces() {
        let buf = PixelBuf::new(3, 4);
        let mut out = Vec::new();
        write_half_blocks(&buf, &mut out, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains('\u{2580}'));
        assert_eq!(text.matches(' ').count(), 6);
    }
}
