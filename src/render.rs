//! Framebuffer rendering and the renderer seam the simulation draws through.

use std::io;

use crate::assets::DIGIT_GLYPHS;
use crate::entity::Rect;
use crate::sprite::{Rgb, Sprite};
use crate::window::Window;

const DEBUG_RECT: Rgb = Rgb(255, 0, 0);
const DEBUG_TEXT: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

/// Where entities draw themselves. The simulation never reads back from it.
pub trait Renderer {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64);

    fn draw_debug_rect(&mut self, rect: Rect, label: &str);

    /// Flushes the finished frame to wherever it is shown.
    fn present(&mut self) -> io::Result<()>;

    fn debug_overlay(&self) -> bool {
        false
    }
}

/// Gives access to the last drawn frame.
pub trait Observe {
    fn observe(&self) -> Frame;
}

// ── Pixel buffer ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb(0, 0, 0); w * h],
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dx in 0..w {
            self.set(x + dx, y, c);
            self.set(x + dx, y + h - 1, c);
        }
        for dy in 0..h {
            self.set(x, y + dy, c);
            self.set(x + w - 1, y + dy, c);
        }
    }

    /// Alpha-composites a sprite with its top-left corner at (x, y).
    pub fn blit(&mut self, sprite: &Sprite, x: i32, y: i32) {
        for sy in 0..sprite.height() {
            let py = y + sy as i32;
            if py < 0 || py as usize >= self.h {
                continue;
            }
            for sx in 0..sprite.width() {
                let px = x + sx as i32;
                if px < 0 || px as usize >= self.w {
                    continue;
                }
                let src = sprite.pixel(sx, sy);
                match src.alpha() {
                    0 => {}
                    255 => self.set(px, py, src.rgb()),
                    a => {
                        let dst = self.get(px as usize, py as usize);
                        self.set(px, py, Rgb::lerp(dst, src.rgb(), a as u16 + 1));
                    }
                }
            }
        }
    }

    /// Nearest-neighbour resample into a `w` x `h` buffer.
    pub fn scaled(&self, w: usize, h: usize) -> PixelBuf {
        let mut out = PixelBuf::new(w, h);
        if self.w == 0 || self.h == 0 {
            return out;
        }
        for y in 0..h {
            let sy = y * self.h / h.max(1);
            for x in 0..w {
                let sx = x * self.w / w.max(1);
                out.px[y * w + x] = self.get(sx, sy);
            }
        }
        out
    }
}

// ── 3x5 label font ──────────────────────────────────────────────────────────

#[rustfmt::skip]
const DOT: [u8; 15] = [0,0,0, 0,0,0, 0,0,0, 0,0,0, 0,1,0];
#[rustfmt::skip]
const COMMA: [u8; 15] = [0,0,0, 0,0,0, 0,0,0, 0,1,0, 1,0,0];
#[rustfmt::skip]
const MINUS: [u8; 15] = [0,0,0, 0,0,0, 1,1,1, 0,0,0, 0,0,0];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGIT_GLYPHS[ch as usize - '0' as usize]),
        '.' => Some(&DOT),
        ',' => Some(&COMMA),
        '-' => Some(&MINUS),
        _ => None,
    }
}

/// Pixel width of `text` in the label font.
pub fn text_width(text: &str) -> i32 {
    (text.chars().count() as i32 * 4 - 1).max(0)
}

/// Draws `text` with a drop shadow; unknown characters leave a gap.
pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, text: &str, fg: Rgb) {
    for (i, ch) in text.chars().enumerate() {
        let Some(g) = glyph(ch) else { continue };
        let gx = x + i as i32 * 4;
        for row in 0..5 {
            for col in 0..3 {
                if g[row * 3 + col] == 1 {
                    let px = gx + col as i32;
                    let py = y + row as i32;
                    buf.set(px + 1, py + 1, SHADOW);
                    buf.set(px, py, fg);
                }
            }
        }
    }
}

// ── Headless renderer ───────────────────────────────────────────────────────

/// Draws into an in-memory framebuffer sized to the logical window.
#[derive(Clone, Debug)]
pub struct Canvas {
    buf: PixelBuf,
    debug: bool,
    presented: u64,
}

impl Canvas {
    pub fn new(window: &Window, debug: bool) -> Self {
        Canvas {
            buf: PixelBuf::new(window.width() as usize, window.height() as usize),
            debug,
            presented: 0,
        }
    }

    pub fn buffer(&self) -> &PixelBuf {
        &self.buf
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }
}

impl Renderer for Canvas {
    fn draw_image(&mut self, sprite: &Sprite, x: f64, y: f64) {
        self.buf.blit(sprite, x.floor() as i32, y.floor() as i32);
    }

    fn draw_debug_rect(&mut self, rect: Rect, label: &str) {
        if !self.debug {
            return;
        }
        let (x, y) = (rect.x.floor() as i32, rect.y.floor() as i32);
        let (w, h) = (rect.w.round() as i32, rect.h.round() as i32);
        self.buf.outline_rect(x, y, w, h, DEBUG_RECT);
        let tx = x + w / 2 - text_width(label) / 2;
        draw_text(&mut self.buf, tx, y - 7, label, DEBUG_TEXT);
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn debug_overlay(&self) -> bool {
        self.debug
    }
}

impl Observe for Canvas {
    fn observe(&self) -> Frame {
        Frame::capture(&self.buf)
    }
}

// ── Observation ─────────────────────────────────────────────────────────────

/// A captured frame: row-major `(height, width, 3)` RGB bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    pub fn capture(buf: &PixelBuf) -> Self {
        let mut data = Vec::with_capacity(buf.w * buf.h * 3);
        for c in &buf.px {
            data.extend_from_slice(&[c.0, c.1, c.2]);
        }
        Frame {
            width: buf.w,
            height: buf.h,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, 3)
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Rgba;

    #[test]
    fn blit_skips_transparent_pixels() {
        let mut buf = PixelBuf::new(4, 4);
        buf.fill_rect(0, 0, 4, 4, Rgb(9, 9, 9));
        let s = Sprite::from_fn(2, 2, |x, _| {
            if x == 0 { Rgba(200, 0, 0, 255) } else { Rgba::CLEAR }
        });
        buf.blit(&s, 1, 1);
        assert_eq!(buf.get(1, 1), Rgb(200, 0, 0));
        assert_eq!(buf.get(2, 1), Rgb(9, 9, 9));
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut buf = PixelBuf::new(2, 2);
        let s = Sprite::from_fn(3, 3, |_, _| Rgba(1, 2, 3, 255));
        buf.blit(&s, -1, -1);
        assert_eq!(buf.get(0, 0), Rgb(1, 2, 3));
        assert_eq!(buf.get(1, 1), Rgb(1, 2, 3));
    }

    #[test]
    fn frame_layout_is_rows_of_rgb() {
        let mut buf = PixelBuf::new(3, 2);
        buf.set(2, 1, Rgb(10, 20, 30));
        let f = Frame::capture(&buf);
        assert_eq!(f.shape(), (2, 3, 3));
        assert_eq!(f.as_bytes().len(), 18);
        assert_eq!(f.pixel(2, 1), [10, 20, 30]);
        assert_eq!(&f.as_bytes()[15..18], &[10, 20, 30]);
    }

    #[test]
    fn debug_rect_only_when_enabled() {
        let window = Window::new(20.0, 20.0).unwrap();
        let mut off = Canvas::new(&window, false);
        off.draw_debug_rect(Rect::new(2.0, 10.0, 5.0, 5.0), "1");
        assert_eq!(off.buffer().get(2, 10), Rgb(0, 0, 0));

        let mut on = Canvas::new(&window, true);
        on.draw_debug_rect(Rect::new(2.0, 10.0, 5.0, 5.0), "1");
        assert_eq!(on.buffer().get(2, 10), DEBUG_RECT);
        assert_eq!(on.buffer().get(6, 14), DEBUG_RECT);
    }

    #[test]
    fn scaled_halves() {
        let mut buf = PixelBuf::new(4, 4);
        buf.fill_rect(2, 0, 2, 4, Rgb(5, 5, 5));
        let half = buf.scaled(2, 2);
        assert_eq!(half.get(1, 0), Rgb(5, 5, 5));
        assert_eq!(half.get(0, 1), Rgb(0, 0, 0));
    }

    #[test]
    fn present_counts_frames() {
        let mut c = Canvas::new(&Window::default(), false);
        c.present().unwrap();
        c.present().unwrap();
        assert_eq!(c.frames_presented(), 2);
    }
}
