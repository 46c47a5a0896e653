use std::sync::Arc;

use crate::assets::Sprites;
use crate::entity::{Body, Entity};
use crate::render::Renderer;
use crate::sprite::Sprite;
use crate::window::Window;

/// Points this session, drawn as centred digit images.
pub struct Score {
    value: u32,
    digits: Vec<Arc<Sprite>>,
    window_width: f64,
    body: Body,
}

impl Score {
    pub fn new(window: &Window, sprites: &Sprites) -> Self {
        let mut score = Score {
            value: 0,
            digits: sprites.digits.clone(),
            window_width: window.width(),
            body: Body::new(0.0, window.height() * 0.1, 0.0, 0.0),
        };
        score.layout();
        score
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
        self.layout();
    }

    /// Adds a point and returns the new total.
    pub fn add(&mut self) -> u32 {
        self.value += 1;
        self.layout();
        self.value
    }

    fn glyphs(&self) -> impl Iterator<Item = &Arc<Sprite>> + '_ {
        self.value
            .to_string()
            .into_bytes()
            .into_iter()
            .map(move |b| &self.digits[(b - b'0') as usize])
    }

    fn layout(&mut self) {
        let w: usize = self.glyphs().map(|g| g.width()).sum();
        let h = self.glyphs().map(|g| g.height()).max().unwrap_or(0);
        let x = (self.window_width - w as f64) / 2.0;
        self.body = Body::new(x, self.body.y, w as f64, h as f64);
    }
}

impl Entity for Score {
    fn body(&self) -> &Body {
        &self.body
    }

    fn tick(&mut self) {}

    fn render(&self, renderer: &mut dyn Renderer) {
        let mut x = self.body.x;
        for glyph in self.glyphs() {
            renderer.draw_image(glyph, x, self.body.y);
            x += glyph.width() as f64;
        }
        self.body.render_debug(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Theme;

    fn score() -> Score {
        Score::new(&Window::default(), &Sprites::generate(Theme::default()).unwrap())
    }

    #[test]
    fn starts_at_zero_and_counts_up() {
        let mut s = score();
        assert_eq!(s.value(), 0);
        assert_eq!(s.add(), 1);
        assert_eq!(s.add(), 2);
        s.reset();
        assert_eq!(s.value(), 0);
    }

    #[test]
    fn digits_are_centred() {
        let mut s = score();
        assert_eq!(s.body().w(), 24.0);
        assert_eq!(s.body().x, 132.0);
        for _ in 0..11 {
            s.add();
        }
        // "11" uses the narrow glyph twice.
        assert_eq!(s.body().w(), 32.0);
        assert_eq!(s.body().x, 128.0);
        assert_eq!(s.body().h(), 36.0);
        assert!((s.body().y - 51.2).abs() < 1e-9);
    }
}
