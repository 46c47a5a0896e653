//! The visual asset set, painted procedurally from palettes.

use std::sync::Arc;

use rand::Rng;

use crate::error::GameError;
use crate::sprite::{Rgb, Rgba, Sprite};

// ── Palette ─────────────────────────────────────────────────────────────────

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const NIGHT_TOP: Rgb = Rgb(8, 24, 60);
const NIGHT_BOT: Rgb = Rgb(0, 135, 147);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const CITY: Rgb = Rgb(40, 70, 100);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const BANNER: Rgb = Rgb(250, 120, 40);

struct PipeShades {
    left: Rgb,
    mid: Rgb,
    right: Rgb,
    hi: Rgb,
}

const PIPE_GREEN: PipeShades = PipeShades {
    left: Rgb(74, 122, 26),
    mid: Rgb(100, 170, 40),
    right: Rgb(115, 191, 46),
    hi: Rgb(145, 215, 62),
};

const PIPE_RED: PipeShades = PipeShades {
    left: Rgb(130, 30, 20),
    mid: Rgb(190, 55, 35),
    right: Rgb(215, 75, 45),
    hi: Rgb(240, 120, 80),
};

struct BirdShades {
    body: Rgb,
    hi: Rgb,
    wing: Rgb,
}

const BIRD_YELLOW: BirdShades = BirdShades {
    body: Rgb(245, 200, 66),
    hi: Rgb(255, 225, 100),
    wing: Rgb(215, 165, 35),
};

const BIRD_RED: BirdShades = BirdShades {
    body: Rgb(230, 70, 50),
    hi: Rgb(250, 120, 90),
    wing: Rgb(180, 45, 30),
};

const BIRD_BLUE: BirdShades = BirdShades {
    body: Rgb(70, 150, 230),
    hi: Rgb(120, 190, 250),
    wing: Rgb(40, 100, 180),
};

// ── Sizes ───────────────────────────────────────────────────────────────────

pub const BACKGROUND_SIZE: (usize, usize) = (288, 512);
pub const BASE_SIZE: (usize, usize) = (336, 112);
pub const PLAYER_SIZE: (usize, usize) = (34, 24);
pub const PIPE_SIZE: (usize, usize) = (52, 320);
pub const DIGIT_SIZE: (usize, usize) = (24, 36);
pub const NARROW_DIGIT_WIDTH: usize = 16;
pub const WELCOME_SIZE: (usize, usize) = (184, 267);
pub const GAME_OVER_SIZE: (usize, usize) = (192, 42);

#[rustfmt::skip]
pub(crate) const DIGIT_GLYPHS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

// ── Themes ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backdrop {
    Day,
    Night,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BirdColor {
    Red,
    Blue,
    Yellow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeColor {
    Green,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub backdrop: Backdrop,
    pub bird: BirdColor,
    pub pipe: PipeColor,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            backdrop: Backdrop::Day,
            bird: BirdColor::Yellow,
            pipe: PipeColor::Green,
        }
    }
}

impl Theme {
    pub fn random(rng: &mut impl Rng) -> Self {
        let backdrop = if rng.gen_bool(0.5) {
            Backdrop::Day
        } else {
            Backdrop::Night
        };
        let bird = match rng.gen_range(0..3) {
            0 => BirdColor::Red,
            1 => BirdColor::Blue,
            _ => BirdColor::Yellow,
        };
        let pipe = if rng.gen_bool(0.5) {
            PipeColor::Green
        } else {
            PipeColor::Red
        };
        Theme {
            backdrop,
            bird,
            pipe,
        }
    }
}

// ── Sprite set ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Sprites {
    pub background: Arc<Sprite>,
    pub base: Arc<Sprite>,
    /// Wing up, wing level, wing down.
    pub player: Vec<Arc<Sprite>>,
    pub pipe_upper: Arc<Sprite>,
    pub pipe_lower: Arc<Sprite>,
    pub digits: Vec<Arc<Sprite>>,
    pub welcome_message: Arc<Sprite>,
    pub game_over: Arc<Sprite>,
}

impl Sprites {
    pub fn generate(theme: Theme) -> Result<Self, GameError> {
        let pipe_lower = paint_pipe(match theme.pipe {
            PipeColor::Green => &PIPE_GREEN,
            PipeColor::Red => &PIPE_RED,
        })?;
        let pipe_upper = pipe_lower.flipped_vertically();
        let bird = match theme.bird {
            BirdColor::Red => &BIRD_RED,
            BirdColor::Blue => &BIRD_BLUE,
            BirdColor::Yellow => &BIRD_YELLOW,
        };
        let player = [-3, 0, 3]
            .into_iter()
            .map(|wing| paint_bird(bird, wing).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let digits = (0..10)
            .map(|d| paint_digit(d).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let sprites = Sprites {
            background: Arc::new(paint_background(theme.backdrop)?),
            base: Arc::new(paint_base()?),
            player,
            pipe_upper: Arc::new(pipe_upper),
            pipe_lower: Arc::new(pipe_lower),
            digits,
            welcome_message: Arc::new(paint_welcome()?),
            game_over: Arc::new(paint_game_over()?),
        };
        sprites.validate()?;
        Ok(sprites)
    }

    pub fn randomized(rng: &mut impl Rng) -> Result<Self, GameError> {
        Sprites::generate(Theme::random(rng))
    }

    /// Checks that every image a session needs is present and usable.
    pub fn validate(&self) -> Result<(), GameError> {
        let named = [
            ("background", &self.background),
            ("base", &self.base),
            ("pipe_upper", &self.pipe_upper),
            ("pipe_lower", &self.pipe_lower),
            ("welcome_message", &self.welcome_message),
            ("game_over", &self.game_over),
        ];
        for (name, sprite) in named {
            if sprite.is_empty() {
                return Err(GameError::asset(name, "empty image"));
            }
        }
        if self.player.len() != 3 {
            return Err(GameError::asset(
                "player",
                format!("expected 3 wing frames, got {}", self.player.len()),
            ));
        }
        if self.player.iter().any(|s| s.is_empty()) {
            return Err(GameError::asset("player", "empty wing frame"));
        }
        if self.digits.len() != 10 {
            return Err(GameError::asset(
                "digits",
                format!("expected 10 glyphs, got {}", self.digits.len()),
            ));
        }
        if self.digits.iter().any(|s| s.is_empty()) {
            return Err(GameError::asset("digits", "empty glyph"));
        }
        if self.pipe_upper.width() != self.pipe_lower.width()
            || self.pipe_upper.height() != self.pipe_lower.height()
        {
            return Err(GameError::asset("pipe", "upper and lower pipes differ in size"));
        }
        Ok(())
    }
}

// ── Painting ────────────────────────────────────────────────────────────────

struct Canvas {
    w: usize,
    h: usize,
    px: Vec<Rgba>,
}

impl Canvas {
    fn new((w, h): (usize, usize)) -> Self {
        Canvas {
            w,
            h,
            px: vec![Rgba::CLEAR; w * h],
        }
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = Rgba::opaque(c);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn into_sprite(self, name: &str) -> Result<Sprite, GameError> {
        Sprite::from_pixels(name, self.w, self.h, self.px)
    }
}

fn paint_background(backdrop: Backdrop) -> Result<Sprite, GameError> {
    let (w, h) = BACKGROUND_SIZE;
    let mut c = Canvas::new(BACKGROUND_SIZE);
    let (top, bot) = match backdrop {
        Backdrop::Day => (SKY_TOP, SKY_BOT),
        Backdrop::Night => (NIGHT_TOP, NIGHT_BOT),
    };
    for y in 0..h {
        let t = (y * 256 / h) as u16;
        let col = Rgb::lerp(top, bot, t);
        for x in 0..w {
            c.set(x as i32, y as i32, col);
        }
    }

    let base = (h as f64 * 0.79) as i32;
    // Skyline
    for x in 0..w as i32 {
        let block = (x / 12) as f64;
        let tall = ((block * 1.3).sin().abs() * 40.0) as i32 + 20;
        for y in (base - tall)..base {
            c.set(x, y, CITY);
        }
    }
    // Far hills
    for x in 0..w as i32 {
        let fx = x as f64 * 0.04;
        let hh = fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0;
        for y in (base - hh as i32 - 14)..base {
            c.set(x, y, HILL_FAR);
        }
    }
    // Near hills
    for x in 0..w as i32 {
        let fx = x as f64 * 0.06;
        let hh = fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0;
        for y in (base - hh as i32 - 6)..base {
            c.set(x, y, HILL_NEAR);
        }
    }
    c.into_sprite("background")
}

fn paint_base() -> Result<Sprite, GameError> {
    let (w, h) = BASE_SIZE;
    let mut c = Canvas::new(BASE_SIZE);
    for x in 0..w as i32 {
        let alt = (x / 12) % 2 == 0;
        for y in 0..8 {
            c.set(x, y, if alt { GRASS } else { GRASS_LIGHT });
        }
        c.set(x, 8, CAP_DARK);
    }
    for y in 9..h as i32 {
        for x in 0..w as i32 {
            let stripe = (x + y * 2) % 24 < 12;
            c.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
    c.into_sprite("base")
}

fn pipe_shade(shades: &PipeShades, x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return shades.mid;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(shades.left, shades.mid, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(shades.mid, shades.hi, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(shades.hi, shades.right, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(shades.right, shades.left, ((t - 160) * 3).min(256))
    }
}

/// Opening at the top, body narrower than the cap.
fn paint_pipe(shades: &PipeShades) -> Result<Sprite, GameError> {
    let (w, h) = PIPE_SIZE;
    let (w, h) = (w as i32, h as i32);
    let mut c = Canvas::new(PIPE_SIZE);
    let cap_h = 24;
    let inset = 2;
    for x in 0..w {
        let col = pipe_shade(shades, x, w);
        for y in 0..cap_h {
            c.set(x, y, col);
        }
        c.set(x, 0, CAP_DARK);
        c.set(x, cap_h - 1, CAP_DARK);
    }
    let body_w = w - inset * 2;
    for x in 0..body_w {
        let col = pipe_shade(shades, x, body_w);
        for y in cap_h..h {
            c.set(x + inset, y, col);
        }
    }
    c.into_sprite("pipe")
}

/// `wing` shifts the wing up (negative) or down.
fn paint_bird(shades: &BirdShades, wing: i32) -> Result<Sprite, GameError> {
    let (w, h) = PLAYER_SIZE;
    let mut c = Canvas::new(PLAYER_SIZE);
    let (cx, cy) = (w as f64 / 2.0 - 2.0, h as f64 / 2.0);
    let (rx, ry) = (13.0, 10.0);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let dx = (x as f64 + 0.5 - cx) / rx;
            let dy = (y as f64 + 0.5 - cy) / ry;
            let d = dx * dx + dy * dy;
            if d <= 1.0 {
                c.set(x, y, if dy < -0.5 { shades.hi } else { shades.body });
            }
        }
    }
    // Wing
    c.fill_rect(4, 10 + wing, 10, 5, shades.wing);
    // Eye
    c.fill_rect(20, 4, 6, 6, BIRD_EYE);
    c.fill_rect(23, 6, 2, 3, BIRD_PUPIL);
    // Beak
    c.fill_rect(24, 12, 10, 3, BIRD_BEAK_HI);
    c.fill_rect(24, 15, 9, 3, BIRD_BEAK);
    c.into_sprite("player")
}

fn paint_digit(d: usize) -> Result<Sprite, GameError> {
    let (w, h) = if d == 1 {
        (NARROW_DIGIT_WIDTH, DIGIT_SIZE.1)
    } else {
        DIGIT_SIZE
    };
    let glyph = &DIGIT_GLYPHS[d];
    let mut c = Canvas::new((w, h));
    for y in 0..h {
        for x in 0..w {
            let col = x * 3 / w;
            let row = y * 5 / h;
            if glyph[row * 3 + col] == 1 {
                let edge = x % (w / 3).max(1) == 0 || y % (h / 5).max(1) == 0;
                c.set(x as i32, y as i32, if edge { SHADOW } else { WHITE });
            }
        }
    }
    c.into_sprite("digit")
}

/// Blocky lettering: one filled block per character, spaces left open.
fn block_text(c: &mut Canvas, text: &str, y: i32, block: (i32, i32), fill: Rgb, top: Rgb) {
    let step = block.0 + 2;
    let total = text.len() as i32 * step - 2;
    let sx = (c.w as i32 - total) / 2;
    for (i, ch) in text.chars().enumerate() {
        if ch == ' ' {
            continue;
        }
        let bx = sx + i as i32 * step;
        c.fill_rect(bx - 1, y - 1, block.0 + 2, block.1 + 2, SHADOW);
        c.fill_rect(bx, y, block.0, block.1, fill);
        c.fill_rect(bx, y, block.0, 2, top);
    }
}

fn paint_welcome() -> Result<Sprite, GameError> {
    let mut c = Canvas::new(WELCOME_SIZE);
    block_text(&mut c, "GET READY", 10, (14, 22), BIRD_YELLOW.body, BIRD_YELLOW.hi);
    // Tap hint: a bird between two arrows
    c.fill_rect(82, 120, 20, 14, BIRD_YELLOW.body);
    c.fill_rect(98, 124, 8, 4, BIRD_BEAK);
    for i in 0..8 {
        c.fill_rect(62 + i, 127 - i, 2, 2 * i + 1, WHITE);
        c.fill_rect(120 - i, 127 - i, 2, 2 * i + 1, WHITE);
    }
    block_text(&mut c, "TAP", 170, (20, 20), WHITE, WHITE);
    block_text(&mut c, "SPACE UP CLICK", 220, (9, 9), WHITE, SKY_BOT);
    c.into_sprite("welcome_message")
}

fn paint_game_over() -> Result<Sprite, GameError> {
    let mut c = Canvas::new(GAME_OVER_SIZE);
    block_text(&mut c, "GAME OVER", 8, (16, 26), BANNER, BIRD_YELLOW.hi);
    c.into_sprite("game_over")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_sizes_match_the_classic_sheet() {
        let s = Sprites::generate(Theme::default()).unwrap();
        assert_eq!((s.background.width(), s.background.height()), BACKGROUND_SIZE);
        assert_eq!((s.base.width(), s.base.height()), BASE_SIZE);
        assert_eq!((s.pipe_lower.width(), s.pipe_lower.height()), PIPE_SIZE);
        assert_eq!(s.player.len(), 3);
        assert_eq!((s.player[0].width(), s.player[0].height()), PLAYER_SIZE);
        assert_eq!(s.digits.len(), 10);
        assert_eq!(s.digits[1].width(), NARROW_DIGIT_WIDTH);
        assert_eq!(s.digits[8].width(), DIGIT_SIZE.0);
        assert_eq!(s.welcome_message.width(), WELCOME_SIZE.0);
        assert_eq!(s.game_over.height(), GAME_OVER_SIZE.1);
    }

    #[test]
    fn pipes_have_transparent_shoulders() {
        let s = Sprites::generate(Theme::default()).unwrap();
        let m = s.pipe_lower.hit_mask();
        // Cap spans the full width, the body is inset.
        assert!(m.get(0, 0));
        assert!(!m.get(0, 100));
        assert!(m.get(26, 100));
        // The upper pipe opens downwards.
        let up = s.pipe_upper.hit_mask();
        assert!(up.get(0, 319));
        assert!(!up.get(0, 0));
    }

    #[test]
    fn bird_corners_are_transparent() {
        let s = Sprites::generate(Theme::default()).unwrap();
        let m = s.player[1].hit_mask();
        assert!(!m.get(0, 0));
        assert!(!m.get(0, 23));
        assert!(m.get(15, 12));
    }

    #[test]
    fn validate_rejects_missing_glyphs() {
        let mut s = Sprites::generate(Theme::default()).unwrap();
        s.digits.pop();
        assert!(matches!(s.validate(), Err(GameError::MalformedAsset { .. })));
    }

    #[test]
    fn random_theme_is_seed_stable() {
        let a = Theme::random(&mut StdRng::seed_from_u64(3));
        let b = Theme::random(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
        assert!(Sprites::randomized(&mut StdRng::seed_from_u64(9)).is_ok());
    }
}
