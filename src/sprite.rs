//! Pixel images and their opacity masks.

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const CLEAR: Rgba = Rgba(0, 0, 0, 0);

    pub const fn opaque(c: Rgb) -> Rgba {
        Rgba(c.0, c.1, c.2, 255)
    }

    pub const fn rgb(self) -> Rgb {
        Rgb(self.0, self.1, self.2)
    }

    pub const fn alpha(self) -> u8 {
        self.3
    }
}

/// One bit per pixel: set where the image is not fully transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl HitMask {
    pub fn from_pixels(width: usize, height: usize, pixels: &[Rgba]) -> Self {
        HitMask {
            width,
            height,
            bits: pixels.iter().map(|p| p.alpha() != 0).collect(),
        }
    }

    /// A mask with every pixel set.
    pub fn solid(width: usize, height: usize) -> Self {
        HitMask {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out-of-range coordinates read as transparent.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
    mask: HitMask,
}

impl Sprite {
    /// Builds a sprite from row-major pixels, rejecting mismatched buffers.
    pub fn from_pixels(
        name: &str,
        width: usize,
        height: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, GameError> {
        if width == 0 || height == 0 {
            return Err(GameError::asset(name, format!("empty image {width}x{height}")));
        }
        if pixels.len() != width * height {
            return Err(GameError::asset(
                name,
                format!(
                    "expected {} pixels for {width}x{height}, got {}",
                    width * height,
                    pixels.len()
                ),
            ));
        }
        let mask = HitMask::from_pixels(width, height, &pixels);
        Ok(Sprite {
            width,
            height,
            pixels,
            mask,
        })
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        let mask = HitMask::from_pixels(width, height, &pixels);
        Sprite {
            width,
            height,
            pixels,
            mask,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    pub fn hit_mask(&self) -> &HitMask {
        &self.mask
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn flipped_vertically(&self) -> Sprite {
        Sprite::from_fn(self.width, self.height, |x, y| {
            self.pixel(x, self.height - 1 - y)
        })
    }

    /// Counter-clockwise rotation about the centre, clipped to its own
    /// bounds. Nearest-neighbour; only used for drawing.
    pub fn rotated(&self, degrees: f64) -> Sprite {
        if degrees == 0.0 {
            return self.clone();
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let cx = (self.width as f64 - 1.0) / 2.0;
        let cy = (self.height as f64 - 1.0) / 2.0;
        Sprite::from_fn(self.width, self.height, |x, y| {
            let u = x as f64 - cx;
            let v = y as f64 - cy;
            let sx = (u * cos - v * sin + cx).round();
            let sy = (u * sin + v * cos + cy).round();
            if sx < 0.0 || sy < 0.0 || sx >= self.width as f64 || sy >= self.height as f64 {
                Rgba::CLEAR
            } else {
                self.pixel(sx as usize, sy as usize)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba(255, 0, 0, 255);

    #[test]
    fn mask_follows_alpha() {
        let s = Sprite::from_fn(3, 2, |x, y| if x == y { RED } else { Rgba::CLEAR });
        let m = s.hit_mask();
        assert!(m.get(0, 0));
        assert!(m.get(1, 1));
        assert!(!m.get(2, 0));
        assert!(!m.get(5, 5));
    }

    #[test]
    fn from_pixels_rejects_bad_buffers() {
        assert!(Sprite::from_pixels("x", 2, 2, vec![RED; 3]).is_err());
        assert!(Sprite::from_pixels("x", 0, 2, vec![]).is_err());
        let ok = Sprite::from_pixels("x", 2, 2, vec![RED; 4]).unwrap();
        assert_eq!(ok.width(), 2);
    }

    #[test]
    fn flip_swaps_rows() {
        let s = Sprite::from_fn(1, 3, |_, y| if y == 0 { RED } else { Rgba::CLEAR });
        let f = s.flipped_vertically();
        assert_eq!(f.pixel(0, 2), RED);
        assert_eq!(f.pixel(0, 0), Rgba::CLEAR);
    }

    #[test]
    fn half_turn_rotation_mirrors_both_axes() {
        let s = Sprite::from_fn(3, 3, |x, y| if x == 0 && y == 0 { RED } else { Rgba::CLEAR });
        let r = s.rotated(180.0);
        assert_eq!(r.pixel(2, 2), RED);
        assert_eq!(r.pixel(0, 0), Rgba::CLEAR);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgb(0, 100, 200);
        let b = Rgb(200, 100, 0);
        assert_eq!(Rgb::lerp(a, b, 0), a);
        assert_eq!(Rgb::lerp(a, b, 256), b);
    }
}
