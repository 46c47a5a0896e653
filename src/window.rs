use crate::error::GameError;

/// Share of the window height that is sky; the rest is the ground strip.
pub const VIEWPORT_SHARE: f64 = 0.79;

/// Logical window and the playable viewport above the ground strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    width: f64,
    height: f64,
}

impl Window {
    pub fn new(width: f64, height: f64) -> Result<Self, GameError> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(GameError::InvalidWindow { width, height });
        }
        Ok(Window { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn viewport_width(&self) -> f64 {
        self.width
    }

    pub fn viewport_height(&self) -> f64 {
        self.height * VIEWPORT_SHARE
    }

    pub fn viewport_ratio(&self) -> f64 {
        self.viewport_width() / self.viewport_height()
    }
}

impl Default for Window {
    fn default() -> Self {
        Window {
            width: 288.0,
            height: 512.0,
        }
    }
}
