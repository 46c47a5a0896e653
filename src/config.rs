use crate::window::Window;

pub const DEFAULT_FPS: u32 = 30;

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub window: Window,
    pub fps: u32,
    /// Draws entity bounding boxes with their coordinates.
    pub debug: bool,
    /// Seeds pipe placement; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub muted: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            window: Window::default(),
            fps: DEFAULT_FPS,
            debug: false,
            seed: None,
            muted: false,
        }
    }
}

impl GameConfig {
    /// Defaults with the debug overlay taken from the `DEBUG` variable.
    pub fn from_env() -> Self {
        let debug = std::env::var("DEBUG").ok();
        GameConfig {
            debug: debug_enabled(debug.as_deref()),
            ..GameConfig::default()
        }
    }
}

/// Truthiness of a `DEBUG` value.
pub fn debug_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => false,
        Some(v) => !matches!(
            v.to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_truthiness() {
        assert!(!debug_enabled(None));
        assert!(!debug_enabled(Some("")));
        assert!(!debug_enabled(Some("0")));
        assert!(!debug_enabled(Some("False")));
        assert!(!debug_enabled(Some(" off ")));
        assert!(debug_enabled(Some("1")));
        assert!(debug_enabled(Some("yes")));
        assert!(debug_enabled(Some("anything")));
    }

    #[test]
    fn defaults_match_classic_window() {
        let c = GameConfig::default();
        assert_eq!(c.fps, 30);
        assert_eq!(c.window.width(), 288.0);
        assert_eq!(c.window.height(), 512.0);
        assert!(!c.debug);
    }
}
