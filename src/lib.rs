//! Flappy Bird in the terminal: a fixed-tick simulation, the game loop
//! that drives it from a keyboard, and a step/reset environment that
//! drives it from an agent.

pub mod assets;
pub mod audio;
pub mod clock;
pub mod config;
pub mod display;
pub mod entities;
pub mod entity;
pub mod env;
pub mod error;
pub mod game;
pub mod input;
pub mod render;
pub mod session;
pub mod sprite;
pub mod window;

pub use config::GameConfig;
pub use env::{Action, FlappyEnv, StepInfo, StepResult};
pub use error::GameError;
pub use game::{Flappy, Flow};
pub use session::Session;
pub use window::Window;
