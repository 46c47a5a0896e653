//! Concrete entities of a game session.

mod background;
mod floor;
mod message;
mod pipe;
mod player;
mod score;

pub use background::Background;
pub use floor::Floor;
pub use message::{Message, MessageKind};
pub use pipe::{PIPE_GAP, PIPE_VELOCITY, Pipe, PipeField, PipePair};
pub use player::{CrashCause, Player, PlayerMode};
pub use score::Score;
