//! Step/reset wrapper around a session for automated play.
//!
//! One action per tick: flap or do nothing. The observation is the frame
//! drawn for that tick, and the reward is [`REWARD_ALIVE`] for every tick
//! survived or [`REWARD_CRASH`] on the tick that ends the episode.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::assets::Sprites;
use crate::config::GameConfig;
use crate::entities::PlayerMode;
use crate::entity::Entity;
use crate::error::GameError;
use crate::input::InputSource;
use crate::render::{Frame, Observe, Renderer};
use crate::session::Session;
use crate::window::Window;

pub const ACTION_COUNT: usize = 2;
pub const REWARD_ALIVE: i32 = 1;
pub const REWARD_CRASH: i32 = -100;

/// Distance above the lower pipe the autopilot keeps the player's feet.
const AUTOPILOT_MARGIN: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Idle = 0,
    Flap = 1,
}

impl TryFrom<i64> for Action {
    type Error = GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Idle),
            1 => Ok(Action::Flap),
            other => Err(GameError::InvalidAction(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepInfo {
    pub score: u32,
    /// Steps taken this episode, including this one.
    pub frame: u64,
}

#[derive(Clone, Debug)]
pub struct StepResult {
    pub observation: Frame,
    pub reward: i32,
    pub done: bool,
    pub info: StepInfo,
}

pub struct FlappyEnv<R> {
    window: Window,
    renderer: R,
    rng: StdRng,
    session: Option<Session>,
    done: bool,
    frame: u64,
    episodes: u64,
}

impl<R: Renderer + Observe> FlappyEnv<R> {
    pub fn new(config: &GameConfig, renderer: R) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        FlappyEnv {
            window: config.window,
            renderer,
            rng,
            session: None,
            done: false,
            frame: 0,
            episodes: 0,
        }
    }

    /// Starts a new episode with the player already in flight.
    pub fn reset(&mut self) -> Result<Frame, GameError> {
        let sprites = Sprites::randomized(&mut self.rng)?;
        let mut session = Session::new(&self.window, &sprites, &mut self.rng)?;
        session.score.reset();
        session.player.set_mode(PlayerMode::Normal);
        session.draw_play(&mut self.renderer);

        self.session = Some(session);
        self.done = false;
        self.frame = 0;
        self.episodes += 1;
        debug!(episode = self.episodes, "episode_reset");
        Ok(self.renderer.observe())
    }

    pub fn step(&mut self, action: Action) -> Result<StepResult, GameError> {
        let s = self.session.as_mut().ok_or(GameError::NotReset)?;
        if self.done {
            return Err(GameError::EpisodeDone);
        }

        if action == Action::Flap {
            s.player.flap();
        }
        s.advance();
        s.draw_play(&mut self.renderer);
        let observation = self.renderer.observe();

        let reward = if s.player.collided(&s.pipes, &s.floor) {
            self.done = true;
            s.player.set_mode(PlayerMode::Crash);
            s.pipes.stop();
            s.floor.stop();
            info!(
                episode = self.episodes,
                score = s.score.value(),
                steps = self.frame + 1,
                cause = ?s.player.crash_cause(),
                "episode_done"
            );
            REWARD_CRASH
        } else {
            REWARD_ALIVE
        };
        s.score_crossings();
        self.frame += 1;

        Ok(StepResult {
            observation,
            reward,
            done: self.done,
            info: StepInfo {
                score: s.score.value(),
                frame: self.frame,
            },
        })
    }

    /// Shows the last frame, then lets a person steer: a tap flaps, and
    /// the world advances one idle tick unless the episode is over.
    /// Returns `false` once a quit arrives.
    pub fn render(&mut self, input: &mut impl InputSource) -> Result<bool, GameError> {
        self.present()?;

        let events = input.poll_frame()?;
        if events.quit {
            return Ok(false);
        }
        if events.tapped && !self.done {
            self.step(Action::Flap)?;
        }
        if !self.done {
            self.step(Action::Idle)?;
        }
        Ok(true)
    }

    /// Shows the frame drawn by the last `reset` or `step`.
    pub fn present(&mut self) -> Result<(), GameError> {
        if self.session.is_none() {
            return Err(GameError::NotReset);
        }
        self.renderer.present()?;
        Ok(())
    }

    /// Flaps whenever the player sinks to within a margin of the next
    /// opening's lower edge.
    pub fn autopilot(&self) -> Action {
        let Some(s) = &self.session else {
            return Action::Idle;
        };
        let player = s.player.body();
        let next = s
            .pipes
            .lower()
            .find(|pipe| pipe.trailing_edge() >= player.x);
        let Some(pipe) = next else {
            return Action::Idle;
        };
        if player.y + player.h() > pipe.body().y - AUTOPILOT_MARGIN {
            Action::Flap
        } else {
            Action::Idle
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score.value())
    }

    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    /// `(height, width, 3)`, the shape of every observation.
    pub fn observation_shape(&self) -> (usize, usize, usize) {
        (self.window.height() as usize, self.window.width() as usize, 3)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Canvas;

    fn env() -> FlappyEnv<Canvas> {
        let config = GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        };
        FlappyEnv::new(&config, Canvas::new(&config.window, false))
    }

    #[test]
    fn actions_from_integers() {
        assert_eq!(Action::try_from(0).unwrap(), Action::Idle);
        assert_eq!(Action::try_from(1).unwrap(), Action::Flap);
        assert!(matches!(Action::try_from(2), Err(GameError::InvalidAction(2))));
        assert!(matches!(Action::try_from(-1), Err(GameError::InvalidAction(-1))));
    }

    #[test]
    fn stepping_needs_a_reset() {
        let mut e = env();
        assert!(matches!(e.step(Action::Idle), Err(GameError::NotReset)));
        let mut input = crate::input::ScriptedInput::default();
        assert!(matches!(e.render(&mut input), Err(GameError::NotReset)));
    }

    #[test]
    fn reset_observes_a_full_frame() {
        let mut e = env();
        let obs = e.reset().unwrap();
        assert_eq!(obs.shape(), (512, 288, 3));
        assert_eq!(obs.shape(), e.observation_shape());
        assert_eq!(e.score(), 0);
        assert!(!e.is_done());
    }

    #[test]
    fn stepping_after_done_is_an_error_until_reset() {
        let mut e = env();
        e.reset().unwrap();
        while !e.step(Action::Idle).unwrap().done {}
        assert!(matches!(e.step(Action::Flap), Err(GameError::EpisodeDone)));
        e.reset().unwrap();
        assert!(e.step(Action::Idle).is_ok());
        assert_eq!(e.episodes(), 2);
    }
}
