//! The human-facing game loop: splash, play, game over, repeat.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::assets::Sprites;
use crate::audio::{AudioSink, Sound};
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::entities::{CrashCause, PlayerMode};
use crate::entity::Entity;
use crate::error::GameError;
use crate::input::InputSource;
use crate::render::Renderer;
use crate::session::Session;
use crate::window::Window;

/// Whether the loop keeps going after a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Flappy<R, I, A, C> {
    window: Window,
    renderer: R,
    input: I,
    audio: A,
    clock: C,
    rng: StdRng,
    sessions: u64,
    last_score: Option<u32>,
}

impl<R, I, A, C> Flappy<R, I, A, C>
where
    R: Renderer,
    I: InputSource,
    A: AudioSink,
    C: Clock,
{
    pub fn new(config: &GameConfig, renderer: R, input: I, audio: A, clock: C) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Flappy {
            window: config.window,
            renderer,
            input,
            audio,
            clock,
            rng,
            sessions: 0,
            last_score: None,
        }
    }

    /// Cycles through sessions until a quit arrives. Each session draws
    /// a fresh theme.
    pub fn run(&mut self) -> Result<(), GameError> {
        loop {
            let sprites = Sprites::randomized(&mut self.rng)?;
            let mut session = Session::new(&self.window, &sprites, &mut self.rng)?;
            self.sessions += 1;
            info!(session = self.sessions, "session_started");

            if self.splash(&mut session)? == Flow::Quit
                || self.play(&mut session)? == Flow::Quit
                || self.game_over(&mut session)? == Flow::Quit
            {
                info!(reason = "input", "shutdown_requested");
                return Ok(());
            }
        }
    }

    fn splash(&mut self, s: &mut Session) -> Result<Flow, GameError> {
        s.player.set_mode(PlayerMode::ShmIdle);
        loop {
            let input = self.input.poll_frame()?;
            if input.quit {
                return Ok(Flow::Quit);
            }
            if input.tapped {
                self.audio.play(Sound::Swoosh);
                debug!("splash_dismissed");
                return Ok(Flow::Continue);
            }
            s.floor.tick();
            s.player.tick();
            s.draw_splash(&mut self.renderer);
            self.end_frame()?;
        }
    }

    fn play(&mut self, s: &mut Session) -> Result<Flow, GameError> {
        s.score.reset();
        s.player.set_mode(PlayerMode::Normal);
        loop {
            if s.player.collided(&s.pipes, &s.floor) {
                self.last_score = Some(s.score.value());
                info!(
                    score = s.score.value(),
                    cause = ?s.player.crash_cause(),
                    "player_crashed"
                );
                return Ok(Flow::Continue);
            }

            for _ in 0..s.score_crossings() {
                self.audio.play(Sound::Point);
            }

            let input = self.input.poll_frame()?;
            if input.quit {
                return Ok(Flow::Quit);
            }
            if input.tapped && s.player.flap() {
                self.audio.play(Sound::Wing);
            }

            s.advance();
            s.draw_play(&mut self.renderer);
            self.end_frame()?;
        }
    }

    fn game_over(&mut self, s: &mut Session) -> Result<Flow, GameError> {
        s.player.set_mode(PlayerMode::Crash);
        s.pipes.stop();
        s.floor.stop();
        self.audio.play(Sound::Hit);
        if s.player.crash_cause() == Some(CrashCause::Pipe) {
            self.audio.play(Sound::Die);
        }

        loop {
            let input = self.input.poll_frame()?;
            if input.quit {
                return Ok(Flow::Quit);
            }
            if input.tapped && s.player.landed(&s.floor) {
                debug!("game_over_dismissed");
                return Ok(Flow::Continue);
            }
            s.pipes.tick();
            s.player.tick();
            s.draw_game_over(&mut self.renderer);
            self.end_frame()?;
        }
    }

    fn end_frame(&mut self) -> Result<(), GameError> {
        self.renderer.present()?;
        self.clock.tick();
        Ok(())
    }

    /// Sessions started so far, including the current one.
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    /// Score of the most recently finished round.
    pub fn last_score(&self) -> Option<u32> {
        self.last_score
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Theme;
    use crate::clock::ManualClock;
    use crate::input::{InputEvent, Key, ScriptedInput};
    use crate::render::Canvas;

    #[derive(Default)]
    struct Tape(Vec<Sound>);

    impl AudioSink for Tape {
        fn play(&mut self, sound: Sound) {
            self.0.push(sound);
        }
    }

    type TestGame = Flappy<Canvas, ScriptedInput, Tape, ManualClock>;

    fn game(script: ScriptedInput) -> TestGame {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        };
        Flappy::new(
            &config,
            Canvas::new(&config.window, false),
            script,
            Tape::default(),
            ManualClock::default(),
        )
    }

    fn session() -> Session {
        let sprites = Sprites::generate(Theme::default()).unwrap();
        Session::new(&Window::default(), &sprites, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn quit_during_splash_ends_the_loop() {
        let mut g = game(ScriptedInput::default().idle(3));
        g.run().unwrap();
        assert_eq!(g.sessions(), 1);
        assert_eq!(g.clock().ticks(), 3);
        assert_eq!(g.renderer().frames_presented(), 3);
        assert!(g.audio().0.is_empty());
    }

    #[test]
    fn splash_bobs_the_player() {
        let mut g = game(ScriptedInput::default().tap_after(10));
        let mut s = session();
        let y = s.player.body().y;
        assert_eq!(g.splash(&mut s).unwrap(), Flow::Continue);
        assert_ne!(s.player.body().y, y);
        assert_eq!(g.audio().0, vec![Sound::Swoosh]);
    }

    #[test]
    fn escape_quits_mid_play() {
        let script = ScriptedInput::new([vec![], vec![InputEvent::KeyPress(Key::Escape)]]);
        let mut g = game(script);
        let mut s = session();
        assert_eq!(g.play(&mut s).unwrap(), Flow::Quit);
        assert_eq!(s.player.mode(), PlayerMode::Normal);
    }

    #[test]
    fn taps_before_landing_are_ignored() {
        let script = ScriptedInput::default().tap_after(0).tap_after(0).idle(40).tap_after(0);
        let mut g = game(script);
        let mut s = session();
        s.player.set_mode(PlayerMode::Normal);
        assert!(!s.player.landed(&s.floor));

        assert_eq!(g.game_over(&mut s).unwrap(), Flow::Continue);
        assert!(s.player.landed(&s.floor));
        // Two early taps plus forty idle frames; the last tap is consumed.
        assert_eq!(g.clock().ticks(), 42);
        assert_eq!(g.input().remaining(), 0);
    }

    #[test]
    fn pipe_crash_plays_hit_then_die() {
        let mut g = game(ScriptedInput::default());
        let mut s = session();
        s.player.set_mode(PlayerMode::Normal);
        let mut pipes_hit = false;
        // Flapping constantly pins the player to the top, where every
        // upper pipe reaches.
        for _ in 0..200 {
            if s.player.collided(&s.pipes, &s.floor) {
                pipes_hit = s.player.crash_cause() == Some(CrashCause::Pipe);
                break;
            }
            s.pipes.tick();
            s.player.flap();
            s.player.tick();
        }
        assert!(pipes_hit);
        assert_eq!(g.game_over(&mut s).unwrap(), Flow::Quit);
        assert_eq!(g.audio().0, vec![Sound::Hit, Sound::Die]);
    }
}
