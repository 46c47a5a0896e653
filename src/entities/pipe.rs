use std::collections::VecDeque;
use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::trace;

use crate::assets::Sprites;
use crate::entity::{Body, Entity};
use crate::error::GameError;
use crate::render::Renderer;
use crate::sprite::Sprite;
use crate::window::Window;

pub const PIPE_VELOCITY: f64 = -5.0;
/// Vertical opening between an upper and a lower pipe.
pub const PIPE_GAP: f64 = 120.0;

pub struct Pipe {
    body: Body,
    vel_x: f64,
    prev_x: f64,
}

impl Pipe {
    fn new(sprite: Arc<Sprite>, x: f64, y: f64, vel_x: f64) -> Self {
        Pipe {
            body: Body::with_sprite(sprite, x, y),
            vel_x,
            prev_x: x,
        }
    }

    pub fn velocity(&self) -> f64 {
        self.vel_x
    }

    /// Right edge, which the player passes to score.
    pub fn trailing_edge(&self) -> f64 {
        self.body.x + self.body.w()
    }

    /// Right edge before the last tick.
    pub fn prev_trailing_edge(&self) -> f64 {
        self.prev_x + self.body.w()
    }

    fn place(&mut self, x: f64) {
        self.body.x = x;
        self.prev_x = x;
    }
}

impl Entity for Pipe {
    fn body(&self) -> &Body {
        &self.body
    }

    fn tick(&mut self) {
        self.prev_x = self.body.x;
        self.body.x += self.vel_x;
    }
}

/// An upper and a lower pipe sharing an x position.
pub struct PipePair {
    pub upper: Pipe,
    pub lower: Pipe,
}

impl PipePair {
    pub fn x(&self) -> f64 {
        self.upper.body.x
    }

    /// Top of the opening.
    pub fn gap_y(&self) -> f64 {
        self.upper.body.y + self.upper.body.h()
    }

    fn place(&mut self, x: f64) {
        self.upper.place(x);
        self.lower.place(x);
    }

    fn tick(&mut self) {
        self.upper.tick();
        self.lower.tick();
    }

    fn stop(&mut self) {
        self.upper.vel_x = 0.0;
        self.lower.vel_x = 0.0;
    }
}

/// Scrolling obstacles, oldest pair at the front.
pub struct PipeField {
    pairs: VecDeque<PipePair>,
    upper_sprite: Arc<Sprite>,
    lower_sprite: Arc<Sprite>,
    window_width: f64,
    gap: f64,
    gap_floor: f64,
    gap_span: i64,
    vel_x: f64,
    rng: StdRng,
}

impl PipeField {
    pub fn new(window: &Window, sprites: &Sprites, rng: StdRng) -> Result<Self, GameError> {
        Self::with_gap(window, sprites, PIPE_GAP, rng)
    }

    /// Fails when the opening cannot be placed inside the middle 60% of
    /// the viewport.
    pub fn with_gap(
        window: &Window,
        sprites: &Sprites,
        gap: f64,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        let vh = window.viewport_height();
        let gap_span = (vh * 0.6 - gap).floor() as i64;
        if gap_span <= 0 {
            return Err(GameError::PipeGapOutOfRange {
                viewport_height: vh,
                gap,
            });
        }
        let mut field = PipeField {
            pairs: VecDeque::new(),
            upper_sprite: sprites.pipe_upper.clone(),
            lower_sprite: sprites.pipe_lower.clone(),
            window_width: window.width(),
            gap,
            gap_floor: (vh * 0.2).floor(),
            gap_span,
            vel_x: PIPE_VELOCITY,
            rng,
        };
        field.spawn_initial();
        Ok(field)
    }

    fn spawn_initial(&mut self) {
        let w = self.lower_sprite.width() as f64;
        let first_x = self.window_width + w * 3.0;
        let mut first = self.make_pair();
        first.place(first_x);
        let mut second = self.make_pair();
        second.place(first_x + w * 3.5);
        self.pairs.push_back(first);
        self.pairs.push_back(second);
    }

    fn make_pair(&mut self) -> PipePair {
        let gap_y = self.gap_floor + self.rng.gen_range(0..self.gap_span) as f64;
        let x = self.window_width + 10.0;
        let upper_h = self.upper_sprite.height() as f64;
        PipePair {
            upper: Pipe::new(self.upper_sprite.clone(), x, gap_y - upper_h, self.vel_x),
            lower: Pipe::new(self.lower_sprite.clone(), x, gap_y + self.gap, self.vel_x),
        }
    }

    /// True once the newest pair has pulled far enough from the right edge.
    pub fn can_spawn(&self) -> bool {
        match self.pairs.back() {
            None => true,
            Some(last) => {
                let w = last.upper.body.w();
                self.window_width - (last.x() + w) > w * 2.5
            }
        }
    }

    pub fn tick(&mut self) {
        if self.can_spawn() {
            self.spawn();
        }
        for pair in &mut self.pairs {
            pair.tick();
        }
        while let Some(front) = self.pairs.front() {
            if front.x() < -front.upper.body.w() {
                self.pairs.pop_front();
                trace!(remaining = self.pairs.len(), "pipe_removed");
            } else {
                break;
            }
        }
        // Narrow windows drop the last pair before the threshold is met.
        if self.pairs.is_empty() {
            self.spawn();
        }
    }

    fn spawn(&mut self) {
        let pair = self.make_pair();
        trace!(x = pair.x(), gap_y = pair.gap_y(), "pipe_spawned");
        self.pairs.push_back(pair);
    }

    /// Freezes every pipe, including any spawned afterwards.
    pub fn stop(&mut self) {
        self.vel_x = 0.0;
        for pair in &mut self.pairs {
            pair.stop();
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for pair in &self.pairs {
            pair.upper.render(renderer);
            pair.lower.render(renderer);
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = &PipePair> {
        self.pairs.iter()
    }

    pub fn upper(&self) -> impl Iterator<Item = &Pipe> {
        self.pairs.iter().map(|p| &p.upper)
    }

    pub fn lower(&self) -> impl Iterator<Item = &Pipe> {
        self.pairs.iter().map(|p| &p.lower)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Theme;
    use rand::SeedableRng;

    fn field(seed: u64) -> PipeField {
        let sprites = Sprites::generate(Theme::default()).unwrap();
        PipeField::new(&Window::default(), &sprites, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn initial_pairs_are_staggered_off_screen() {
        let f = field(1);
        let xs: Vec<f64> = f.pairs().map(|p| p.x()).collect();
        assert_eq!(xs, vec![444.0, 626.0]);
        for pair in f.pairs() {
            assert_eq!(pair.upper.body().x, pair.lower.body().x);
        }
    }

    #[test]
    fn gap_is_fixed_and_inside_the_band() {
        let mut f = field(7);
        let vh = Window::default().viewport_height();
        for _ in 0..400 {
            f.tick();
            for pair in f.pairs() {
                let gap_y = pair.gap_y();
                assert!(gap_y >= vh * 0.2 - 1.0);
                assert!(gap_y <= vh * 0.8 - PIPE_GAP);
                assert_eq!(pair.lower.body().y - gap_y, PIPE_GAP);
            }
        }
    }

    #[test]
    fn sides_stay_aligned_for_any_number_of_ticks() {
        let mut f = field(2);
        for _ in 0..1000 {
            f.tick();
            assert_eq!(f.upper().count(), f.lower().count());
            assert!(f.len() >= 1);
        }
    }

    #[test]
    fn narrow_window_never_runs_out_of_pipes() {
        let sprites = Sprites::generate(Theme::default()).unwrap();
        let window = Window::new(100.0, 400.0).unwrap();
        let mut f = PipeField::new(&window, &sprites, StdRng::seed_from_u64(8)).unwrap();
        let mut spawned_at_edge = false;
        for tick in 0..1000 {
            f.tick();
            assert!(f.len() >= 1, "field empty after tick {tick}");
            assert_eq!(f.upper().count(), f.lower().count());
            spawned_at_edge |= f.pairs().any(|p| p.x() == 110.0);
        }
        assert!(spawned_at_edge);
    }

    #[test]
    fn spawns_exactly_at_the_threshold() {
        let mut f = field(3);
        loop {
            let before = f.len();
            let expect_spawn = f.can_spawn();
            let last = f.pairs().last().map(|p| p.x()).unwrap();
            assert_eq!(expect_spawn, 288.0 - (last + 52.0) > 52.0 * 2.5);
            f.tick();
            if expect_spawn {
                assert_eq!(f.pairs().last().map(|p| p.x()), Some(298.0 - 5.0));
                assert!(f.len() >= before);
                break;
            }
        }
    }

    #[test]
    fn fifo_order_is_kept() {
        let mut f = field(4);
        for _ in 0..600 {
            f.tick();
            let xs: Vec<f64> = f.pairs().map(|p| p.x()).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]), "{xs:?}");
        }
    }

    #[test]
    fn off_screen_pairs_are_dropped_from_the_front() {
        let mut f = field(5);
        for _ in 0..600 {
            f.tick();
            assert!(f.pairs().all(|p| p.x() >= -52.0));
        }
    }

    #[test]
    fn stop_freezes_everything() {
        let mut f = field(6);
        f.tick();
        f.stop();
        let xs: Vec<f64> = f.pairs().map(|p| p.x()).collect();
        for _ in 0..50 {
            f.tick();
        }
        let after: Vec<f64> = f.pairs().map(|p| p.x()).collect();
        assert_eq!(xs, after);
        assert!(f.upper().all(|p| p.velocity() == 0.0));
    }

    #[test]
    fn oversized_gap_fails_fast() {
        let sprites = Sprites::generate(Theme::default()).unwrap();
        let r = PipeField::with_gap(&Window::default(), &sprites, 300.0, StdRng::seed_from_u64(0));
        assert!(matches!(r, Err(GameError::PipeGapOutOfRange { .. })));
    }

    #[test]
    fn same_seed_same_layout() {
        let (mut a, mut b) = (field(11), field(11));
        for _ in 0..200 {
            a.tick();
            b.tick();
        }
        let ga: Vec<f64> = a.pairs().map(|p| p.gap_y()).collect();
        let gb: Vec<f64> = b.pairs().map(|p| p.gap_y()).collect();
        assert_eq!(ga, gb);
    }
}
