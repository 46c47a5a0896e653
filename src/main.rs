use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reinforced_flapper::audio::{AudioSink, Silent, Speaker};
use reinforced_flapper::clock::{Clock, FrameClock};
use reinforced_flapper::display::{TerminalGuard, TerminalRenderer};
use reinforced_flapper::input::{InputSource, TerminalInput};
use reinforced_flapper::{Flappy, FlappyEnv, GameConfig, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Play with Space, Up or a mouse click.
    Human,
    /// Watch the built-in autopilot play through the step/reset environment.
    Agent,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(value_enum, default_value_t = Mode::Human)]
    mode: Mode,
    /// Seed for pipe placement and themes.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    #[arg(
        long,
        value_name = "FPS",
        default_value_t = reinforced_flapper::config::DEFAULT_FPS,
        value_parser = clap::value_parser!(u32).range(1..=240)
    )]
    fps: u32,
    /// Disable sound.
    #[arg(long)]
    mute: bool,
    /// Outline every entity with its position and size.
    #[arg(long)]
    debug: bool,
    /// Write logs here. Falls back to `FLAPPY_LOG`.
    #[arg(long, value_name = "PATH", env = "FLAPPY_LOG")]
    log_file: Option<PathBuf>,
    /// Episodes to run in agent mode.
    #[arg(long, value_name = "COUNT", default_value_t = 3)]
    episodes: u32,
}

fn init_logging(path: Option<&PathBuf>) -> Result<(), GameError> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn audio(muted: bool) -> Box<dyn AudioSink> {
    if muted {
        return Box::new(Silent);
    }
    match Speaker::open() {
        Some(speaker) => Box::new(speaker),
        None => Box::new(Silent),
    }
}

fn run_agent(
    config: &GameConfig,
    renderer: TerminalRenderer,
    input: &mut impl InputSource,
    clock: &mut impl Clock,
    episodes: u32,
) -> Result<(), GameError> {
    let mut env = FlappyEnv::new(config, renderer);
    for _ in 0..episodes {
        env.reset()?;
        let mut total = 0i64;
        loop {
            if input.poll_frame()?.quit {
                info!(reason = "input", "shutdown_requested");
                return Ok(());
            }
            let result = env.step(env.autopilot())?;
            total += i64::from(result.reward);
            env.present()?;
            clock.tick();
            if result.done {
                info!(
                    episode = env.episodes(),
                    score = result.info.score,
                    steps = result.info.frame,
                    reward = total,
                    "agent_episode_finished"
                );
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), GameError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let mut config = GameConfig::from_env();
    config.fps = cli.fps;
    config.seed = cli.seed;
    config.muted = cli.mute;
    config.debug |= cli.debug;
    info!(mode = ?cli.mode, fps = config.fps, seed = ?config.seed, "starting");

    let _guard = TerminalGuard::enter()?;
    let renderer = TerminalRenderer::new(&config.window, config.debug)?;
    let mut input = TerminalInput;
    let mut clock = FrameClock::new(config.fps);

    let result = match cli.mode {
        Mode::Human => {
            let mut game = Flappy::new(&config, renderer, input, audio(config.muted), clock);
            game.run()
        }
        Mode::Agent => run_agent(&config, renderer, &mut input, &mut clock, cli.episodes),
    };
    if let Err(error) = &result {
        warn!(error = %error, "exited_with_error");
    }
    result
}
