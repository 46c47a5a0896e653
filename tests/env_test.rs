use reinforced_flapper::env::{ACTION_COUNT, REWARD_ALIVE, REWARD_CRASH};
use reinforced_flapper::input::{InputEvent, ScriptedInput};
use reinforced_flapper::render::Canvas;
use reinforced_flapper::{Action, FlappyEnv, GameConfig, GameError};

fn env(seed: u64) -> FlappyEnv<Canvas> {
    let config = GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    };
    FlappyEnv::new(&config, Canvas::new(&config.window, false))
}

#[test]
fn two_discrete_actions() {
    assert_eq!(ACTION_COUNT, 2);
    let actions: Vec<Action> = (0..ACTION_COUNT as i64)
        .map(|a| Action::try_from(a).unwrap())
        .collect();
    assert_eq!(actions, vec![Action::Idle, Action::Flap]);
    assert!(matches!(Action::try_from(7), Err(GameError::InvalidAction(7))));
}

#[test]
fn idle_agent_is_rewarded_until_it_hits_the_ground() {
    let mut e = env(1);
    let first = e.reset().unwrap();
    assert_eq!(first.shape(), (512, 288, 3));

    let mut rewards = Vec::new();
    loop {
        let r = e.step(Action::Idle).unwrap();
        assert_eq!(r.observation.shape(), (512, 288, 3));
        rewards.push(r.reward);
        if r.done {
            assert_eq!(r.info.score, 0);
            assert_eq!(r.info.frame, rewards.len() as u64);
            break;
        }
        assert!(rewards.len() < 100, "player never landed");
    }

    let (last, alive) = rewards.split_last().unwrap();
    assert_eq!(*last, REWARD_CRASH);
    assert!(alive.iter().all(|&r| r == REWARD_ALIVE));
    assert!(e.is_done());
    assert!(matches!(e.step(Action::Flap), Err(GameError::EpisodeDone)));
}

#[test]
fn score_reads_one_after_the_first_pair() {
    let mut e = env(5);
    e.reset().unwrap();
    assert_eq!(e.score(), 0);

    let mut steps = 0;
    while e.score() == 0 {
        let r = e.step(e.autopilot()).unwrap();
        steps += 1;
        assert!(!r.done, "autopilot crashed at step {steps}");
    }
    // The first trailing edge starts at 496 and closes 5px a tick on a
    // player centred at 74.
    assert_eq!(steps, 85);
    assert_eq!(e.score(), 1);
}

#[test]
fn same_seed_and_actions_give_the_same_episode() {
    let (mut a, mut b) = (env(42), env(42));
    assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    for i in 0..60 {
        let action = if i % 6 == 0 { Action::Flap } else { Action::Idle };
        let (ra, rb) = (a.step(action), b.step(action));
        match (ra, rb) {
            (Ok(ra), Ok(rb)) => {
                assert_eq!(ra.observation, rb.observation);
                assert_eq!(ra.reward, rb.reward);
                assert_eq!(ra.info, rb.info);
            }
            (Err(GameError::EpisodeDone), Err(GameError::EpisodeDone)) => break,
            other => panic!("episodes diverged: {other:?}"),
        }
    }
}

#[test]
fn reset_starts_a_fresh_episode() {
    let mut e = env(3);
    e.reset().unwrap();
    while !e.step(Action::Idle).unwrap().done {}
    e.reset().unwrap();
    assert!(!e.is_done());
    assert_eq!(e.score(), 0);
    let r = e.step(Action::Idle).unwrap();
    assert_eq!(r.info.frame, 1);
    assert_eq!(r.reward, REWARD_ALIVE);
    assert_eq!(e.episodes(), 2);
}

#[test]
fn render_lets_a_person_play() {
    let mut e = env(8);
    e.reset().unwrap();
    let mut input = ScriptedInput::default().idle(1).tap_after(0);

    // An idle frame advances one tick, a tapped frame two.
    assert!(e.render(&mut input).unwrap());
    assert!(e.render(&mut input).unwrap());
    assert_eq!(e.renderer().frames_presented(), 2);
    assert_eq!(e.step(Action::Idle).unwrap().info.frame, 4);

    // Script exhausted: a quit arrives.
    assert!(!e.render(&mut input).unwrap());

    let mut quit = ScriptedInput::new([vec![InputEvent::Quit]]);
    assert!(!e.render(&mut quit).unwrap());
}
