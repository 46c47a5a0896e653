//! Input events and the sources that produce them.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Up,
    Char(char),
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyPress(Key),
    PointerDown,
}

impl InputEvent {
    pub fn is_quit(&self) -> bool {
        matches!(self, InputEvent::Quit | InputEvent::KeyPress(Key::Escape))
    }

    /// Space, Up, or any click/touch.
    pub fn is_tap(&self) -> bool {
        matches!(
            self,
            InputEvent::KeyPress(Key::Space | Key::Up) | InputEvent::PointerDown
        )
    }
}

/// What one frame's worth of events amounts to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub quit: bool,
    pub tapped: bool,
}

impl FrameInput {
    pub fn from_events(events: &[InputEvent]) -> Self {
        let mut input = FrameInput::default();
        for e in events {
            if e.is_quit() {
                input.quit = true;
                break;
            }
            input.tapped |= e.is_tap();
        }
        input
    }
}

pub trait InputSource {
    /// Drains the events that arrived since the last poll. Never blocks.
    fn poll(&mut self) -> io::Result<Vec<InputEvent>>;

    fn poll_frame(&mut self) -> io::Result<FrameInput> {
        Ok(FrameInput::from_events(&self.poll()?))
    }
}

impl<I: InputSource + ?Sized> InputSource for Box<I> {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        (**self).poll()
    }
}

// ── Terminal ────────────────────────────────────────────────────────────────

/// Keyboard and mouse events from the terminal.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    fn translate(event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => Some(match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
                KeyCode::Char('q') => InputEvent::Quit,
                KeyCode::Esc => InputEvent::KeyPress(Key::Escape),
                KeyCode::Char(' ') => InputEvent::KeyPress(Key::Space),
                KeyCode::Up => InputEvent::KeyPress(Key::Up),
                KeyCode::Char(c) => InputEvent::KeyPress(Key::Char(c)),
                _ => InputEvent::KeyPress(Key::Other),
            }),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(_),
                ..
            }) => Some(InputEvent::PointerDown),
            _ => None,
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(e) = Self::translate(event::read()?) {
                events.push(e);
            }
        }
        Ok(events)
    }
}

// ── Scripted ────────────────────────────────────────────────────────────────

/// Replays a fixed list of per-frame event batches, then quits.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
    polls: u64,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        ScriptedInput {
            frames: frames.into_iter().collect(),
            polls: 0,
        }
    }

    /// `idle` empty frames followed by one tap.
    pub fn tap_after(mut self, idle: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(Vec::new(), idle));
        self.frames.push_back(vec![InputEvent::KeyPress(Key::Space)]);
        self
    }

    pub fn idle(mut self, frames: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(Vec::new(), frames));
        self
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        self.polls += 1;
        Ok(self.frames.pop_front().unwrap_or_else(|| vec![InputEvent::Quit]))
    }
}
