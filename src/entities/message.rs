use std::sync::Arc;

use crate::assets::Sprites;
use crate::entity::{Body, Entity};
use crate::sprite::Sprite;
use crate::window::Window;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Welcome,
    GameOver,
}

/// A static banner centred horizontally.
pub struct Message {
    kind: MessageKind,
    body: Body,
}

impl Message {
    pub fn welcome(window: &Window, sprites: &Sprites) -> Self {
        Self::centred(MessageKind::Welcome, window, sprites.welcome_message.clone(), 0.12)
    }

    pub fn game_over(window: &Window, sprites: &Sprites) -> Self {
        Self::centred(MessageKind::GameOver, window, sprites.game_over.clone(), 0.2)
    }

    fn centred(kind: MessageKind, window: &Window, sprite: Arc<Sprite>, top: f64) -> Self {
        let x = ((window.width() - sprite.width() as f64) / 2.0).floor();
        let y = (window.height() * top).floor();
        Message {
            kind,
            body: Body::with_sprite(sprite, x, y),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }
}

impl Entity for Message {
    fn body(&self) -> &Body {
        &self.body
    }

    fn tick(&mut self) {}
}
