use crate::assets::Sprites;
use crate::entity::{Body, Entity};

pub struct Background {
    body: Body,
}

impl Background {
    pub fn new(sprites: &Sprites) -> Self {
        Background {
            body: Body::with_sprite(sprites.background.clone(), 0.0, 0.0),
        }
    }
}

impl Entity for Background {
    fn body(&self) -> &Body {
        &self.body
    }

    fn tick(&mut self) {}
}
