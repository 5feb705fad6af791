use crate::backend::{Backend, Texture};
use crate::config::Tuning;
use crate::field::{Motion, ScrollField};
use crate::frame::FrameContext;
use crate::geometry::Rect;

/// Coins rolling along the top of the ground.
#[derive(Clone, Debug)]
pub struct Collectibles {
    pub field: ScrollField,
    coin: Texture,
}

impl Collectibles {
    pub fn new(tuning: &Tuning, coin: Texture) -> Self {
        Self {
            field: ScrollField::new(tuning.max_collectibles),
            coin,
        }
    }

    pub fn update(&mut self, frame: &FrameContext, ground: Rect, tuning: &Tuning) {
        let coin = self.coin;
        let motion = Motion {
            speed: tuning.collectible_speed,
            spawn_interval: tuning.collectible_spawn_interval,
        };
        let spawned = self.field.advance(frame.dt, motion, || {
            Rect::new(
                frame.screen_width + coin.width,
                ground.y - coin.height,
                coin.width,
                coin.height,
            )
        });
        if let Some(slot) = spawned {
            log::trace!("collectible spawned in slot {slot}");
        }
    }

    pub fn rects(&self) -> &[Rect] {
        self.field.slots()
    }

    /// The player retires what it touches, so it needs the slots mutably.
    pub fn rects_mut(&mut self) -> &mut [Rect] {
        self.field.slots_mut()
    }

    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        for rect in self.field.active() {
            backend.draw_sprite(self.coin, rect.x, rect.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Sprite;
    use crate::ground::ground_rect;

    #[test]
    fn coins_sit_on_the_ground() {
        let tuning = Tuning::default();
        let frame = FrameContext::new(1600.0, 900.0, tuning.collectible_spawn_interval);
        let ground = ground_rect(&frame, &tuning);
        let mut coins = Collectibles::new(&tuning, Texture::new(Sprite::Coin, 40.0, 40.0));

        coins.update(&frame, ground, &tuning);
        assert_eq!(coins.rects()[0], Rect::new(1640.0, 680.0, 40.0, 40.0));
        assert_eq!(coins.field.capacity(), 40);
    }
}
