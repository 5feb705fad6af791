use rand::Rng;

use crate::backend::{BROWN, Backend, HOLE_GRAY, Texture};
use crate::config::Tuning;
use crate::field::{Motion, ScrollField};
use crate::frame::FrameContext;
use crate::geometry::Rect;

/// The strip the player runs on, with holes scrolling through it.
#[derive(Clone, Debug)]
pub struct Ground {
    pub rect: Rect,
    pub holes: ScrollField,
    tile: Texture,
}

impl Ground {
    pub fn new(tuning: &Tuning, tile: Texture) -> Self {
        Self {
            rect: Rect::ZERO,
            holes: ScrollField::new(tuning.max_holes),
            tile,
        }
    }

    pub fn update(&mut self, frame: &FrameContext, tuning: &Tuning, rng: &mut impl Rng) {
        self.rect = ground_rect(frame, tuning);

        let ground = self.rect;
        let motion = Motion {
            speed: tuning.hole_speed,
            spawn_interval: tuning.hole_spawn_interval,
        };
        let spawned = self.holes.advance(frame.dt, motion, || {
            let width = rng.gen_range(tuning.hole_min_width..=tuning.hole_max_width);
            Rect::new(frame.screen_width + width, ground.y, width, ground.height)
        });
        if let Some(slot) = spawned {
            log::trace!("hole spawned in slot {slot}: {:?}", self.holes.slots()[slot]);
        }
    }

    pub fn hole_rects(&self) -> &[Rect] {
        self.holes.slots()
    }

    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        backend.draw_rect(self.rect, BROWN);
        if self.tile.width > 0.0 {
            let mut x = 0.0;
            while x < self.rect.width {
                backend.draw_sprite(self.tile, x, self.rect.y);
                x += self.tile.width;
            }
        }
        for hole in self.holes.active() {
            backend.draw_rect(*hole, HOLE_GRAY);
        }
    }
}

/// Full-width strip anchored to the bottom of the screen.
pub fn ground_rect(frame: &FrameContext, tuning: &Tuning) -> Rect {
    let height = frame.screen_height * tuning.ground_height_fraction;
    Rect::new(0.0, frame.screen_height - height, frame.screen_width, height)
}

/// Live holes whose span meets `rect`'s, ignoring height. Retired (zeroed)
/// slots never match.
pub fn holes_under<'a>(
    holes: &'a [Rect],
    rect: &'a Rect,
) -> impl Iterator<Item = &'a Rect> + 'a {
    holes
        .iter()
        .filter(move |hole| !hole.is_empty() && rect.corridor_overlaps(hole))
}
