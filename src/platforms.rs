use rand::Rng;

use crate::backend::{Backend, PlatformAssets};
use crate::config::Tuning;
use crate::field::{Motion, ScrollField};
use crate::frame::FrameContext;
use crate::geometry::Rect;

/// Floating ledges the player can land on.
#[derive(Clone, Debug)]
pub struct Platforms {
    pub field: ScrollField,
    assets: PlatformAssets,
}

impl Platforms {
    pub fn new(tuning: &Tuning, assets: PlatformAssets) -> Self {
        Self {
            field: ScrollField::new(tuning.max_platforms),
            assets,
        }
    }

    pub fn height(&self) -> f32 {
        self.assets.left.height
    }

    pub fn update(
        &mut self,
        frame: &FrameContext,
        ground: Rect,
        player_height: f32,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) {
        let height = self.height();
        let motion = Motion {
            speed: tuning.platform_speed,
            spawn_interval: tuning.platform_spawn_interval,
        };
        let spawned = self.field.advance(frame.dt, motion, || {
            let width = rng.gen_range(tuning.platform_min_width..=tuning.platform_max_width);
            let (from, to) = spawn_band(frame, ground, height, player_height, tuning);
            let y = if from < to { rng.gen_range(from..=to) } else { to };
            Rect::new(frame.screen_width + width, y, width, height)
        });
        if let Some(slot) = spawned {
            log::trace!("platform spawned in slot {slot}: {:?}", self.field.slots()[slot]);
        }
    }

    pub fn rects(&self) -> &[Rect] {
        self.field.slots()
    }

    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        let PlatformAssets {
            left,
            center,
            right,
        } = self.assets;
        for platform in self.field.active() {
            let end = platform.right();
            backend.draw_sprite(left, platform.x, platform.y);
            if center.width > 0.0 {
                let mut x = platform.x + left.width;
                while x < end - right.width {
                    backend.draw_sprite(center, x, platform.y);
                    x += center.width;
                }
            }
            backend.draw_sprite(right, end - right.width, platform.y);
        }
    }
}

/// Vertical band a platform's top edge may spawn in: high enough to leave
/// room for the player standing under it, low enough to be reached with one
/// full jump from the ground. May come back inverted on squat screens.
pub fn spawn_band(
    frame: &FrameContext,
    ground: Rect,
    platform_height: f32,
    player_height: f32,
    tuning: &Tuning,
) -> (f32, f32) {
    let max_jump = tuning.max_jump_height(frame.screen_height);
    let from = ground.y - max_jump + platform_height;
    let to = ground.y - platform_height - player_height;
    (from, to)
}
