use crate::backend::{Backend, PlayerAssets};
use crate::config::Tuning;
use crate::frame::FrameContext;
use crate::geometry::Rect;
use crate::ground::holes_under;

/// Where the player is in its jump cycle, derived from the raw flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Grounded,
    Jumping,
    Falling,
    OnPlatform,
    Dead,
}

/// Everything the player collides with this frame.
pub struct Surroundings<'a> {
    pub ground: Rect,
    pub platforms: &'a [Rect],
    pub holes: &'a [Rect],
    pub collectibles: &'a mut [Rect],
}

#[derive(Clone, Debug)]
pub struct Player {
    /// Height above the ground line; 0 means standing on the ground.
    vertical_position: f32,
    vertical_speed: f32,
    // Can't use vertical_position == 0 for this: it stays > 0 while descending.
    jumping: bool,
    jump_start: f32,
    on_platform: bool,
    dead: bool,
    rect: Rect,
    score: u32,
    assets: PlayerAssets,
}

impl Player {
    pub fn new(tuning: &Tuning, assets: PlayerAssets) -> Self {
        Self {
            vertical_position: 0.0,
            vertical_speed: tuning.player_vertical_speed,
            jumping: false,
            jump_start: 0.0,
            on_platform: false,
            dead: false,
            rect: Rect::ZERO,
            score: 0,
            assets,
        }
    }

    pub fn vertical_position(&self) -> f32 {
        self.vertical_position
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn height(&self) -> f32 {
        self.assets.body.height
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_on_platform(&self) -> bool {
        self.on_platform
    }

    /// Ceiling of the jump in progress.
    pub fn jump_ceiling(&self, frame: &FrameContext, tuning: &Tuning) -> f32 {
        self.jump_start + tuning.max_jump_height(frame.screen_height)
    }

    pub fn state(&self) -> PlayerState {
        if self.dead {
            PlayerState::Dead
        } else if self.jumping {
            PlayerState::Jumping
        } else if self.on_platform {
            PlayerState::OnPlatform
        } else if self.vertical_position > 0.0 {
            PlayerState::Falling
        } else {
            PlayerState::Grounded
        }
    }

    pub fn update(
        &mut self,
        frame: &FrameContext,
        tuning: &Tuning,
        jump_held: bool,
        world: Surroundings<'_>,
    ) {
        if self.dead {
            return;
        }
        self.update_rect(frame, tuning, world.ground);
        self.update_vertical_position(frame, tuning, jump_held, world.platforms);
        self.update_score(world.collectibles);
        self.update_dead(world.holes);
    }

    fn update_rect(&mut self, frame: &FrameContext, tuning: &Tuning, ground: Rect) {
        let body = self.assets.body;
        self.rect = Rect::new(
            frame.screen_width * tuning.player_left_margin_fraction,
            ground.y - body.height - self.vertical_position,
            body.width,
            body.height,
        );
    }

    fn update_vertical_position(
        &mut self,
        frame: &FrameContext,
        tuning: &Tuning,
        jump_held: bool,
        platforms: &[Rect],
    ) {
        // Only counts when landing on top, not when clipping it from below.
        self.on_platform = platforms.iter().any(|platform| {
            self.rect.overlaps(platform) && self.rect.bottom() < platform.bottom()
        });

        let grounded = !self.jumping && self.vertical_position == 0.0;
        if jump_held && (grounded || self.on_platform) {
            self.jumping = true;
            self.jump_start = self.vertical_position;
        }
        if !jump_held && self.jumping {
            self.jumping = false;
        }

        let step = self.vertical_speed * frame.dt;
        if self.jumping {
            self.vertical_position += step;
        } else if !self.on_platform {
            self.vertical_position -= step;
        }

        let ceiling = self.jump_ceiling(frame, tuning);
        self.vertical_position = self.vertical_position.clamp(0.0, ceiling);
        if self.jumping && self.vertical_position >= ceiling {
            self.jumping = false;
        }
    }

    fn update_score(&mut self, collectibles: &mut [Rect]) {
        for coin in collectibles.iter_mut() {
            if self.rect.overlaps(coin) {
                self.score += 1;
                coin.retire();
            }
        }
    }

    fn update_dead(&mut self, holes: &[Rect]) {
        if self.vertical_position != 0.0 {
            return;
        }
        // More than half of the body has to be over the hole.
        let middle = self.rect.center_x();
        self.dead = holes_under(holes, &self.rect).any(|hole| {
            hole.x < middle && middle < hole.right()
        });
    }

    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        let PlayerAssets {
            body,
            running_face,
            mid_air_face,
        } = self.assets;
        backend.draw_sprite(body, self.rect.x, self.rect.y);
        let face = if self.jumping {
            mid_air_face
        } else {
            running_face
        };
        backend.draw_sprite(face, self.rect.x + face.width / 2.0, self.rect.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Sprite, Texture};
    use crate::ground::ground_rect;

    const DT: f32 = 1.0 / 60.0;

    fn assets() -> PlayerAssets {
        PlayerAssets {
            body: Texture::new(Sprite::PlayerBody, 60.0, 60.0),
            running_face: Texture::new(Sprite::RunningFace, 30.0, 30.0),
            mid_air_face: Texture::new(Sprite::MidAirFace, 30.0, 30.0),
        }
    }

    fn frame() -> FrameContext {
        FrameContext::new(1600.0, 900.0, DT)
    }

    struct World {
        tuning: Tuning,
        player: Player,
        platforms: Vec<Rect>,
        holes: Vec<Rect>,
        coins: Vec<Rect>,
    }

    impl World {
        fn new() -> Self {
            let tuning = Tuning::default();
            let player = Player::new(&tuning, assets());
            Self {
                tuning,
                player,
                platforms: Vec::new(),
                holes: Vec::new(),
                coins: Vec::new(),
            }
        }

        fn step(&mut self, jump_held: bool) {
            let frame = frame();
            let ground = ground_rect(&frame, &self.tuning);
            self.player.update(
                &frame,
                &self.tuning,
                jump_held,
                Surroundings {
                    ground,
                    platforms: &self.platforms,
                    holes: &self.holes,
                    collectibles: &mut self.coins,
                },
            );
        }
    }

    #[test]
    fn jump_rises_then_falls_back_to_ground() {
        let mut w = World::new();
        let mut last = 0.0;
        for _ in 0..20 {
            w.step(true);
            assert!(w.player.vertical_position() > last);
            last = w.player.vertical_position();
        }
        assert_eq!(w.player.state(), PlayerState::Jumping);

        w.step(false);
        assert_eq!(w.player.state(), PlayerState::Falling);
        assert!(w.player.vertical_position() < last);

        let mut frames = 0;
        while w.player.vertical_position() > 0.0 {
            let before = w.player.vertical_position();
            w.step(false);
            assert!(w.player.vertical_position() < before);
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(w.player.state(), PlayerState::Grounded);
    }

    #[test]
    fn holding_jump_never_passes_the_ceiling() {
        let mut w = World::new();
        let ceiling = w.tuning.max_jump_height(900.0);
        let mut peaked = false;
        for _ in 0..300 {
            w.step(true);
            let pos = w.player.vertical_position();
            assert!((0.0..=ceiling).contains(&pos), "position {pos}");
            if pos >= ceiling {
                peaked = true;
                // forced to fall even though jump is still held
                assert!(!w.player.is_jumping());
            }
        }
        assert!(peaked);
    }

    #[test]
    fn holding_jump_after_peak_does_not_rejump_midair() {
        let mut w = World::new();
        while w.player.vertical_position() < 180.0 {
            w.step(true);
        }
        let peak = w.player.vertical_position();
        w.step(true);
        let after = w.player.vertical_position();
        assert!(after < peak);
        w.step(true);
        assert!(w.player.vertical_position() < after);
    }

    #[test]
    fn lands_on_flush_platform_and_stays() {
        let mut w = World::new();
        // Rise to 100px, then drop onto a ledge whose top sits at 70px above
        // ground, spanning the player's column.
        while w.player.vertical_position() < 100.0 {
            w.step(true);
        }
        let platform = Rect::new(250.0, 720.0 - 70.0, 400.0, 20.0);
        w.platforms.push(platform);

        let mut frames = 0;
        while !w.player.is_on_platform() {
            w.step(false);
            frames += 1;
            assert!(frames < 100, "never landed");
        }
        let landed_at = w.player.vertical_position();
        assert!(landed_at > 0.0);
        // bottom edge is inside the ledge's top half, not through it
        assert!(w.player.rect().bottom() > platform.y);
        assert!(w.player.rect().bottom() < platform.bottom());

        for _ in 0..10 {
            w.step(false);
            assert_eq!(w.player.state(), PlayerState::OnPlatform);
            assert_eq!(w.player.vertical_position(), landed_at);
        }
    }

    #[test]
    fn jumping_from_platform_raises_the_ceiling() {
        let mut w = World::new();
        while w.player.vertical_position() < 100.0 {
            w.step(true);
        }
        w.platforms.push(Rect::new(250.0, 720.0 - 70.0, 400.0, 20.0));
        while !w.player.is_on_platform() {
            w.step(false);
        }
        let base = w.player.vertical_position();
        w.step(true);
        assert!(w.player.is_jumping());
        let ceiling = w.player.jump_ceiling(&frame(), &w.tuning);
        assert!(ceiling >= base + 180.0 - 1e-3);
    }

    #[test]
    fn platform_hit_from_below_does_not_catch() {
        let mut w = World::new();
        // ledge right above the head of a standing player
        w.platforms.push(Rect::new(250.0, 720.0 - 60.0 - 20.0, 400.0, 20.0));
        w.step(true);
        w.step(true);
        assert!(!w.player.is_on_platform());
    }

    #[test]
    fn collectible_counts_once() {
        let mut w = World::new();
        w.coins.push(Rect::new(330.0, 680.0, 40.0, 40.0));
        w.coins.push(Rect::new(900.0, 680.0, 40.0, 40.0));
        w.step(false);
        assert_eq!(w.player.score(), 1);
        assert!(w.coins[0].is_empty());
        assert!(!w.coins[1].is_empty());

        w.step(false);
        w.step(false);
        assert_eq!(w.player.score(), 1);
    }

    #[test]
    fn center_over_hole_kills() {
        let mut w = World::new();
        // player spans 320..380, centre 350
        w.holes.push(Rect::new(340.0, 720.0, 200.0, 180.0));
        w.step(false);
        assert!(w.player.is_dead());
        assert_eq!(w.player.state(), PlayerState::Dead);
    }

    #[test]
    fn grazing_hole_edge_is_survivable() {
        let mut w = World::new();
        // right edge of the body over the hole, centre still on solid ground
        w.holes.push(Rect::new(360.0, 720.0, 200.0, 180.0));
        // left edge over a hole that ends before the centre
        w.holes.push(Rect::new(100.0, 720.0, 240.0, 180.0));
        w.step(false);
        assert!(!w.player.is_dead());
    }

    #[test]
    fn airborne_player_crosses_holes() {
        let mut w = World::new();
        w.step(true);
        w.holes.push(Rect::new(200.0, 720.0, 300.0, 180.0));
        for _ in 0..10 {
            w.step(true);
        }
        assert!(!w.player.is_dead());

        // coming back down over the hole is fatal
        for _ in 0..200 {
            w.step(false);
        }
        assert!(w.player.is_dead());
    }

    #[test]
    fn dead_is_terminal() {
        let mut w = World::new();
        w.holes.push(Rect::new(300.0, 720.0, 200.0, 180.0));
        w.step(false);
        assert!(w.player.is_dead());
        w.holes.clear();
        w.step(true);
        assert!(w.player.is_dead());
        assert_eq!(w.player.vertical_position(), 0.0);
    }
}
