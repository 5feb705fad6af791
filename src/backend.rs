//! The surface the game core needs from whatever draws, listens and plays
//! sound for it. The terminal renderer in `terminal.rs` is one implementation;
//! tests drive the core with a scripted one.

use crate::geometry::Rect;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub const SKY_BLUE: Rgb = Rgb(102, 191, 255);
pub const HOLE_GRAY: Rgb = Rgb(130, 130, 130);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const RED: Rgb = Rgb(230, 41, 55);
pub const BROWN: Rgb = Rgb(127, 106, 79);

// ── Input ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Jump,
    Restart,
    Pause,
}

// ── Textures ────────────────────────────────────────────────────────────────

/// Which picture a texture handle stands for. Only the backend knows what it
/// looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    PlayerBody,
    RunningFace,
    MidAirFace,
    GroundTile,
    PlatformLeft,
    PlatformCenter,
    PlatformRight,
    Coin,
}

/// Opaque handle plus the pixel footprint the core lays things out with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texture {
    pub sprite: Sprite,
    pub width: f32,
    pub height: f32,
}

impl Texture {
    pub const fn new(sprite: Sprite, width: f32, height: f32) -> Self {
        Self {
            sprite,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerAssets {
    pub body: Texture,
    pub running_face: Texture,
    pub mid_air_face: Texture,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformAssets {
    pub left: Texture,
    pub center: Texture,
    pub right: Texture,
}

/// Every handle the session needs. Loaded once by the backend and reused
/// across restarts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assets {
    pub player: PlayerAssets,
    pub ground: Texture,
    pub platform: PlatformAssets,
    pub coin: Texture,
}

// ── Backend ─────────────────────────────────────────────────────────────────

pub trait Backend {
    /// Current screen size in pixels.
    fn screen_size(&self) -> (f32, f32);
    /// Seconds elapsed since the previous frame.
    fn frame_time(&self) -> f32;

    /// Held right now.
    fn is_key_down(&self, key: Key) -> bool;
    /// Went down since the previous frame.
    fn is_key_pressed(&self, key: Key) -> bool;

    fn clear(&mut self, color: Rgb);
    fn draw_rect(&mut self, rect: Rect, color: Rgb);
    fn draw_sprite(&mut self, texture: Texture, x: f32, y: f32);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Rgb);
    fn measure_text(&self, text: &str, size: i32) -> i32;

    // Audio is optional; a backend without it is a silent game.
    fn play_music(&mut self) {}
    fn update_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn play_death(&mut self) {}
}
