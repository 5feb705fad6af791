use std::collections::HashSet;

use bread_dash::backend::{Assets, Backend, Key, PlatformAssets, PlayerAssets, Rgb, Sprite, Texture};
use bread_dash::geometry::Rect;
use bread_dash::{GameError, Session};

/// Backend with a fixed screen, a fixed frame time and scripted keys. Records
/// what the session asked it to draw and play.
pub struct FakeBackend {
    pub size: (f32, f32),
    pub dt: f32,
    down: HashSet<Key>,
    pressed: HashSet<Key>,
    pub texts: Vec<String>,
    pub sprites: Vec<Sprite>,
    pub rects: Vec<(Rect, Rgb)>,
    pub music_started: u32,
    pub music_updated: u32,
    pub music_stopped: u32,
    pub deaths: u32,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            size: (1600.0, 900.0),
            dt: 1.0 / 60.0,
            down: HashSet::new(),
            pressed: HashSet::new(),
            texts: Vec::new(),
            sprites: Vec::new(),
            rects: Vec::new(),
            music_started: 0,
            music_updated: 0,
            music_stopped: 0,
            deaths: 0,
        }
    }

    /// Key goes down this frame and stays down.
    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
        self.down.insert(key);
    }

    /// Key goes down and comes back up within the frame.
    pub fn tap(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    /// One update + draw, like the real loop. Draw output is from this frame
    /// only.
    pub fn step(&mut self, session: &mut Session) -> Result<(), GameError> {
        self.texts.clear();
        self.sprites.clear();
        self.rects.clear();
        let mut result = session.update(self);
        if result.is_ok() {
            result = session.draw(self);
        }
        self.pressed.clear();
        result
    }

    pub fn saw_text(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t == text)
    }
}

impl Backend for FakeBackend {
    fn screen_size(&self) -> (f32, f32) {
        self.size
    }

    fn frame_time(&self) -> f32 {
        self.dt
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn clear(&mut self, _color: Rgb) {}

    fn draw_rect(&mut self, rect: Rect, color: Rgb) {
        self.rects.push((rect, color));
    }

    fn draw_sprite(&mut self, texture: Texture, _x: f32, _y: f32) {
        self.sprites.push(texture.sprite);
    }

    fn draw_text(&mut self, text: &str, _x: i32, _y: i32, _size: i32, _color: Rgb) {
        self.texts.push(text.to_string());
    }

    fn measure_text(&self, text: &str, size: i32) -> i32 {
        text.len() as i32 * size / 2
    }

    fn play_music(&mut self) {
        self.music_started += 1;
    }

    fn update_music(&mut self) {
        self.music_updated += 1;
    }

    fn stop_music(&mut self) {
        self.music_stopped += 1;
    }

    fn play_death(&mut self) {
        self.deaths += 1;
    }
}

pub fn assets() -> Assets {
    Assets {
        player: PlayerAssets {
            body: Texture::new(Sprite::PlayerBody, 60.0, 60.0),
            running_face: Texture::new(Sprite::RunningFace, 30.0, 30.0),
            mid_air_face: Texture::new(Sprite::MidAirFace, 30.0, 30.0),
        },
        ground: Texture::new(Sprite::GroundTile, 60.0, 20.0),
        platform: PlatformAssets {
            left: Texture::new(Sprite::PlatformLeft, 30.0, 20.0),
            center: Texture::new(Sprite::PlatformCenter, 30.0, 20.0),
            right: Texture::new(Sprite::PlatformRight, 30.0, 20.0),
        },
        coin: Texture::new(Sprite::Coin, 40.0, 40.0),
    }
}
