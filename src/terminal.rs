//! Terminal backend: half-block pixels via crossterm, keyboard via crossterm
//! events, sound via [`Audio`].
//!
//! The game thinks in logical pixels; each terminal pixel (half a character
//! cell) covers a `LOGICAL_SCALE` x `LOGICAL_SCALE` square of them, so a
//! 160x45 terminal plays like a 1600x900 window.

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Color as CColor},
    terminal,
};
use std::io::{self, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crate::audio::Audio;
use crate::backend::{Assets, Backend, Key, PlatformAssets, PlayerAssets, Rgb, Sprite, Texture};
use crate::font;
use crate::geometry::Rect;

pub const LOGICAL_SCALE: f32 = 10.0;

/// Longest frame the simulation is handed; a stalled terminal must not
/// teleport obstacles past the player.
const MAX_FRAME_DT: f32 = 0.1;

/// Without key release events a held key is only visible through autorepeat.
/// A fresh press counts as held this long, which has to outlast the
/// autorepeat delay (500ms on GNOME, 660ms on X11).
const FIRST_REPEAT_WINDOW: Duration = Duration::from_millis(700);
/// Once autorepeat is flowing, a key stays held until its events stop for
/// this long.
const REPEAT_GAP: Duration = Duration::from_millis(150);
/// No autorepeat delay is shorter than this; a second press sooner than that
/// is the player tapping again.
const MIN_REPEAT_DELAY: Duration = Duration::from_millis(250);

// ── Palette ─────────────────────────────────────────────────────────────────

const BODY: Rgb = Rgb(245, 200, 66);
const BODY_HI: Rgb = Rgb(255, 225, 100);
const FACE: Rgb = Rgb(20, 20, 20);
const MOUTH: Rgb = Rgb(225, 75, 35);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const COIN: Rgb = Rgb(255, 203, 0);
const COIN_RIM: Rgb = Rgb(200, 140, 0);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb(0, 0, 0); w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, Rgb(0, 0, 0));
    }

    fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(ccolor(top)))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(ccolor(top)))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(ccolor(bot)))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn ccolor(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

/// Logical coordinate to terminal pixel.
fn to_px(v: f32) -> i32 {
    (v / LOGICAL_SCALE).round() as i32
}

// ── Keyboard ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default)]
struct KeySlot {
    held: bool,
    pressed: bool,
    last_event: Option<Instant>,
    /// Events for this key are autorepeats of an earlier press.
    repeating: bool,
}

/// Down/pressed bookkeeping for the game's keys.
#[derive(Debug)]
struct KeyState {
    slots: [KeySlot; 3],
    /// The terminal reports releases, so `held` is exact.
    release_events: bool,
}

impl KeyState {
    fn new(release_events: bool) -> Self {
        Self {
            slots: [KeySlot::default(); 3],
            release_events,
        }
    }

    fn slot(key: Key) -> usize {
        match key {
            Key::Jump => 0,
            Key::Restart => 1,
            Key::Pause => 2,
        }
    }

    /// Forget last frame's edges.
    fn next_frame(&mut self) {
        for slot in &mut self.slots {
            slot.pressed = false;
        }
    }

    /// A press or repeat event. `repeat` is only ever true when the terminal
    /// reports event kinds; otherwise repeats are told apart by timing.
    fn press(&mut self, key: Key, repeat: bool, now: Instant) {
        let release_events = self.release_events;
        let slot = &mut self.slots[Self::slot(key)];
        let gap = slot
            .last_event
            .map(|last| now.saturating_duration_since(last));

        let fresh = if release_events {
            !repeat && !slot.held
        } else {
            match gap {
                None => true,
                Some(gap) if gap > FIRST_REPEAT_WINDOW => true,
                // the autorepeat stream stopped, so the key went up in between
                Some(gap) if slot.repeating => gap > REPEAT_GAP,
                Some(gap) => gap < MIN_REPEAT_DELAY,
            }
        };

        if fresh {
            slot.pressed = true;
            slot.repeating = false;
        } else if !release_events {
            slot.repeating = true;
        }
        slot.held = true;
        slot.last_event = Some(now);
    }

    fn release(&mut self, key: Key) {
        let slot = &mut self.slots[Self::slot(key)];
        slot.held = false;
        slot.repeating = false;
        slot.last_event = None;
    }

    fn is_down(&self, key: Key, now: Instant) -> bool {
        let slot = &self.slots[Self::slot(key)];
        if self.release_events {
            return slot.held;
        }
        let window = if slot.repeating {
            REPEAT_GAP
        } else {
            FIRST_REPEAT_WINDOW
        };
        slot.last_event
            .is_some_and(|last| now.saturating_duration_since(last) <= window)
    }

    fn is_pressed(&self, key: Key) -> bool {
        self.slots[Self::slot(key)].pressed
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') => Some(Key::Jump),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Key::Restart),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Pause),
        _ => None,
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

// ── Backend ─────────────────────────────────────────────────────────────────

pub struct TerminalBackend {
    out: Stdout,
    buf: PixelBuf,
    keys: KeyState,
    enhanced: bool,
    frame_dur: Duration,
    frame_start: Instant,
    dt: f32,
    audio: Option<Audio>,
}

impl TerminalBackend {
    /// Take over the terminal. Call [`TerminalBackend::restore`] before exit.
    pub fn begin(fps: u32, audio: Option<Audio>) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;

        let enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                out,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            log::info!("terminal reports no key releases, holding jump falls back to autorepeat");
        }

        let (cols, rows) = terminal::size()?;
        log::info!("terminal {cols}x{rows}, {fps} fps, audio: {}", audio.is_some());

        let now = Instant::now();
        Ok(Self {
            out,
            buf: PixelBuf::new(cols as usize, rows as usize * 2),
            keys: KeyState::new(enhanced),
            enhanced,
            frame_dur: Duration::from_secs_f32(1.0 / fps.max(1) as f32),
            frame_start: now,
            dt: 0.0,
            audio,
        })
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if let Some(audio) = &self.audio {
            audio.stop_music();
        }
        if self.enhanced {
            execute!(self.out, PopKeyboardEnhancementFlags)?;
        }
        execute!(
            self.out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    }

    /// Drain input and time the frame. Returns false once the player asked to
    /// quit.
    pub fn begin_frame(&mut self) -> io::Result<bool> {
        self.keys.next_frame();

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Release && is_quit(&key) {
                        log::info!("quit requested");
                        return Ok(false);
                    }
                    let Some(game_key) = map_key(key.code) else {
                        continue;
                    };
                    match key.kind {
                        KeyEventKind::Press => self.keys.press(game_key, false, Instant::now()),
                        KeyEventKind::Repeat => self.keys.press(game_key, true, Instant::now()),
                        KeyEventKind::Release => self.keys.release(game_key),
                    }
                }
                Event::Resize(cols, rows) => {
                    self.buf.resize(cols as usize, rows as usize * 2);
                }
                _ => {}
            }
        }

        let now = Instant::now();
        self.dt = now
            .saturating_duration_since(self.frame_start)
            .as_secs_f32()
            .min(MAX_FRAME_DT);
        self.frame_start = now;
        Ok(true)
    }

    /// Flush the frame to the terminal and sleep off the rest of its budget.
    pub fn present(&mut self) -> io::Result<()> {
        self.buf.render(&mut self.out)?;

        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_dur {
            std::thread::sleep(self.frame_dur - elapsed);
        }
        Ok(())
    }

    /// Sprite footprints, in logical pixels.
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
}

/// Font pixels per terminal pixel for a logical font size.
fn text_scale(size: i32) -> i32 {
    ((size as f32 / 40.0).round() as i32).max(1)
}

fn paint_sprite(buf: &mut PixelBuf, sprite: Sprite, x: i32, y: i32, w: i32, h: i32) {
    match sprite {
        Sprite::PlayerBody => {
            // squircle: square minus its corner pixels
            buf.fill_rect(x + 1, y, w - 2, h, BODY);
            buf.fill_rect(x, y + 1, w, h - 2, BODY);
            buf.fill_rect(x + 1, y, w - 2, 1, BODY_HI);
        }
        Sprite::RunningFace | Sprite::MidAirFace => {
            buf.set(x, y + 1, FACE);
            buf.set(x + w - 1, y + 1, FACE);
            if sprite == Sprite::MidAirFace {
                buf.set(x + w / 2, y + h - 1, MOUTH);
            } else {
                buf.fill_rect(x + 1, y + h - 1, (w - 2).max(1), 1, FACE);
            }
        }
        Sprite::GroundTile => {
            for dx in 0..w {
                let alt = ((x + dx) / 3) % 2 == 0;
                buf.set(x + dx, y, if alt { GRASS } else { GRASS_LIGHT });
                buf.fill_rect(x + dx, y + 1, 1, h - 1, GRASS);
            }
        }
        Sprite::PlatformLeft | Sprite::PlatformCenter | Sprite::PlatformRight => {
            buf.fill_rect(x, y, w, 1, GRASS_LIGHT);
            buf.fill_rect(x, y + 1, w, h - 1, DIRT_DARK);
            let edge = match sprite {
                Sprite::PlatformLeft => Some(x),
                Sprite::PlatformRight => Some(x + w - 1),
                _ => None,
            };
            if let Some(ex) = edge {
                buf.fill_rect(ex, y + 1, 1, h - 1, Rgb::lerp(DIRT_DARK, DIRT, 128));
            }
        }
        Sprite::Coin => {
            buf.fill_rect(x + 1, y, w - 2, h, COIN_RIM);
            buf.fill_rect(x, y + 1, w, h - 2, COIN_RIM);
            buf.fill_rect(x + 1, y + 1, w - 2, h - 2, COIN);
        }
    }
}

impl Backend for TerminalBackend {
    fn screen_size(&self) -> (f32, f32) {
        (
            self.buf.w as f32 * LOGICAL_SCALE,
            self.buf.h as f32 * LOGICAL_SCALE,
        )
    }

    fn frame_time(&self) -> f32 {
        self.dt
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.keys.is_down(key, Instant::now())
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.is_pressed(key)
    }

    fn clear(&mut self, color: Rgb) {
        self.buf.clear(color);
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb) {
        let x = to_px(rect.x);
        let y = to_px(rect.y);
        let w = to_px(rect.right()) - x;
        let h = to_px(rect.bottom()) - y;
        self.buf.fill_rect(x, y, w, h, color);
    }

    fn draw_sprite(&mut self, texture: Texture, x: f32, y: f32) {
        let px = to_px(x);
        let py = to_px(y);
        let w = to_px(texture.width).max(1);
        let h = to_px(texture.height).max(1);
        paint_sprite(&mut self.buf, texture.sprite, px, py, w, h);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Rgb) {
        let scale = text_scale(size);
        let ox = to_px(x as f32);
        let oy = to_px(y as f32);
        let buf = &mut self.buf;
        font::rasterize(text, |gx, gy| {
            buf.fill_rect(ox + gx * scale, oy + gy * scale, scale, scale, color);
        });
    }

    fn measure_text(&self, text: &str, size: i32) -> i32 {
        font::text_width(text) * text_scale(size) * LOGICAL_SCALE as i32
    }

    fn play_music(&mut self) {
        if let Some(audio) = &self.audio {
            audio.play_music();
        }
    }

    fn stop_music(&mut self) {
        if let Some(audio) = &self.audio {
            audio.stop_music();
        }
    }

    fn play_death(&mut self) {
        if let Some(audio) = &self.audio {
            audio.play_death();
        }
    }
}
