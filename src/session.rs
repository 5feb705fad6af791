use rand::rngs::StdRng;
use thiserror::Error;

use crate::backend::{Assets, BLACK, Backend, Key, RED, Rgb, SKY_BLUE};
use crate::collectibles::Collectibles;
use crate::config::Tuning;
use crate::frame::FrameContext;
use crate::ground::Ground;
use crate::platforms::Platforms;
use crate::player::{Player, Surroundings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    Win,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("the {0:?} screen is not implemented")]
    UnimplementedScreen(Screen),
}

/// Everything a restart throws away.
#[derive(Clone, Debug)]
pub struct World {
    pub ground: Ground,
    pub platforms: Platforms,
    pub collectibles: Collectibles,
    pub player: Player,
}

impl World {
    pub fn new(tuning: &Tuning, assets: &Assets) -> Self {
        Self {
            ground: Ground::new(tuning, assets.ground),
            platforms: Platforms::new(tuning, assets.platform),
            collectibles: Collectibles::new(tuning, assets.coin),
            player: Player::new(tuning, assets.player),
        }
    }

    /// One simulation step, in dependency order: later fields read the ground
    /// laid out this frame, the player reads all of them.
    fn update(
        &mut self,
        frame: &FrameContext,
        tuning: &Tuning,
        jump_held: bool,
        rng: &mut StdRng,
    ) {
        self.ground.update(frame, tuning, rng);
        let ground = self.ground.rect;
        let player_height = self.player.height();
        self.platforms
            .update(frame, ground, player_height, tuning, rng);
        self.collectibles.update(frame, ground, tuning);
        self.player.update(
            frame,
            tuning,
            jump_held,
            Surroundings {
                ground,
                platforms: self.platforms.rects(),
                holes: self.ground.hole_rects(),
                collectibles: self.collectibles.rects_mut(),
            },
        );
    }

    fn draw<B: Backend + ?Sized>(&self, backend: &mut B) {
        self.ground.draw(backend);
        self.platforms.draw(backend);
        self.collectibles.draw(backend);
        self.player.draw(backend);
    }
}

pub struct Session {
    screen: Screen,
    paused: bool,
    music_playing: bool,
    frame: FrameContext,
    world: World,
    tuning: Tuning,
    assets: Assets,
    rng: StdRng,
}

impl Session {
    pub fn new(assets: Assets, tuning: Tuning, rng: StdRng) -> Self {
        log::info!("new session");
        Self {
            screen: Screen::Playing,
            paused: false,
            music_playing: false,
            frame: FrameContext::default(),
            world: World::new(&tuning, &assets),
            tuning,
            assets,
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Jump straight to a screen, bypassing the normal transitions.
    #[doc(hidden)]
    pub fn show(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn score(&self) -> u32 {
        self.world.player.score()
    }

    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Fresh world and a clean playing screen. Assets, tuning and the random
    /// stream carry over.
    pub fn restart(&mut self) {
        log::info!("restart (score was {})", self.score());
        self.world = World::new(&self.tuning, &self.assets);
        self.screen = Screen::Playing;
        self.paused = false;
        self.music_playing = false;
    }

    pub fn update<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<(), GameError> {
        if backend.is_key_pressed(Key::Restart)
            || (self.screen == Screen::GameOver && backend.is_key_pressed(Key::Jump))
        {
            self.restart();
            return Ok(());
        }
        if self.screen == Screen::Playing && backend.is_key_pressed(Key::Pause) {
            self.paused = !self.paused;
            log::debug!("paused: {}", self.paused);
        }

        self.frame = FrameContext::capture(backend);

        match self.screen {
            Screen::Playing => {
                if self.music_playing {
                    backend.update_music();
                } else {
                    backend.play_music();
                    self.music_playing = true;
                }
                if self.paused {
                    return Ok(());
                }

                let jump_held = backend.is_key_down(Key::Jump);
                self.world
                    .update(&self.frame, &self.tuning, jump_held, &mut self.rng);

                if self.world.player.is_dead() {
                    log::info!("game over, score {}", self.score());
                    self.screen = Screen::GameOver;
                    backend.play_death();
                }
            }
            Screen::GameOver => {
                if self.music_playing {
                    backend.stop_music();
                    self.music_playing = false;
                }
            }
            Screen::Menu | Screen::Win => {
                return Err(GameError::UnimplementedScreen(self.screen));
            }
        }
        Ok(())
    }

    pub fn draw<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<(), GameError> {
        backend.clear(SKY_BLUE);

        backend.draw_text(&format!("{} FPS", self.frame.fps()), 10, 10, 20, BLACK);
        let score = format!("Score: {}", self.score());
        let score_width = backend.measure_text(&score, 20);
        let right = self.frame.screen_width as i32;
        backend.draw_text(&score, right - score_width - 10, 10, 20, BLACK);

        match self.screen {
            Screen::Playing => {
                self.world.draw(backend);
                if self.paused {
                    self.draw_centered(backend, "Paused", 0, 60, BLACK);
                }
            }
            Screen::GameOver => {
                self.world.draw(backend);
                self.draw_centered(backend, "You are dead", 0, 60, RED);
                self.draw_centered(backend, "Press R to restart", 60, 20, BLACK);
            }
            Screen::Menu | Screen::Win => {
                return Err(GameError::UnimplementedScreen(self.screen));
            }
        }
        Ok(())
    }

    fn draw_centered<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        text: &str,
        offset_y: i32,
        size: i32,
        color: Rgb,
    ) {
        let width = backend.measure_text(text, size);
        let x = self.frame.screen_width as i32 / 2 - width / 2;
        let y = self.frame.screen_height as i32 / 2 + offset_y;
        backend.draw_text(text, x, y, size, color);
    }
}
