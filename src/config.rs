//! Gameplay tuning. Distances are screen pixels, speeds pixels per second,
//! intervals seconds.

#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub ground_height_fraction: f32,

    pub hole_spawn_interval: f32,
    pub hole_speed: f32,
    pub max_holes: usize,
    pub hole_min_width: f32,
    pub hole_max_width: f32,

    pub platform_spawn_interval: f32,
    pub platform_speed: f32,
    pub max_platforms: usize,
    pub platform_min_width: f32,
    pub platform_max_width: f32,

    pub collectible_spawn_interval: f32,
    pub collectible_speed: f32,
    pub max_collectibles: usize,

    /// Highest a single jump climbs, as a share of screen height.
    pub max_jump_fraction: f32,
    /// Player's fixed distance from the left edge, as a share of screen width.
    pub player_left_margin_fraction: f32,
    pub player_vertical_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let hole_spawn_interval = 3.0;
        let hole_speed = 400.0;
        Self {
            ground_height_fraction: 0.2,

            hole_spawn_interval,
            hole_speed,
            max_holes: 10,
            hole_min_width: 200.0,
            hole_max_width: 400.0,

            platform_spawn_interval: 2.0 * hole_spawn_interval,
            platform_speed: hole_speed,
            max_platforms: 10,
            platform_min_width: 200.0,
            platform_max_width: 400.0,

            collectible_spawn_interval: hole_spawn_interval / 2.0,
            collectible_speed: hole_speed,
            max_collectibles: 40,

            max_jump_fraction: 0.2,
            player_left_margin_fraction: 0.2,
            player_vertical_speed: hole_speed - 100.0,
        }
    }
}

impl Tuning {
    pub fn max_jump_height(&self, screen_height: f32) -> f32 {
        screen_height * self.max_jump_fraction
    }
}
