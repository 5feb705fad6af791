use crate::geometry::Rect;

/// Scrolling speed and respawn cadence of one field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Pixels per second, leftward.
    pub speed: f32,
    /// Seconds between spawns.
    pub spawn_interval: f32,
}

/// Fixed pool of rectangles that scroll left and get reused once they leave
/// the screen. Shared by holes, platforms and collectibles.
///
/// A slot is free when its rectangle is fully left of the screen. There is no
/// active flag: never-spawned and retired slots are zero-sized, so they
/// collide with nothing and drift off-screen on the next scroll.
#[derive(Clone, Debug)]
pub struct ScrollField {
    spawn_timer: f32,
    slots: Box<[Rect]>,
}

impl ScrollField {
    pub fn new(capacity: usize) -> Self {
        Self {
            spawn_timer: 0.0,
            slots: vec![Rect::ZERO; capacity].into_boxed_slice(),
        }
    }

    pub fn slots(&self) -> &[Rect] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Rect] {
        &mut self.slots
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slots that are on screen and collidable.
    pub fn active(&self) -> impl Iterator<Item = &Rect> {
        self.slots
            .iter()
            .filter(|r| !r.is_empty() && !r.is_off_screen_left())
    }

    /// Advance one frame: tick the timer, scroll every on-screen slot, then
    /// respawn at most one free slot (lowest index first) if the timer has run
    /// out. `spawn` only runs when a slot is actually reused.
    ///
    /// Returns the index of the respawned slot.
    pub fn advance(
        &mut self,
        dt: f32,
        motion: Motion,
        spawn: impl FnOnce() -> Rect,
    ) -> Option<usize> {
        self.spawn_timer += dt;

        let dx = motion.speed * dt;
        for slot in self.slots.iter_mut() {
            // Free slots stay put so their coordinates don't drift forever.
            if !slot.is_off_screen_left() {
                slot.x -= dx;
            }
        }

        if self.spawn_timer < motion.spawn_interval {
            return None;
        }
        // No free slot: keep accumulating, the next free one spawns at once.
        let index = self.slots.iter().position(Rect::is_off_screen_left)?;
        self.slots[index] = spawn();
        self.spawn_timer = 0.0;
        Some(index)
    }
}
