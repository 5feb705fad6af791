use crate::backend::Backend;

/// Per-frame values every component reads. Rebuilt from the backend each
/// frame, nothing carries over.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameContext {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

impl FrameContext {
    pub fn new(screen_width: f32, screen_height: f32, dt: f32) -> Self {
        Self {
            screen_width,
            screen_height,
            dt,
        }
    }

    pub fn capture<B: Backend + ?Sized>(backend: &B) -> Self {
        let (screen_width, screen_height) = backend.screen_size();
        Self::new(screen_width, screen_height, backend.frame_time().max(0.0))
    }

    pub fn fps(&self) -> u32 {
        if self.dt > 0.0 {
            (1.0 / self.dt).round() as u32
        } else {
            0
        }
    }
}
