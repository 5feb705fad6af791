//! Endless runner: jump the holes, land on the platforms, pick up the coins.
//!
//! The simulation (`ground`, `platforms`, `collectibles`, `player`, `session`)
//! only talks to the outside world through [`backend::Backend`]. The
//! `terminal` and `audio` modules provide the one real backend.

pub mod audio;
pub mod backend;
pub mod collectibles;
pub mod config;
pub mod field;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod ground;
pub mod platforms;
pub mod player;
pub mod session;
pub mod terminal;

pub use backend::Backend;
pub use config::Tuning;
pub use session::{GameError, Screen, Session};
