//! Playback component: drives one audio element from native events.

mod element;
mod player;

pub use element::{AudioElement, PlayerEvent, SimulatedElement};
pub use player::{format_time, AudioPlayer};
