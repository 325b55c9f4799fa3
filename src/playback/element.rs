use crate::audio::ObjectUrlRegistry;
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use std::collections::VecDeque;

/// Native events an audio element emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerEvent {
    TimeUpdate(f64),
    LoadedMetadata(f64),
    Ended,
    Play,
    Pause,
}

/// A single audio output the player drives.
///
/// Mirrors an HTML media element: sources are playable references, state
/// changes are reported back as [`PlayerEvent`]s.
pub trait AudioElement {
    /// Point the element at a reference; `None` unloads it.
    fn load(&mut self, url: Option<&str>);
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);
    /// `NaN` until metadata has loaded.
    fn duration(&self) -> f64;
    /// 0 = nothing loaded, 1+ = metadata available.
    fn ready_state(&self) -> u8;
    /// Drain events emitted since the last call.
    fn take_events(&mut self) -> Vec<PlayerEvent>;
}

/// Deterministic element that resolves references from a registry and only
/// advances time when told to.
pub struct SimulatedElement {
    registry: ObjectUrlRegistry,
    source: Option<Bytes>,
    bitrate_bps: u32,
    duration: f64,
    position: f64,
    playing: bool,
    events: VecDeque<PlayerEvent>,
}

impl SimulatedElement {
    /// Duration is estimated from payload size at `bitrate_bps` (128 kbps MP3 by default).
    pub fn new(registry: ObjectUrlRegistry) -> Self {
        Self {
            registry,
            source: None,
            bitrate_bps: 128_000,
            duration: f64::NAN,
            position: 0.0,
            playing: false,
            events: VecDeque::new(),
        }
    }

    pub fn with_bitrate(mut self, bitrate_bps: u32) -> Self {
        self.bitrate_bps = bitrate_bps.max(1);
        self
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Move the playhead forward by `secs` while playing.
    pub fn advance(&mut self, secs: f64) {
        if !self.playing || !self.duration.is_finite() {
            return;
        }
        self.position = (self.position + secs).min(self.duration);
        self.events.push_back(PlayerEvent::TimeUpdate(self.position));
        if self.position >= self.duration {
            self.playing = false;
            self.events.push_back(PlayerEvent::Ended);
        }
    }

    fn estimate_duration(&self, data: &Bytes) -> f64 {
        (data.len() as f64 * 8.0) / self.bitrate_bps as f64
    }
}

impl AudioElement for SimulatedElement {
    fn load(&mut self, url: Option<&str>) {
        if self.playing {
            self.playing = false;
            self.events.push_back(PlayerEvent::Pause);
        }
        self.position = 0.0;
        self.source = url.and_then(|u| self.registry.resolve(u));
        match &self.source {
            Some(data) => {
                self.duration = self.estimate_duration(data);
                self.events
                    .push_back(PlayerEvent::LoadedMetadata(self.duration));
            }
            None => self.duration = f64::NAN,
        }
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(Error::resource_with_context(
                "No playable source loaded",
                ErrorContext::new().with_source("playback"),
            ));
        }
        if !self.playing {
            if self.position >= self.duration {
                self.position = 0.0;
            }
            self.playing = true;
            self.events.push_back(PlayerEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.events.push_back(PlayerEvent::Pause);
        }
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, time: f64) {
        let max = if self.duration.is_finite() {
            self.duration
        } else {
            0.0
        };
        self.position = time.clamp(0.0, max);
        self.events.push_back(PlayerEvent::TimeUpdate(self.position));
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn ready_state(&self) -> u8 {
        if self.source.is_some() {
            1
        } else {
            0
        }
    }

    fn take_events(&mut self) -> Vec<PlayerEvent> {
        self.events.drain(..).collect()
    }
}
