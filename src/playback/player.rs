use super::element::{AudioElement, PlayerEvent};
use crate::audio::{AudioPayload, ObjectUrlRegistry, PlayableAudio};
use crate::{Error, ErrorContext, Result};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Playback controls over one [`AudioElement`].
///
/// Position, duration and the playing flag are only updated from element
/// events (see [`AudioPlayer::pump`]), except where a control writes them
/// directly (seek, reset).
pub struct AudioPlayer<E: AudioElement> {
    element: E,
    registry: ObjectUrlRegistry,
    source: Option<String>,
    payload: Option<AudioPayload>,
    loading: bool,
    is_playing: bool,
    current_time: f64,
    duration: f64,
}

impl<E: AudioElement> AudioPlayer<E> {
    pub fn new(element: E, registry: ObjectUrlRegistry) -> Self {
        Self {
            element,
            registry,
            source: None,
            payload: None,
            loading: false,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
        }
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Install a new result (or clear with `None`).
    pub fn load(&mut self, audio: Option<&PlayableAudio>) {
        self.source = audio.map(|a| a.url.as_str().to_string());
        self.payload = audio.map(|a| a.payload.clone());
        self.is_playing = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.element.load(self.source.as_deref());
        self.pump();
    }

    /// Mirror the session's loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::TimeUpdate(t) => self.current_time = t,
            PlayerEvent::LoadedMetadata(d) => self.duration = d,
            PlayerEvent::Ended => {
                self.is_playing = false;
                self.current_time = 0.0;
            }
            PlayerEvent::Play => self.is_playing = true,
            PlayerEvent::Pause => self.is_playing = false,
        }
    }

    /// Apply every event the element has queued.
    pub fn pump(&mut self) {
        for event in self.element.take_events() {
            self.handle_event(event);
        }
    }

    pub fn has_audio(&self) -> bool {
        self.source
            .as_deref()
            .map(|u| self.registry.is_live(u))
            .unwrap_or(false)
    }

    pub fn controls_enabled(&self) -> bool {
        self.has_audio() && !self.loading
    }

    pub fn download_enabled(&self) -> bool {
        self.controls_enabled() && self.payload.is_some()
    }

    fn ensure_enabled(&self, control: &str) -> Result<()> {
        if self.controls_enabled() {
            Ok(())
        } else {
            Err(Error::resource_with_context(
                "Playback controls are disabled",
                ErrorContext::new()
                    .with_source("playback")
                    .with_field_path(control),
            ))
        }
    }

    /// Pause when playing; otherwise start, provided metadata is available.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        self.ensure_enabled("play")?;
        if self.is_playing {
            self.element.pause();
        } else if self.element.ready_state() > 0 {
            if let Err(e) = self.element.play() {
                warn!(error = %e, "error playing audio");
                return Err(e);
            }
        }
        self.pump();
        Ok(())
    }

    pub fn seek(&mut self, time: f64) -> Result<()> {
        self.ensure_enabled("seek")?;
        let max = if self.duration.is_finite() {
            self.duration
        } else {
            0.0
        };
        let time = if time.is_finite() {
            time.clamp(0.0, max)
        } else {
            0.0
        };
        self.current_time = time;
        self.element.set_current_time(time);
        self.pump();
        Ok(())
    }

    /// Stop and rewind to the start.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_enabled("reset")?;
        self.element.pause();
        self.element.set_current_time(0.0);
        self.pump();
        self.is_playing = false;
        self.current_time = 0.0;
        Ok(())
    }

    /// Save the payload as `voiceforge-audio-<unix-millis>.<ext>` in `dir`.
    pub fn download(&self, dir: &Path) -> Result<PathBuf> {
        if !self.download_enabled() {
            return Err(Error::resource_with_context(
                "No audio available to download",
                ErrorContext::new()
                    .with_source("playback")
                    .with_field_path("download"),
            ));
        }
        let payload = self
            .payload
            .as_ref()
            .ok_or_else(|| Error::resource("No audio available to download"))?;
        let temp = self.registry.create(payload);
        let result = self.write_reference(temp.as_str(), payload, dir);
        temp.revoke();
        result
    }

    fn write_reference(&self, url: &str, payload: &AudioPayload, dir: &Path) -> Result<PathBuf> {
        let data = self
            .registry
            .resolve(url)
            .ok_or_else(|| Error::resource("Temporary audio reference vanished"))?;
        std::fs::create_dir_all(dir)?;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = dir.join(format!(
            "voiceforge-audio-{}.{}",
            millis,
            payload.format.extension()
        ));
        std::fs::write(&path, &data)?;
        debug!(path = %path.display(), bytes = data.len(), "saved audio");
        Ok(path)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// `current / total` in `m:ss` form.
    pub fn progress_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.current_time),
            format_time(self.duration)
        )
    }
}

/// `m:ss`; non-finite input renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioFormat;
    use crate::playback::SimulatedElement;

    fn player_with_audio(bytes: usize) -> (AudioPlayer<SimulatedElement>, PlayableAudio) {
        let registry = ObjectUrlRegistry::new();
        let audio = PlayableAudio::new(
            AudioPayload::new(vec![0u8; bytes], AudioFormat::Mp3),
            &registry,
        );
        // 16_000 bytes at 128 kbps is one second.
        let mut player = AudioPlayer::new(SimulatedElement::new(registry.clone()), registry);
        player.load(Some(&audio));
        (player, audio)
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(600.0), "10:00");
    }

    #[test]
    fn test_controls_disabled_without_audio() {
        let registry = ObjectUrlRegistry::new();
        let mut player = AudioPlayer::new(SimulatedElement::new(registry.clone()), registry);
        assert!(!player.controls_enabled());
        assert!(player.toggle_play_pause().is_err());
        assert!(player.seek(1.0).is_err());
        assert!(player.reset().is_err());
        assert!(player.download(Path::new(".")).is_err());
    }

    #[test]
    fn test_controls_disabled_while_loading() {
        let (mut player, _audio) = player_with_audio(16_000);
        player.set_loading(true);
        assert!(!player.controls_enabled());
        assert!(player.toggle_play_pause().is_err());
        assert!(player.reset().is_err());
        player.set_loading(false);
        assert!(player.controls_enabled());
    }

    #[test]
    fn test_play_pause_tracks_events() {
        let (mut player, _audio) = player_with_audio(32_000);
        assert_eq!(player.duration(), 2.0);

        player.toggle_play_pause().unwrap();
        assert!(player.is_playing());

        player.element_mut().advance(0.5);
        player.pump();
        assert_eq!(player.current_time(), 0.5);
        assert_eq!(player.progress_label(), "0:00 / 0:02");

        player.toggle_play_pause().unwrap();
        assert!(!player.is_playing());
    }

    #[test]
    fn test_ended_rewinds() {
        let (mut player, _audio) = player_with_audio(16_000);
        player.toggle_play_pause().unwrap();
        player.element_mut().advance(5.0);
        player.pump();
        assert!(!player.is_playing());
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn test_seek_and_reset() {
        let (mut player, _audio) = player_with_audio(48_000);
        player.seek(1.5).unwrap();
        assert_eq!(player.current_time(), 1.5);
        assert_eq!(player.element().current_time(), 1.5);

        player.seek(99.0).unwrap();
        assert_eq!(player.current_time(), 3.0);

        player.toggle_play_pause().unwrap();
        player.reset().unwrap();
        assert!(!player.is_playing());
        assert_eq!(player.current_time(), 0.0);
        assert!(!player.element().is_playing());
    }

    #[test]
    fn test_released_reference_disables_controls() {
        let (player, audio) = player_with_audio(16_000);
        assert!(player.has_audio());
        audio.release();
        assert!(!player.has_audio());
    }

    #[test]
    fn test_download_writes_and_releases_temp_reference() {
        let (player, audio) = player_with_audio(100);
        let dir = tempfile::tempdir().unwrap();
        let path = player.download(dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("voiceforge-audio-"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(std::fs::read(&path).unwrap().len(), 100);
        assert_eq!(player.registry.live_count(), 1);
        drop(audio);
    }
}
