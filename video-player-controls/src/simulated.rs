use std::collections::HashMap;

use tracing::debug;

use crate::{
    clock::PlaybackClock,
    playback::clamp_volume,
    primitive::{EventHub, Listener, MediaEvent, MediaPrimitive, PlayRequest},
};

#[derive(Debug, Clone)]
pub struct SimulatedMediaConfig {
    /// Duration used for sources without an entry in `durations`.
    pub default_duration: f64,
    pub durations: HashMap<String, f64>,
    /// Reject a play request issued before any tick since the last load,
    /// the way browsers refuse autoplay without a user gesture.
    pub block_autoplay: bool,
    pub rate: f64,
    pub volume: f64,
}

impl Default for SimulatedMediaConfig {
    fn default() -> Self {
        Self {
            default_duration: 30.0,
            durations: HashMap::new(),
            block_autoplay: false,
            rate: 1.0,
            volume: 1.0,
        }
    }
}

/// Media primitive that plays nothing but keeps time like one that does.
#[derive(Debug)]
pub struct SimulatedMedia {
    config: SimulatedMediaConfig,
    hub: EventHub,
    clock: PlaybackClock,
    src: Option<String>,
    duration: f64,
    playing: bool,
    volume: f64,
    muted: bool,
    autoplay_window: bool,
}

impl SimulatedMedia {
    pub fn new(config: SimulatedMediaConfig) -> Self {
        let volume = clamp_volume(config.volume);
        let clock = PlaybackClock::with_rate(config.rate);

        Self {
            config,
            hub: EventHub::new(),
            clock,
            src: None,
            duration: 0.0,
            playing: false,
            volume,
            muted: false,
            autoplay_window: false,
        }
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }

    fn duration_for(&self, src: &str) -> f64 {
        self.config
            .durations
            .get(src)
            .copied()
            .unwrap_or(self.config.default_duration)
            .max(0.0)
    }

    fn stop(&mut self) -> bool {
        if !self.playing {
            return false;
        }

        self.clock.stop();
        self.playing = false;
        true
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl MediaPrimitive for SimulatedMedia {
    fn load(&mut self, src: &str) {
        if self.stop() {
            self.hub.emit(MediaEvent::PlayStopped);
        }

        self.clock.reset();
        self.duration = self.duration_for(src);
        self.src = Some(src.to_string());
        self.autoplay_window = true;

        debug!(src, duration = self.duration, "simulated load");
        self.hub.emit(MediaEvent::MetadataReady {
            duration: self.duration,
        });
    }

    fn play(&mut self) -> PlayRequest {
        if self.src.is_none() {
            return PlayRequest::rejected("no source loaded");
        }

        if self.config.block_autoplay && self.autoplay_window {
            return PlayRequest::rejected("autoplay blocked");
        }

        if self.playing {
            return PlayRequest::resolved();
        }

        if self.clock.position() >= self.duration {
            self.clock.set_position(0.0);
        }

        self.clock.start();
        self.playing = true;
        self.hub.emit(MediaEvent::PlayStarted);

        PlayRequest::resolved()
    }

    fn pause(&mut self) {
        if self.stop() {
            self.hub.emit(MediaEvent::PlayStopped);
        }
    }

    fn current_time(&self) -> f64 {
        self.clock.position().min(self.duration)
    }

    fn set_current_time(&mut self, seconds: f64) {
        let seconds = seconds.clamp(0.0, self.duration);
        self.clock.set_position(seconds);
        self.hub.emit(MediaEvent::TimeAdvanced {
            current_time: seconds,
        });
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        let volume = clamp_volume(volume);
        if volume == self.volume {
            return;
        }

        self.volume = volume;
        self.hub.emit(MediaEvent::VolumeChanged {
            volume,
            muted: self.muted,
        });
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        if muted == self.muted {
            return;
        }

        self.muted = muted;
        self.hub.emit(MediaEvent::VolumeChanged {
            volume: self.volume,
            muted,
        });
    }

    fn listen(&mut self) -> Listener {
        self.hub.listen()
    }

    fn tick(&mut self) {
        self.autoplay_window = false;

        if !self.playing {
            return;
        }

        let position = self.clock.position();

        if position >= self.duration {
            self.stop();
            self.clock.set_position(self.duration);
            self.hub.emit(MediaEvent::TimeAdvanced {
                current_time: self.duration,
            });
            self.hub.emit(MediaEvent::PlayStopped);
            self.hub.emit(MediaEvent::Ended);
        } else {
            self.hub.emit(MediaEvent::TimeAdvanced {
                current_time: position,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn drain(listener: &mut Listener) -> Vec<MediaEvent> {
        std::iter::from_fn(|| listener.try_recv()).collect()
    }

    #[test]
    fn load_announces_configured_duration() {
        let mut media = SimulatedMedia::new(SimulatedMediaConfig {
            durations: HashMap::from([("/a.mp4".to_string(), 12.5)]),
            ..Default::default()
        });
        let mut listener = media.listen();

        media.load("/a.mp4");
        media.load("/b.mp4");

        assert_eq!(
            drain(&mut listener),
            vec![
                MediaEvent::MetadataReady { duration: 12.5 },
                MediaEvent::MetadataReady { duration: 30.0 },
            ]
        );
        assert_eq!(media.src(), Some("/b.mp4"));
    }

    #[test]
    fn play_without_source_is_rejected() {
        let mut media = SimulatedMedia::default();

        assert!(matches!(media.play().try_outcome(), Some(Err(_))));
    }

    #[test]
    fn blocked_autoplay_rejects_until_a_tick_passes() {
        let mut media = SimulatedMedia::new(SimulatedMediaConfig {
            block_autoplay: true,
            ..Default::default()
        });
        media.load("/a.mp4");

        let rejected = media.play().try_outcome();
        assert!(matches!(rejected, Some(Err(ref e)) if e.reason == "autoplay blocked"));
        assert!(!media.is_playing());

        media.tick();

        assert_eq!(media.play().try_outcome(), Some(Ok(())));
        assert!(media.is_playing());
    }

    #[test]
    fn loading_while_playing_stops_first() {
        let mut media = SimulatedMedia::default();
        media.load("/a.mp4");
        assert_eq!(media.play().try_outcome(), Some(Ok(())));
        let mut listener = media.listen();

        media.load("/b.mp4");

        assert_eq!(
            drain(&mut listener),
            vec![
                MediaEvent::PlayStopped,
                MediaEvent::MetadataReady { duration: 30.0 },
            ]
        );
    }

    #[test]
    fn volume_events_only_fire_on_change() {
        let mut media = SimulatedMedia::default();
        let mut listener = media.listen();

        media.set_volume(1.0);
        media.set_volume(0.4);
        media.set_muted(true);
        media.set_muted(true);

        assert_eq!(
            drain(&mut listener),
            vec![
                MediaEvent::VolumeChanged {
                    volume: 0.4,
                    muted: false
                },
                MediaEvent::VolumeChanged {
                    volume: 0.4,
                    muted: true
                },
            ]
        );
    }

    #[test]
    fn seeking_is_clamped_to_duration() {
        let mut media = SimulatedMedia::default();
        media.load("/a.mp4");

        media.set_current_time(99.0);
        assert_eq!(media.current_time(), 30.0);

        media.set_current_time(-4.0);
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn tick_past_the_end_stops_and_ends() {
        let mut media = SimulatedMedia::new(SimulatedMediaConfig {
            default_duration: 0.01,
            ..Default::default()
        });
        media.load("/a.mp4");
        media.tick();
        assert_eq!(media.play().try_outcome(), Some(Ok(())));
        let mut listener = media.listen();

        std::thread::sleep(Duration::from_millis(30));
        media.tick();

        assert_eq!(
            drain(&mut listener),
            vec![
                MediaEvent::TimeAdvanced { current_time: 0.01 },
                MediaEvent::PlayStopped,
                MediaEvent::Ended,
            ]
        );
        assert!(!media.is_playing());
    }
}
