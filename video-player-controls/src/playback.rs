/// Lifecycle of the current entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No media primitive bound yet.
    #[default]
    Idle,
    /// Source handed to the primitive, waiting for metadata.
    Loading,
    Ready,
    Playing,
    /// Reached the end; the next entry is about to load.
    Ended,
}

/// Mirror of the primitive's state that the render layer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub status: Status,
    pub playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub prev_volume: f64,
}

impl PlaybackState {
    pub fn new(current_index: usize, volume: f64) -> Self {
        let volume = clamp_volume(volume);

        Self {
            current_index,
            status: Status::Idle,
            playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume,
            muted: false,
            prev_volume: volume,
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.duration - self.current_time).max(0.0)
    }

    /// Position as a fraction of the duration, for scrub bars.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Volume the user hears, zero while muted.
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub(crate) fn reset_for_entry(&mut self, index: usize) {
        self.current_index = index;
        self.status = Status::Loading;
        self.playing = false;
        self.current_time = 0.0;
        self.duration = 0.0;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(0, 1.0)
    }
}

pub(crate) fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        return 1.0;
    }
    volume.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_never_goes_negative() {
        let state = PlaybackState {
            current_time: 12.0,
            duration: 10.0,
            ..Default::default()
        };

        assert_eq!(state.remaining(), 0.0);
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn progress_is_zero_without_duration() {
        let state = PlaybackState::default();

        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn muted_state_reports_silent_volume() {
        let state = PlaybackState {
            volume: 0.6,
            muted: true,
            ..Default::default()
        };

        assert_eq!(state.effective_volume(), 0.0);
    }

    #[test]
    fn initial_volume_is_clamped() {
        let state = PlaybackState::new(0, 3.0);

        assert_eq!(state.volume, 1.0);
        assert_eq!(state.prev_volume, 1.0);
    }
}
