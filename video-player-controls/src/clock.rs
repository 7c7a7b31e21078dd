use std::time::Instant;

/// Wall-clock backed playback position, in seconds.
#[derive(Debug)]
pub struct PlaybackClock {
    started_at: Option<Instant>,
    offset: f64,
    rate: f64,
}

impl PlaybackClock {
    pub(crate) fn new() -> Self {
        Self {
            started_at: None,
            offset: 0.0,
            rate: 1.0,
        }
    }

    /// Speed multiplier applied to elapsed wall time.
    pub(crate) fn with_rate(rate: f64) -> Self {
        Self {
            rate: rate.max(0.0),
            ..Self::new()
        }
    }

    pub(crate) fn reset(&mut self) {
        self.started_at = None;
        self.offset = 0.0;
    }

    pub(crate) fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(crate) fn stop(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.offset += start.elapsed().as_secs_f64() * self.rate;
        }
    }

    pub(crate) fn position(&self) -> f64 {
        match self.started_at {
            Some(start) => self.offset + start.elapsed().as_secs_f64() * self.rate,
            None => self.offset,
        }
    }

    pub(crate) fn set_position(&mut self, seconds: f64) {
        self.offset = seconds;

        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn resume_accumulates_position() {
        let mut clock = PlaybackClock::new();

        clock.start();
        std::thread::sleep(Duration::from_millis(50));
        clock.stop();
        let first = clock.position();
        assert!(first >= 0.05);

        clock.start();
        std::thread::sleep(Duration::from_millis(50));
        clock.stop();

        assert!(clock.position() >= first + 0.05);
    }

    #[test]
    fn stopped_clock_does_not_advance() {
        let mut clock = PlaybackClock::new();

        clock.start();
        std::thread::sleep(Duration::from_millis(20));
        clock.stop();
        let stopped = clock.position();
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(clock.position(), stopped);
    }

    #[test]
    fn set_position_overrides_elapsed_time() {
        let mut clock = PlaybackClock::with_rate(2.0);

        clock.set_position(42.0);
        assert_eq!(clock.position(), 42.0);

        clock.reset();
        assert_eq!(clock.position(), 0.0);
    }
}
