use std::{future, sync::Arc, time::Duration};

use tokio::{
    select,
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender},
        watch,
    },
    time::MissedTickBehavior,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    Result, StateReceiver,
    controls::{ControlCommand, Controls},
    error::InvalidIndexSnafu,
    models::MediaEntry,
    notification::NotificationBroadcast,
    playback::{PlaybackState, Status, clamp_volume},
    playlist::Playlist,
    primitive::{Listener, MediaEvent, MediaPrimitive, PlayOutcome, PlayRequest},
};

const JUMP_SECONDS: f64 = 10.0;

/// Owns the playlist and the mirrored playback state, and is the only writer
/// of the bound media primitive.
pub struct Player<P: MediaPrimitive> {
    playlist: Playlist,
    state: PlaybackState,
    primitive: Option<P>,
    listener: Option<Listener>,
    pending_play: Option<PlayRequest>,
    state_tx: watch::Sender<PlaybackState>,
    broadcast: Arc<NotificationBroadcast>,
    commands_tx: UnboundedSender<ControlCommand>,
    commands: UnboundedReceiver<ControlCommand>,
    tick_interval: Duration,
}

impl<P: MediaPrimitive> Player<P> {
    pub fn new(playlist: Playlist, start_index: usize) -> Result<Self> {
        snafu::ensure!(
            playlist.contains_index(start_index),
            InvalidIndexSnafu {
                index: start_index,
                len: playlist.len(),
            }
        );

        let state = PlaybackState::new(start_index, 1.0);
        let (state_tx, _) = watch::channel(state.clone());
        let (commands_tx, commands) = mpsc::unbounded_channel();

        Ok(Self {
            playlist,
            state,
            primitive: None,
            listener: None,
            pending_play: None,
            state_tx,
            broadcast: Arc::new(NotificationBroadcast::new()),
            commands_tx,
            commands,
            tick_interval: Duration::from_millis(500),
        })
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_entry(&self) -> Option<&MediaEntry> {
        self.playlist.get(self.state.current_index)
    }

    pub fn state_receiver(&self) -> StateReceiver {
        self.state_tx.subscribe()
    }

    pub fn broadcast(&self) -> Arc<NotificationBroadcast> {
        self.broadcast.clone()
    }

    pub fn controls(&self) -> Controls {
        Controls::new(self.commands_tx.clone())
    }

    pub fn primitive(&self) -> Option<&P> {
        self.primitive.as_ref()
    }

    pub fn primitive_mut(&mut self) -> Option<&mut P> {
        self.primitive.as_mut()
    }

    pub fn is_bound(&self) -> bool {
        self.primitive.is_some()
    }

    /// Binds a primitive and loads the current entry into it without
    /// starting playback.
    pub fn bind(&mut self, primitive: P) {
        self.unbind();

        self.state.volume = clamp_volume(primitive.volume());
        self.state.muted = primitive.muted();
        self.primitive = Some(primitive);

        self.begin_entry(self.state.current_index);
    }

    pub fn unbind(&mut self) -> Option<P> {
        let primitive = self.primitive.take()?;

        self.listener = None;
        self.pending_play = None;
        self.state.status = Status::Idle;
        self.state.playing = false;
        self.publish();

        Some(primitive)
    }

    /// Makes `index` the current entry, reloads the primitive and asks it to
    /// play.
    #[instrument(skip(self))]
    pub fn select_entry(&mut self, index: usize) -> Result<()> {
        snafu::ensure!(
            self.playlist.contains_index(index),
            InvalidIndexSnafu {
                index,
                len: self.playlist.len(),
            }
        );

        if !self.is_bound() {
            debug!("no media bound, ignoring entry selection");
            return Ok(());
        }

        self.begin_entry(index);
        self.request_play();
        Ok(())
    }

    pub fn play_pause(&mut self) {
        let Some(primitive) = self.primitive.as_mut() else {
            debug!("no media bound, ignoring play/pause");
            return;
        };

        if self.state.playing {
            primitive.pause();
        } else {
            self.request_play();
        }
    }

    /// Moves the playhead to `time`, clamped to the current duration.
    pub fn seek(&mut self, time: f64) {
        let Some(primitive) = self.primitive.as_mut() else {
            debug!("no media bound, ignoring seek");
            return;
        };

        if time.is_nan() {
            debug!("ignoring seek to NaN");
            return;
        }

        let time = time.clamp(0.0, self.state.duration);
        primitive.set_current_time(time);
        self.state.current_time = time;
        self.publish();
    }

    pub fn jump_forward(&mut self) {
        self.seek(self.state.current_time + JUMP_SECONDS);
    }

    pub fn jump_backward(&mut self) {
        self.seek(self.state.current_time - JUMP_SECONDS);
    }

    /// Forwards a clamped volume to the primitive. Mute is left alone.
    pub fn set_volume(&mut self, volume: f64) {
        let Some(primitive) = self.primitive.as_mut() else {
            debug!("no media bound, ignoring volume change");
            return;
        };

        if volume.is_nan() {
            debug!("ignoring NaN volume");
            return;
        }

        let volume = clamp_volume(volume);
        primitive.set_volume(volume);
        self.state.volume = volume;
        self.publish();
    }

    pub fn toggle_mute(&mut self) {
        let Some(primitive) = self.primitive.as_mut() else {
            debug!("no media bound, ignoring mute toggle");
            return;
        };

        if self.state.muted {
            primitive.set_volume(self.state.prev_volume);
            primitive.set_muted(false);
            self.state.volume = self.state.prev_volume;
            self.state.muted = false;
        } else {
            self.state.prev_volume = clamp_volume(primitive.volume());
            primitive.set_muted(true);
            self.state.muted = true;
        }

        self.publish();
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        if !self.is_bound() {
            debug!(?event, "no media bound, ignoring media event");
            return;
        }

        debug!(?event, status = ?self.state.status, "media event");

        match event {
            MediaEvent::MetadataReady { duration } => {
                self.state.duration = if duration.is_finite() {
                    duration.max(0.0)
                } else {
                    debug!(duration, "non-finite duration, treating as 0");
                    0.0
                };
                let current_time = self
                    .primitive
                    .as_ref()
                    .map(|primitive| primitive.current_time())
                    .unwrap_or_default();
                self.state.current_time = current_time.clamp(0.0, self.state.duration);
                if self.state.status == Status::Loading {
                    self.state.status = Status::Ready;
                }
            }
            MediaEvent::TimeAdvanced { current_time } => {
                if !current_time.is_nan() {
                    self.state.current_time = current_time.clamp(0.0, self.state.duration);
                }
            }
            MediaEvent::PlayStarted => {
                self.state.playing = true;
                self.state.status = Status::Playing;
            }
            MediaEvent::PlayStopped => {
                self.state.playing = false;
                if self.state.status == Status::Playing {
                    self.state.status = Status::Ready;
                }
            }
            MediaEvent::VolumeChanged { volume, muted } => {
                self.state.volume = clamp_volume(volume);
                self.state.muted = muted;
            }
            MediaEvent::Ended => {
                self.state.playing = false;
                self.state.status = Status::Ended;
                self.publish();

                let next = self.playlist.next_index(self.state.current_index);
                if let Some(entry) = self.playlist.get(next) {
                    self.broadcast.send_info(format!("Up next: {}", entry.title));
                }
                self.begin_entry(next);
                self.request_play();
                return;
            }
        }

        self.publish();
    }

    /// Handles the completion of a play command. A rejection is logged and
    /// reported as a warning; it never fails the player.
    pub fn settle_play(&mut self, outcome: PlayOutcome) {
        self.pending_play = None;

        if let Err(rejected) = outcome {
            warn!(%rejected, "playback did not start");
            self.broadcast
                .send_warning(format!("Playback did not start: {}", rejected.reason));
            self.publish();
        }
    }

    /// Processes everything the primitive has already delivered without
    /// waiting. Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        if let Some(outcome) = self.pending_play.as_mut().and_then(|p| p.try_outcome()) {
            self.settle_play(outcome);
        }

        let mut handled = 0;
        while let Some(event) = self.listener.as_mut().and_then(|l| l.try_recv()) {
            self.handle_event(event);
            handled += 1;
        }

        handled
    }

    /// Returns `true` when the loop should stop.
    fn handle_command(&mut self, command: ControlCommand) -> bool {
        debug!(?command, "control command");

        match command {
            ControlCommand::SelectEntry { index } => {
                if let Err(err) = self.select_entry(index) {
                    warn!(%err, "entry selection rejected");
                }
            }
            ControlCommand::PlayPause => self.play_pause(),
            ControlCommand::Seek { time } => self.seek(time),
            ControlCommand::JumpForward => self.jump_forward(),
            ControlCommand::JumpBackward => self.jump_backward(),
            ControlCommand::SetVolume { volume } => self.set_volume(volume),
            ControlCommand::ToggleMute => self.toggle_mute(),
            ControlCommand::Quit => return true,
        }

        false
    }

    pub async fn player_loop(&mut self) -> Result<()> {
        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            select! {
                Some(command) = self.commands.recv() => {
                    if self.handle_command(command) {
                        break;
                    }
                }

                event = next_event(&mut self.listener) => {
                    self.handle_event(event);
                }

                outcome = play_outcome(&mut self.pending_play) => {
                    self.settle_play(outcome);
                }

                _ = interval.tick() => {
                    if let Some(primitive) = self.primitive.as_mut() {
                        primitive.tick();
                    }
                }
            }
        }

        info!("player loop stopped");
        Ok(())
    }

    /// Starts the lifecycle of `index`: the previous listener and any pending
    /// play completion are released before the new source loads.
    fn begin_entry(&mut self, index: usize) {
        let Some(primitive) = self.primitive.as_mut() else {
            return;
        };
        let Some(entry) = self.playlist.get(index) else {
            return;
        };

        self.listener = None;
        self.pending_play = None;
        self.listener = Some(primitive.listen());
        self.state.reset_for_entry(index);

        info!(index, title = %entry.title, src = %entry.src, "loading entry");
        primitive.load(&entry.src);
        self.publish();
    }

    fn request_play(&mut self) {
        let Some(primitive) = self.primitive.as_mut() else {
            return;
        };

        let mut request = primitive.play();
        match request.try_outcome() {
            Some(outcome) => self.settle_play(outcome),
            None => self.pending_play = Some(request),
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

async fn next_event(listener: &mut Option<Listener>) -> MediaEvent {
    if let Some(listener) = listener
        && let Some(event) = listener.recv().await
    {
        return event;
    }

    future::pending().await
}

async fn play_outcome(pending: &mut Option<PlayRequest>) -> PlayOutcome {
    match pending {
        Some(request) => request.outcome().await,
        None => future::pending().await,
    }
}
