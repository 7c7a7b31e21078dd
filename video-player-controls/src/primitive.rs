use std::sync::{Arc, Mutex, Weak};

use snafu::prelude::*;
use tokio::sync::{
    mpsc::{self, UnboundedReceiver, UnboundedSender},
    oneshot,
};

/// Signals a media primitive emits while it plays an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    MetadataReady { duration: f64 },
    TimeAdvanced { current_time: f64 },
    PlayStarted,
    PlayStopped,
    /// The primitive owns volume and mute; this carries both.
    VolumeChanged { volume: f64, muted: bool },
    Ended,
}

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(display("play request rejected: {reason}"))]
pub struct PlayRejected {
    pub reason: String,
}

impl PlayRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type PlayOutcome = Result<(), PlayRejected>;

/// Deferred completion of a play command.
#[derive(Debug)]
pub struct PlayRequest {
    rx: oneshot::Receiver<PlayOutcome>,
}

/// Completes the [`PlayRequest`] it was created with.
#[derive(Debug)]
pub struct PlayResolver {
    tx: oneshot::Sender<PlayOutcome>,
}

impl PlayRequest {
    pub fn pending() -> (Self, PlayResolver) {
        let (tx, rx) = oneshot::channel();
        (Self { rx }, PlayResolver { tx })
    }

    pub fn resolved() -> Self {
        let (request, resolver) = Self::pending();
        resolver.resolve();
        request
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        let (request, resolver) = Self::pending();
        resolver.reject(reason);
        request
    }

    /// Outcome if the primitive has settled the request already.
    pub fn try_outcome(&mut self) -> Option<PlayOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(abandoned())),
        }
    }

    pub async fn outcome(&mut self) -> PlayOutcome {
        (&mut self.rx).await.unwrap_or_else(|_| Err(abandoned()))
    }
}

impl PlayResolver {
    pub fn resolve(self) {
        _ = self.tx.send(Ok(()));
    }

    pub fn reject(self, reason: impl Into<String>) {
        _ = self.tx.send(Err(PlayRejected::new(reason)));
    }
}

fn abandoned() -> PlayRejected {
    PlayRejected::new("play request dropped before completion")
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    senders: Vec<(u64, UnboundedSender<MediaEvent>)>,
}

/// Listener registry a primitive embeds to deliver its events.
#[derive(Debug, Default, Clone)]
pub struct EventHub {
    registry: Arc<Mutex<Registry>>,
}

impl EventHub {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn listen(&self) -> Listener {
        let (tx, rx) = mpsc::unbounded_channel();

        let id = match self.registry.lock() {
            Ok(mut registry) => {
                let id = registry.next_id;
                registry.next_id += 1;
                registry.senders.push((id, tx));
                id
            }
            Err(_) => u64::MAX,
        };

        Listener {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn emit(&self, event: MediaEvent) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.senders.retain(|(_, tx)| tx.send(event).is_ok());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.senders.len())
            .unwrap_or(0)
    }
}

/// Registration on an [`EventHub`]. Dropping it deregisters and discards
/// anything still queued.
#[derive(Debug)]
pub struct Listener {
    id: u64,
    rx: UnboundedReceiver<MediaEvent>,
    registry: Weak<Mutex<Registry>>,
}

impl Listener {
    pub async fn recv(&mut self) -> Option<MediaEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<MediaEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade()
            && let Ok(mut registry) = registry.lock()
        {
            registry.senders.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Host-provided playable media the player binds to.
pub trait MediaPrimitive {
    /// Replaces the source and starts loading it. Metadata arrives later as
    /// [`MediaEvent::MetadataReady`].
    fn load(&mut self, src: &str);

    fn play(&mut self) -> PlayRequest;

    fn pause(&mut self);

    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    fn duration(&self) -> f64;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn listen(&mut self) -> Listener;

    /// Gives primitives without their own clock a chance to advance.
    fn tick(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_reach_every_listener() {
        let hub = EventHub::new();
        let mut first = hub.listen();
        let mut second = hub.listen();

        hub.emit(MediaEvent::PlayStarted);

        assert_eq!(first.try_recv(), Some(MediaEvent::PlayStarted));
        assert_eq!(second.try_recv(), Some(MediaEvent::PlayStarted));
    }

    #[test]
    fn dropped_listener_is_deregistered() {
        let hub = EventHub::new();
        let stale = hub.listen();
        let mut current = hub.listen();
        assert_eq!(hub.listener_count(), 2);

        drop(stale);
        hub.emit(MediaEvent::Ended);

        assert_eq!(hub.listener_count(), 1);
        assert_eq!(current.try_recv(), Some(MediaEvent::Ended));
        assert_eq!(current.try_recv(), None);
    }

    #[test]
    fn listener_outliving_hub_drops_cleanly() {
        let hub = EventHub::new();
        let mut listener = hub.listen();
        drop(hub);

        assert_eq!(listener.try_recv(), None);
        drop(listener);
    }

    #[test]
    fn play_request_reports_outcome_once_settled() {
        let (mut request, resolver) = PlayRequest::pending();
        assert_eq!(request.try_outcome(), None);

        resolver.reject("autoplay blocked");

        assert_eq!(
            request.try_outcome(),
            Some(Err(PlayRejected::new("autoplay blocked")))
        );
    }

    #[test]
    fn abandoned_request_counts_as_rejected() {
        let (mut request, resolver) = PlayRequest::pending();
        drop(resolver);

        assert!(matches!(request.try_outcome(), Some(Err(_))));
    }

    #[tokio::test]
    async fn resolved_request_awaits_to_ok() {
        let mut request = PlayRequest::resolved();

        assert_eq!(request.outcome().await, Ok(()));
    }
}
