use tokio::sync::broadcast::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Warning(String),
    Info(String),
}

/// Fan-out of user facing messages to the render layer.
#[derive(Debug)]
pub struct NotificationBroadcast {
    tx: Sender<Notification>,
    rx: Receiver<Notification>,
}

impl NotificationBroadcast {
    pub fn new() -> Self {
        let (tx, rx) = broadcast::channel(20);
        Self { tx, rx }
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        self.rx.resubscribe()
    }

    pub fn send_warning(&self, message: String) {
        _ = self.tx.send(Notification::Warning(message));
    }

    pub fn send_info(&self, message: String) {
        _ = self.tx.send(Notification::Info(message));
    }
}

impl Default for NotificationBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_messages_sent_after_subscribing() {
        let broadcast = NotificationBroadcast::new();
        let mut receiver = broadcast.subscribe();

        broadcast.send_warning("autoplay blocked".to_string());

        assert_eq!(
            receiver.try_recv().unwrap(),
            Notification::Warning("autoplay blocked".to_string())
        );
    }
}
