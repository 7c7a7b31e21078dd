use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    SelectEntry { index: usize },
    PlayPause,
    Seek { time: f64 },
    JumpForward,
    JumpBackward,
    SetVolume { volume: f64 },
    ToggleMute,
    Quit,
}

/// Handle the render layer uses to drive the player.
#[derive(Debug, Clone)]
pub struct Controls {
    tx: UnboundedSender<ControlCommand>,
}

impl Controls {
    pub fn new(tx: UnboundedSender<ControlCommand>) -> Self {
        Self { tx }
    }

    fn send(&self, command: ControlCommand) {
        if self.tx.send(command).is_err() {
            tracing::debug!("player loop has stopped, dropping command");
        }
    }

    pub fn select_entry(&self, index: usize) {
        self.send(ControlCommand::SelectEntry { index });
    }

    pub fn play_pause(&self) {
        self.send(ControlCommand::PlayPause);
    }

    pub fn seek(&self, time: f64) {
        self.send(ControlCommand::Seek { time });
    }

    pub fn jump_forward(&self) {
        self.send(ControlCommand::JumpForward);
    }

    pub fn jump_backward(&self) {
        self.send(ControlCommand::JumpBackward);
    }

    pub fn set_volume(&self, volume: f64) {
        self.send(ControlCommand::SetVolume { volume });
    }

    pub fn toggle_mute(&self) {
        self.send(ControlCommand::ToggleMute);
    }

    pub fn quit(&self) {
        self.send(ControlCommand::Quit);
    }
}
