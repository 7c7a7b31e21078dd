use std::io;

use ratatui::{
    DefaultTerminal,
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
};
use tokio::{
    sync::broadcast::Receiver,
    time::{self, Duration},
};
use video_player_controls::{
    StateReceiver, controls::Controls, notification::Notification, playback::PlaybackState,
    playlist::Playlist,
};

use crate::playlist::PlaylistPanel;

const VOLUME_STEP: f64 = 0.05;

pub(crate) struct App {
    pub(crate) controls: Controls,
    pub(crate) state: StateReceiver,
    pub(crate) notifications: Receiver<Notification>,
    pub(crate) playlist: Playlist,
    pub(crate) playback: PlaybackState,
    pub(crate) playlist_panel: PlaylistPanel,
    pub(crate) message: Option<Notification>,
    pub(crate) app_state: AppState,
    pub(crate) exit: bool,
    pub(crate) should_draw: bool,
}

#[derive(Default, Debug, PartialEq)]
pub(crate) enum AppState {
    #[default]
    Normal,
    Help,
}

impl App {
    pub(crate) async fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        let mut tick_interval = time::interval(Duration::from_millis(10));

        while !self.exit {
            tokio::select! {
                Ok(_) = self.state.changed() => {
                    self.playback = self.state.borrow_and_update().clone();
                    self.should_draw = true;
                },
                Ok(notification) = self.notifications.recv() => {
                    self.message = Some(notification);
                    self.should_draw = true;
                },
                _ = tick_interval.tick() => {
                    if event::poll(Duration::from_millis(0))? {
                        self.handle_events()?;
                    }
                }
            }

            if self.should_draw {
                terminal.draw(|frame| self.render(frame))?;
                self.should_draw = false;
            }
        }

        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key(key_event.code);
            }
            Event::Resize(_, _) => self.should_draw = true,
            _ => {}
        };
        Ok(())
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) {
        self.should_draw = true;

        if self.app_state == AppState::Help {
            self.app_state = AppState::Normal;
            return;
        }

        match code {
            KeyCode::Char('h') => self.app_state = AppState::Help,
            KeyCode::Char('q') => self.exit = true,
            KeyCode::Char(' ') => self.controls.play_pause(),
            KeyCode::Char('f') | KeyCode::Right => self.controls.jump_forward(),
            KeyCode::Char('b') | KeyCode::Left => self.controls.jump_backward(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.controls.set_volume(self.playback.volume + VOLUME_STEP)
            }
            KeyCode::Char('-') => self.controls.set_volume(self.playback.volume - VOLUME_STEP),
            KeyCode::Char('m') => self.controls.toggle_mute(),
            KeyCode::Down => self.playlist_panel.select_next(&self.playlist),
            KeyCode::Up => self.playlist_panel.select_previous(&self.playlist),
            KeyCode::Enter => {
                if let Some(index) = self.playlist_panel.selected() {
                    self.message = None;
                    self.controls.select_entry(index);
                }
            }
            KeyCode::Esc => self.message = None,
            _ => self.should_draw = false,
        }
    }
}
