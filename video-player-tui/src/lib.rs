use std::io;

use app::App;
use playlist::PlaylistPanel;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::broadcast::Receiver;
use ui::center;
use video_player_controls::{
    StateReceiver, controls::Controls, notification::Notification, playlist::Playlist,
};

mod app;
mod now_playing;
mod playlist;
mod ui;

pub async fn init(
    playlist: Playlist,
    controls: Controls,
    state_receiver: StateReceiver,
    notifications: Receiver<Notification>,
) -> io::Result<()> {
    let mut terminal = ratatui::init();

    draw_loading_screen(&mut terminal);

    let playback = state_receiver.borrow().clone();
    let playlist_panel = PlaylistPanel::new(playback.current_index);

    let mut app = App {
        controls,
        state: state_receiver,
        notifications,
        playlist,
        playback,
        playlist_panel,
        message: None,
        app_state: Default::default(),
        exit: false,
        should_draw: true,
    };

    let result = app.run(&mut terminal).await;
    ratatui::restore();
    app.controls.quit();
    result
}

fn draw_loading_screen<B: Backend>(terminal: &mut Terminal<B>) {
    let banner = "video player";

    if let Err(err) = terminal.draw(|f| {
        let area = center(f.area(), Constraint::Length(24), Constraint::Length(1));
        let paragraph = Paragraph::new(banner).alignment(Alignment::Center);
        f.render_widget(paragraph, area);
    }) {
        tracing::debug!("unable to draw loading screen: {err}");
    }
}
