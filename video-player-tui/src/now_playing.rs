use crate::ui::block;
use ratatui::{prelude::*, widgets::*};
use video_player_controls::{Status, format_time, playback::PlaybackState, playlist::Playlist};

pub(crate) fn render(frame: &mut Frame, area: Rect, playlist: &Playlist, playback: &PlaybackState) {
    let entry = match playlist.get(playback.current_index) {
        Some(entry) => entry,
        None => return,
    };

    let title = status_title(playback.status);
    let block = block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [info, scrub, transport, volume] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .areas(inner);

    let lines = vec![
        Line::from(entry.title.clone()).style(Style::new().bold()),
        Line::from(entry.artist.clone()).style(Style::new().fg(Color::Magenta)),
        Line::from(format!(
            "{} of {}",
            playback.current_index + 1,
            playlist.len()
        ))
        .style(Style::new().fg(Color::DarkGray)),
    ];
    frame.render_widget(Text::from(lines).centered(), info);

    render_scrub_bar(frame, scrub, playback);

    let play_symbol = if playback.playing { "⏸" } else { "⏵" };
    let transport_line = Line::from(format!("⏪ b    {play_symbol} space    f ⏩")).centered();
    frame.render_widget(transport_line, transport);

    render_volume(frame, volume, playback);
}

fn render_scrub_bar(frame: &mut Frame, area: Rect, playback: &PlaybackState) {
    let (elapsed, right) = time_labels(playback);

    let [elapsed_area, gauge_area, right_area] = Layout::horizontal([
        Constraint::Length(elapsed.len() as u16 + 1),
        Constraint::Min(1),
        Constraint::Length(right.len() as u16 + 1),
    ])
    .areas(area);

    let gauge = LineGauge::default()
        .ratio(playback.progress())
        .label("")
        .filled_style(Style::default().fg(Color::Magenta));

    frame.render_widget(Line::from(elapsed), elapsed_area);
    frame.render_widget(gauge, gauge_area);
    frame.render_widget(Line::from(right).right_aligned(), right_area);
}

fn render_volume(frame: &mut Frame, area: Rect, playback: &PlaybackState) {
    let symbol = if playback.muted || playback.volume == 0.0 {
        "🔇"
    } else {
        "🔊"
    };

    let [symbol_area, gauge_area] =
        Layout::horizontal([Constraint::Length(4), Constraint::Min(1)]).areas(area);

    let gauge = LineGauge::default()
        .ratio(playback.effective_volume())
        .label("")
        .filled_style(Style::default().fg(Color::Magenta));

    frame.render_widget(Line::from(symbol), symbol_area);
    frame.render_widget(gauge, gauge_area);
}

/// Elapsed time, and either the remaining time (while playing a known
/// duration) or the full duration.
pub(crate) fn time_labels(playback: &PlaybackState) -> (String, String) {
    let elapsed = format_time(playback.current_time);

    let right = if playback.playing && playback.duration > 0.0 {
        format!("-{}", format_time(playback.remaining()))
    } else {
        format_time(playback.duration)
    };

    (elapsed, right)
}

fn status_title(status: Status) -> &'static str {
    match status {
        Status::Idle => "Idle",
        Status::Loading => "Loading",
        Status::Ready => "Paused ⏸",
        Status::Playing => "Playing ⏵",
        Status::Ended => "Ended",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_remaining_time_while_playing() {
        let playback = PlaybackState {
            playing: true,
            current_time: 65.4,
            duration: 130.0,
            ..Default::default()
        };

        assert_eq!(
            time_labels(&playback),
            ("1:05".to_string(), "-1:04".to_string())
        );
    }

    #[test]
    fn shows_duration_while_paused() {
        let playback = PlaybackState {
            playing: false,
            current_time: 5.0,
            duration: 600.0,
            ..Default::default()
        };

        assert_eq!(
            time_labels(&playback),
            ("0:05".to_string(), "10:00".to_string())
        );
    }

    #[test]
    fn renders_current_entry() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let playlist = Playlist::builtin();
        let playback = PlaybackState {
            current_index: 1,
            status: Status::Playing,
            ..Default::default()
        };

        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, &playlist, &playback)
            })
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Video 1"));
        assert!(content.contains("2 of 3"));
    }
}
