use ratatui::{layout::Flex, prelude::*, widgets::*};
use video_player_controls::notification::Notification;

use crate::{
    app::{App, AppState},
    now_playing,
};

impl App {
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let [main, message] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        let [player, playlist] =
            Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
                .areas(main);

        now_playing::render(frame, player, &self.playlist, &self.playback);
        self.playlist_panel.render(
            frame,
            playlist,
            &self.playlist,
            self.playback.current_index,
        );

        render_message(frame, message, self.message.as_ref());

        if matches!(self.app_state, AppState::Help) {
            render_help(frame);
        }
    }
}

pub(crate) fn center(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

fn render_message(frame: &mut Frame, area: Rect, message: Option<&Notification>) {
    let line = match message {
        Some(Notification::Warning(text)) => {
            Line::from(format!(" {text}")).style(Style::default().fg(Color::Yellow))
        }
        Some(Notification::Info(text)) => Line::from(format!(" {text}")),
        None => Line::from(" h: help").style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(line, area);
}

fn render_help(frame: &mut Frame) {
    let rows = [
        ["Play / pause", "space"],
        ["Forward 10 seconds", "f, →"],
        ["Back 10 seconds", "b, ←"],
        ["Volume up / down", "+, -"],
        ["Mute", "m"],
        ["Up/Down", "Select in playlist"],
        ["Enter", "Play selected video"],
        ["Esc", "Dismiss message"],
        ["q", "Exit"],
    ];

    let max_left = rows.iter().map(|x| x[0].len()).max().unwrap_or(0);
    let max_right = rows.iter().map(|x| x[1].len()).max().unwrap_or(0);
    let max = max_left + max_right;

    let rows: Vec<_> = rows.into_iter().map(Row::new).collect();

    let area = center(
        frame.area(),
        Constraint::Length(max as u16 + 2 + 9),
        Constraint::Length(rows.len() as u16 + 2),
    );

    let table = Table::default().rows(rows).block(block("Help"));

    frame.render_widget(Clear, area);
    frame.render_widget(table, area);
}

const ROW_HIGHLIGHT_STYLE: Style = Style::new().bg(Color::Magenta);

pub(crate) fn block(title: &str) -> Block<'_> {
    Block::bordered()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .border_type(BorderType::Rounded)
}

pub(crate) fn basic_list_table<'a>(rows: Vec<Row<'a>>, title: &'a str) -> Table<'a> {
    Table::new(
        rows,
        [Constraint::Fill(2), Constraint::Fill(1), Constraint::Fill(1)],
    )
        .block(block(title))
        .row_highlight_style(ROW_HIGHLIGHT_STYLE)
}
