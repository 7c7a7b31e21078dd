use ratatui::{prelude::*, style::Styled, widgets::*};
use video_player_controls::playlist::Playlist;

use crate::ui::basic_list_table;

pub(crate) struct PlaylistPanel {
    pub(crate) state: TableState,
}

impl PlaylistPanel {
    pub(crate) fn new(selected: usize) -> Self {
        Self {
            state: TableState::default().with_selected(Some(selected)),
        }
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub(crate) fn select_next(&mut self, playlist: &Playlist) {
        let next = self
            .state
            .selected()
            .map_or(0, |index| playlist.next_index(index));
        self.state.select(Some(next));
    }

    pub(crate) fn select_previous(&mut self, playlist: &Playlist) {
        let previous = self
            .state
            .selected()
            .map_or(0, |index| playlist.previous_index(index));
        self.state.select(Some(previous));
    }

    pub(crate) fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        playlist: &Playlist,
        current_index: usize,
    ) {
        let rows = playlist
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let (marker, style) = if index == current_index {
                    ("▶ ", Style::default().add_modifier(Modifier::BOLD))
                } else {
                    ("  ", Style::default())
                };

                Row::new(vec![
                    Line::from(vec![
                        marker.into(),
                        entry.title.clone().set_style(style),
                    ]),
                    Line::from(entry.artist.clone()).style(Style::default().fg(Color::Magenta)),
                    Line::from(entry.thumbnail.clone()).style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        let table = basic_list_table(rows, "Playlist");
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_around_playlist() {
        let playlist = Playlist::builtin();
        let mut panel = PlaylistPanel::new(0);

        panel.select_previous(&playlist);
        assert_eq!(panel.selected(), Some(2));

        panel.select_next(&playlist);
        assert_eq!(panel.selected(), Some(0));

        panel.select_next(&playlist);
        panel.select_next(&playlist);
        assert_eq!(panel.selected(), Some(2));
    }

    #[test]
    fn rows_show_thumbnail() {
        let playlist = Playlist::builtin();
        let mut panel = PlaylistPanel::new(0);
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(120, 8)).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                panel.render(frame, area, &playlist, 1);
            })
            .unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("/assets/video1_cover.png"));
        assert!(screen.contains("▶ Video 1"));
    }
}
