//! Full-screen dashboard layout

use super::app::App;
use super::theme::ThemeColors;
use super::widgets::{CountersPanel, HelpPanel, HistoryPanel, SpeedPanel, StatusBar, TopKeysPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

/// Draw one frame of the dashboard
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = ThemeColors::from_theme(app.config.display.theme);
    let size = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Counters and speed
            Constraint::Min(8),    // Top keys and history
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    let stats = app.snapshot();

    if app.show_help {
        frame.render_widget(HelpPanel::new(theme), rows[0].union(rows[1]));
    } else {
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);
        frame.render_widget(CountersPanel::new(&stats, theme), top[0]);
        frame.render_widget(SpeedPanel::new(&stats, theme), top[1]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        frame.render_widget(TopKeysPanel::new(&stats, theme), bottom[0]);
        frame.render_widget(HistoryPanel::new(&stats, theme), bottom[1]);
    }

    let elapsed = app.elapsed_formatted();
    let status = StatusBar::new(stats.save_pending, &elapsed, app.total_events, theme)
        .message(app.get_status());
    frame.render_widget(status, rows[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::keyboard::KeyTransition;
    use crate::stats::{KeystrokeStats, ManualClock};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn app() -> App {
        let config = Config::default();
        let stats = Arc::new(
            KeystrokeStats::new(config.stats.clone(), Arc::new(ManualClock::new(0)))
                .expect("valid config"),
        );
        App::new(config, stats)
    }

    #[test]
    fn renders_all_panels() {
        let mut app = app();
        app.process_event(&KeyTransition::press(30, 10));

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        terminal.draw(|frame| draw(frame, &app)).expect("draw");

        let text = screen_text(&terminal);
        for title in ["Keystrokes", "Speed", "Top Keys", "Daily History", "Events: 1"] {
            assert!(text.contains(title), "missing {}", title);
        }
    }

    #[test]
    fn help_replaces_statistics() {
        let mut app = app();
        app.toggle_help();

        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        terminal.draw(|frame| draw(frame, &app)).expect("draw");

        let text = screen_text(&terminal);
        assert!(text.contains("CONTROLS"));
        assert!(!text.contains("Top Keys"));
    }
}
