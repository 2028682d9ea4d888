//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::keyboard::key_label;
use crate::stats::{DailyEntry, StatsSnapshot};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

fn panel<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(theme.dim))
}

fn label_value<'a>(label: &'a str, value: String, theme: &ThemeColors) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{:<14}", label),
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.accent)),
    ])
}

fn render_lines(lines: &[Line<'_>], inner: Rect, buf: &mut Buffer) {
    for (i, line) in lines.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
    }
}

/// Today / yesterday / lifetime counters
pub struct CountersPanel<'a> {
    stats: &'a StatsSnapshot,
    theme: ThemeColors,
}

impl<'a> CountersPanel<'a> {
    pub fn new(stats: &'a StatsSnapshot, theme: ThemeColors) -> Self {
        Self { stats, theme }
    }
}

impl<'a> Widget for CountersPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Keystrokes ", &self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            label_value("Today", self.stats.today_keystrokes.to_string(), &self.theme),
            label_value(
                "Yesterday",
                self.stats.yesterday_keystrokes.to_string(),
                &self.theme,
            ),
            label_value("Total", self.stats.total_keystrokes.to_string(), &self.theme),
            label_value(
                "Uptime day",
                self.stats.current_uptime_day.to_string(),
                &self.theme,
            ),
        ];
        render_lines(&lines, inner, buf);
    }
}

/// Session and typing speed
pub struct SpeedPanel<'a> {
    stats: &'a StatsSnapshot,
    theme: ThemeColors,
}

impl<'a> SpeedPanel<'a> {
    pub fn new(stats: &'a StatsSnapshot, theme: ThemeColors) -> Self {
        Self { stats, theme }
    }
}

impl<'a> Widget for SpeedPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Speed ", &self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let theme = &self.theme;
        let mut lines = Vec::new();
        match &self.stats.session {
            Some(session) => {
                lines.push(label_value("Session", session.keystrokes.to_string(), theme))
            }
            None => lines.push(label_value("Session", "disabled".to_string(), theme)),
        }
        match &self.stats.wpm {
            Some(wpm) => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<14}", "WPM"),
                        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        wpm.current.to_string(),
                        Style::default().fg(theme.good).add_modifier(Modifier::BOLD),
                    ),
                ]));
                lines.push(label_value("Average", wpm.average.to_string(), theme));
                lines.push(label_value("Peak", wpm.peak.to_string(), theme));
                lines.push(label_value(
                    "Typing time",
                    format_duration_ms(wpm.total_typing_time_ms as u64),
                    theme,
                ));
            }
            None => lines.push(label_value("WPM", "disabled".to_string(), theme)),
        }
        render_lines(&lines, inner, buf);
    }
}

/// `h:mm:ss` or `mm:ss`
pub fn format_duration_ms(ms: u64) -> String {
    let secs = ms / 1000;
    let (hours, mins, secs) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Most-used keys with a proportional bar
pub struct TopKeysPanel<'a> {
    stats: &'a StatsSnapshot,
    theme: ThemeColors,
}

impl<'a> TopKeysPanel<'a> {
    pub fn new(stats: &'a StatsSnapshot, theme: ThemeColors) -> Self {
        Self { stats, theme }
    }
}

impl<'a> Widget for TopKeysPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Top Keys ", &self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(heatmap) = &self.stats.heatmap else {
            buf.set_string(
                inner.x,
                inner.y,
                "Heatmap disabled",
                Style::default().fg(self.theme.dim),
            );
            return;
        };

        let entries: Vec<_> = heatmap.top_keys.iter().filter(|e| e.count > 0).collect();
        if entries.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                "No keys pressed yet",
                Style::default().fg(self.theme.dim),
            );
            return;
        }

        // "#10 Space   12345 " before the bar
        let prefix_width = 19u16;
        let bar_width = inner.width.saturating_sub(prefix_width) as u64;
        let max = entries[0].count.max(1) as u64;

        let lines: Vec<Line> = entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                let filled = (entry.count as u64 * bar_width / max) as usize;
                Line::from(vec![
                    Span::styled(
                        format!("#{:<2} ", rank + 1),
                        Style::default().fg(self.theme.dim),
                    ),
                    Span::styled(
                        format!("{:<7}", key_label(entry.position)),
                        Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{:>6} ", entry.count),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::styled("█".repeat(filled), Style::default().fg(self.theme.bar)),
                ])
            })
            .collect();
        render_lines(&lines, inner, buf);
    }
}

/// Completed days, oldest first, as horizontal bars
pub struct HistoryPanel<'a> {
    history: Option<&'a [DailyEntry]>,
    theme: ThemeColors,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(stats: &'a StatsSnapshot, theme: ThemeColors) -> Self {
        Self {
            history: stats.daily_stats.as_deref(),
            theme,
        }
    }
}

impl<'a> Widget for HistoryPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Daily History ", &self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let message = match self.history {
            None => Some("History disabled"),
            Some([]) => Some("No completed days yet"),
            Some(_) => None,
        };
        if let Some(message) = message {
            buf.set_string(inner.x, inner.y, message, Style::default().fg(self.theme.dim));
            return;
        }

        let history = self.history.unwrap_or_default();
        let bar_width = inner.width.saturating_sub(18) as u64;
        let max = history.iter().map(|e| e.keystrokes).max().unwrap_or(0).max(1) as u64;

        let lines: Vec<Line> = history
            .iter()
            .map(|entry| {
                let filled = (entry.keystrokes as u64 * bar_width / max) as usize;
                Line::from(vec![
                    Span::styled(
                        format!("Day {:<5} ", entry.day),
                        Style::default().fg(self.theme.fg),
                    ),
                    Span::styled(
                        format!("{:>7} ", entry.keystrokes),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::styled("█".repeat(filled), Style::default().fg(self.theme.bar)),
                ])
            })
            .collect();
        render_lines(&lines, inner, buf);
    }
}

/// Widget for the help screen
pub struct HelpPanel {
    theme: ThemeColors,
}

impl HelpPanel {
    pub fn new(theme: ThemeColors) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = panel(" Help - Keystroke Stats ", &self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = [
            "",
            " CONTROLS",
            " -----------",
            " q / Esc          : Quit (pending statistics are saved)",
            " s                : Save statistics",
            " r                : Reset statistics, keep lifetime total",
            " R                : Reset all statistics",
            " e                : Export report to JSON",
            " ?                : Toggle this help",
            "",
            " Keys are counted system-wide while the dashboard runs.",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.contains("---") {
                Style::default().fg(self.theme.dim)
            } else if !line.trim().is_empty()
                && line.trim_start().chars().all(|c| c.is_ascii_uppercase())
            {
                Style::default().fg(self.theme.pending).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    save_pending: bool,
    elapsed: &'a str,
    events: u64,
    message: Option<&'a str>,
    theme: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(save_pending: bool, elapsed: &'a str, events: u64, theme: ThemeColors) -> Self {
        Self {
            save_pending,
            elapsed,
            events,
            message: None,
            theme,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.theme.dim).fg(self.theme.bg);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        // Left side: save state
        let (state, color) = if self.save_pending {
            (" UNSAVED ", self.theme.pending)
        } else {
            (" SAVED ", self.theme.good)
        };
        buf.set_string(
            area.x,
            area.y,
            state,
            bg_style.fg(color).add_modifier(Modifier::BOLD),
        );

        if let Some(msg) = self.message {
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, bg_style.add_modifier(Modifier::BOLD));
        }

        // Right side: elapsed time and events
        let right = format!(" {} | Events: {} | ? help ", self.elapsed, self.events);
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}
