use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};
use taskdeck_app::RecordStore;

use super::super::constants::ACTIVITY_BAR_SCALE;
use super::super::view::Ui;

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn draw_stats(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title("Stats").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(8),
            ])
            .split(inner);

        self.draw_stats_summary(f, rows[0]);
        self.draw_completion_gauge(f, rows[1]);
        self.draw_weekly_chart(f, rows[2]);
    }

    fn draw_stats_summary(&self, f: &mut Frame<'_>, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(vec![
                Span::raw("Total tasks      "),
                Span::styled(self.stats.total_tasks.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("Completed        "),
                Span::styled(self.stats.completed_tasks.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("Completed today  "),
                Span::styled(self.stats.today_completed.to_string(), bold),
            ]),
            Line::from(vec![
                Span::raw("Streak           "),
                Span::styled(
                    format!("{} day(s)", self.stats.streak),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
        ];
        f.render_widget(Paragraph::new(lines), area);
    }

    fn draw_completion_gauge(&self, f: &mut Frame<'_>, area: Rect) {
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(u16::from(self.stats.completion_rate))
            .label(format!("{}% done", self.stats.completion_rate));
        f.render_widget(gauge, area);
    }

    fn draw_weekly_chart(&self, f: &mut Frame<'_>, area: Rect) {
        // Weekday label, spacing, and the trailing count take 8 columns.
        let bar_width = usize::from(area.width.saturating_sub(8)).max(1);

        let mut lines = Vec::with_capacity(self.weekly.len() + 1);
        lines.push(Line::from(Span::styled(
            "Last 7 days",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for day in &self.weekly {
            let filled = day.completed.min(ACTIVITY_BAR_SCALE) * bar_width / ACTIVITY_BAR_SCALE;
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", day.weekday)),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
                Span::raw(format!(" {}", day.completed)),
            ]));
        }
        f.render_widget(Paragraph::new(lines), area);
    }
}
