use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use taskdeck_app::RecordStore;
use taskdeck_core::Task;
use time::OffsetDateTime;

use super::super::constants::{DETAIL_HEIGHT_PERCENT, DETAIL_WIDTH_PERCENT};
use super::super::view::Ui;
use super::popups::popup_rect;
use super::util::{due_label, format_timestamp, priority_color, priority_marker};

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn draw_detail_popup(&self, f: &mut Frame<'_>) {
        let Some(viewer) = &self.detail else {
            return;
        };
        let popup_area = popup_rect(f.area(), DETAIL_WIDTH_PERCENT, DETAIL_HEIGHT_PERCENT);

        let block = Block::default()
            .title("Task Detail")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let Some(task) = self.tasks.iter().find(|task| task.id == viewer.task_id) else {
            let paragraph = Paragraph::new("The task is no longer visible.")
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(paragraph, inner);
            return;
        };

        let lines = self.detail_lines(task);
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((viewer.scroll_offset, 0));
        f.render_widget(paragraph, inner);
    }

    fn detail_lines<'a>(&'a self, task: &'a Task) -> Vec<Line<'a>> {
        let today = OffsetDateTime::now_utc().date();
        let mut lines = vec![
            Line::from(Span::styled(
                &task.title,
                Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
            )),
            Line::from(format!("ID: {}", task.id)),
            Line::from(vec![
                Span::raw("Priority: "),
                Span::styled(
                    format!("{} {}", priority_marker(task.priority), task.priority),
                    Style::default().fg(priority_color(task.priority)),
                ),
            ]),
        ];

        let category = self.category_name(task.category_id).unwrap_or("unknown");
        lines.push(Line::from(format!("Category: {category}")));

        if let Some((label, color)) = due_label(task, today) {
            lines.push(Line::from(vec![
                Span::raw("Due: "),
                Span::styled(label, Style::default().fg(color)),
            ]));
        }

        let status = if task.completed {
            Span::styled("completed", Style::default().fg(Color::Green))
        } else {
            Span::styled("pending", Style::default().fg(Color::Yellow))
        };
        lines.push(Line::from(vec![Span::raw("Status: "), status]));
        lines.push(Line::from(format!("Created: {}", format_timestamp(task.created_at))));
        lines.push(Line::from(format!("Updated: {}", format_timestamp(task.updated_at))));
        lines.push(Line::from(""));

        if task.description.is_empty() {
            lines.push(Line::from(Span::styled(
                "No description.",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for body_line in task.description.lines() {
                lines.push(Line::from(body_line.to_owned()));
            }
        }

        lines
    }
}
