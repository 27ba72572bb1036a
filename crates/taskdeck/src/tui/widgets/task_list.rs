use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use taskdeck_app::RecordStore;
use time::OffsetDateTime;

use super::super::constants::LIST_HIGHLIGHT_SYMBOL;
use super::super::view::{Focus, Ui};
use super::util::{due_label, priority_color, priority_marker, truncate_with_ellipsis};

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn draw_task_list(&self, f: &mut Frame<'_>, area: Rect) {
        let today = OffsetDateTime::now_utc().date();
        // Borders, highlight symbol, and checkbox eat into the title width.
        let title_width = usize::from(area.width.saturating_sub(8));

        let items: Vec<ListItem<'_>> = if self.tasks.is_empty() {
            let message = if self.filter.is_empty() {
                "No tasks yet. Press n to add one."
            } else {
                "No tasks match the active filters."
            };
            vec![ListItem::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            )))]
        } else {
            self.tasks
                .iter()
                .map(|task| {
                    let checkbox = if task.completed { "[x] " } else { "[ ] " };
                    let mut title_style = Style::default().add_modifier(Modifier::BOLD);
                    if task.completed {
                        title_style = title_style
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT);
                    }
                    let title_line = Line::from(vec![
                        Span::raw(checkbox),
                        Span::styled(truncate_with_ellipsis(&task.title, title_width), title_style),
                    ]);

                    let mut meta = vec![
                        Span::raw("    "),
                        Span::styled(
                            format!("{} {}", priority_marker(task.priority), task.priority),
                            Style::default().fg(priority_color(task.priority)),
                        ),
                    ];
                    if let Some(name) = self.category_name(task.category_id) {
                        meta.push(Span::styled(
                            format!(" | {name}"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    if let Some((label, color)) = due_label(task, today) {
                        meta.push(Span::styled(
                            format!(" | {label}"),
                            Style::default().fg(color),
                        ));
                    }

                    ListItem::new(vec![title_line, Line::from(meta)])
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("Tasks ({})", self.tasks.len()))
                    .borders(Borders::ALL)
                    .border_style(self.pane_border(Focus::Tasks)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        if !self.tasks.is_empty() {
            state.select(Some(self.task_cursor));
        }
        f.render_stateful_widget(list, area, &mut state);
    }
}
