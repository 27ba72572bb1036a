use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use taskdeck_app::RecordStore;

use super::super::constants::LIST_HIGHLIGHT_SYMBOL;
use super::super::view::{Focus, Ui};
use super::util::hex_color;

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn draw_sidebar(&self, f: &mut Frame<'_>, area: Rect) {
        let mut items = Vec::with_capacity(self.categories.len() + 1);
        items.push(ListItem::new(Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::White)),
            Span::styled(
                format!("All ({})", self.stats.total_tasks),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])));
        for category in &self.categories {
            let dot_color = hex_color(&category.color).unwrap_or(Color::White);
            items.push(ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::raw(format!("{} ({})", category.name, category.task_count)),
            ])));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Categories")
                    .borders(Borders::ALL)
                    .border_style(self.pane_border(Focus::Categories)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        state.select(Some(self.category_cursor));
        f.render_stateful_widget(list, area, &mut state);
    }
}
