use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use taskdeck_app::RecordStore;

use super::super::view::{Message, Overlay, Ui};

const BROWSE_HELP: &str = "q quit | tab pane | j/k move | enter open | n new | e edit | \
                           space done | d delete | / search | p/u/s filter | c clear | r reload";
const OVERLAY_HELP: &str = "enter confirm | esc cancel | tab next field";

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn draw_filter_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let filter = Paragraph::new(self.filter_summary())
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(filter, area);
    }

    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let message = Paragraph::new(self.status_text())
            .block(Block::default().title("Status").borders(Borders::ALL))
            .style(self.status_style());
        f.render_widget(message, area);
    }

    pub(in crate::tui) fn filter_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(id) = self.filter.category {
            let name = self.category_name(id).unwrap_or("unknown");
            parts.push(format!("category:{name}"));
        }
        if let Some(priority) = self.filter.priority {
            parts.push(format!("priority:{priority}"));
        }
        if let Some(due) = self.filter.due {
            parts.push(format!("due:{}", due.as_str()));
        }
        if let Some(status) = self.filter.status {
            parts.push(format!("status:{}", status.as_str()));
        }
        if let Some(text) = self.filter.text.as_deref()
            && !text.is_empty()
        {
            parts.push(format!("text:\"{text}\""));
        }

        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join("  ")
        }
    }

    fn status_text(&self) -> Cow<'_, str> {
        if let Some(msg) = &self.message {
            return Cow::Borrowed(msg.text.as_str());
        }
        match self.overlay {
            Overlay::None => Cow::Borrowed(BROWSE_HELP),
            _ => Cow::Borrowed(OVERLAY_HELP),
        }
    }

    fn status_style(&self) -> Style {
        self.message
            .as_ref()
            .map_or_else(Style::default, Message::style)
    }
}
