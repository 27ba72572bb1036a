use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use taskdeck_app::RecordStore;

use super::super::constants::{
    FORM_HEIGHT_PERCENT, FORM_WIDTH_PERCENT, POPUP_MIN_HEIGHT, POPUP_MIN_WIDTH,
};
use super::super::editor::{FormField, FormTarget, InputState, TaskFormState};
use super::super::view::Ui;

/// Rect centered in `area`, sized by percentages and clamped to the minimums.
pub(super) fn popup_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let width = ((area.width * width_percent) / 100)
        .max(POPUP_MIN_WIDTH)
        .min(area.width);
    let height = ((area.height * height_percent) / 100)
        .max(POPUP_MIN_HEIGHT)
        .min(area.height);
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Render a single-line input, marking the grapheme under the cursor when
/// the field has focus.
pub(super) fn input_line<'a>(label: &'a str, input: &'a InputState, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::styled(label, label_style)];
    if focused {
        let (before, under, after) = input.split_at_cursor();
        spans.push(Span::raw(before));
        if under.is_empty() {
            spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        } else {
            spans.push(Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)));
        }
        spans.push(Span::raw(after));
    } else {
        spans.push(Span::raw(input.value()));
    }
    Line::from(spans)
}

/// Render a left/right selector field such as priority or category.
fn choice_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let value_span = if focused {
        Span::styled(format!("◀ {value} ▶"), Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::raw(value)
    };
    Line::from(vec![Span::styled(label, label_style), value_span])
}

impl<S: RecordStore> Ui<S> {
    pub(in crate::tui) fn draw_task_form_popup(&self, f: &mut Frame<'_>) {
        let Some(form) = &self.task_form else {
            return;
        };
        let popup_area = popup_rect(f.area(), FORM_WIDTH_PERCENT, FORM_HEIGHT_PERCENT);

        let title = match form.target {
            FormTarget::Create => "New Task",
            FormTarget::Edit(_) => "Edit Task",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let lines = self.task_form_lines(form);
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn task_form_lines<'a>(&'a self, form: &'a TaskFormState) -> Vec<Line<'a>> {
        let category = self
            .categories
            .get(form.category_index)
            .map_or_else(|| "(no categories)".to_owned(), |c| c.name.clone());

        vec![
            input_line("Title:       ", &form.title, form.field == FormField::Title),
            input_line("Description: ", &form.description, form.field == FormField::Description),
            input_line("Due (y-m-d): ", &form.due, form.field == FormField::Due),
            choice_line(
                "Priority:    ",
                form.priority.to_string(),
                form.field == FormField::Priority,
            ),
            choice_line("Category:    ", category, form.field == FormField::Category),
            Line::from(""),
            Line::from(Span::styled(
                "enter save | esc cancel | tab next field | ←/→ change value",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }

    pub(in crate::tui) fn draw_category_form_popup(&self, f: &mut Frame<'_>) {
        let Some(form) = &self.category_form else {
            return;
        };
        let popup_area = popup_rect(f.area(), FORM_WIDTH_PERCENT, 0);

        let block = Block::default()
            .title("New Category")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let lines = vec![
            input_line("Name: ", &form.name, true),
            Line::from(""),
            Line::from(Span::styled(
                "enter create | esc cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines), inner);
    }

    pub(in crate::tui) fn draw_confirm_popup(&self, f: &mut Frame<'_>) {
        let Some(confirm) = &self.confirm_delete else {
            return;
        };
        let popup_area = popup_rect(f.area(), FORM_WIDTH_PERCENT, 0);

        let block = Block::default()
            .title("Delete Task")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let lines = vec![
            Line::from(vec![
                Span::raw("Delete '"),
                Span::styled(&confirm.title, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("'?"),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "y/enter delete | n/esc keep",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    pub(in crate::tui) fn draw_search_popup(&self, f: &mut Frame<'_>) {
        let Some(input) = &self.search else {
            return;
        };
        let popup_area = popup_rect(f.area(), FORM_WIDTH_PERCENT, 0);

        let block = Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let lines = vec![
            input_line("Text: ", input, true),
            Line::from(""),
            Line::from(Span::styled(
                "enter apply | esc cancel | blank clears the search",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_rect_centers_and_clamps() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = popup_rect(area, 60, 50);
        assert_eq!(rect.width, 60);
        assert_eq!(rect.height, 20);
        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 10);
    }

    #[test]
    fn popup_rect_respects_minimums_on_small_screens() {
        let area = Rect::new(0, 0, 50, 12);
        let rect = popup_rect(area, 60, 0);
        assert_eq!(rect.width, POPUP_MIN_WIDTH);
        assert_eq!(rect.height, POPUP_MIN_HEIGHT);
    }

    #[test]
    fn popup_rect_never_exceeds_the_screen() {
        let area = Rect::new(0, 0, 30, 5);
        let rect = popup_rect(area, 80, 80);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 5);
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
    }

    #[test]
    fn focused_input_marks_the_cursor() {
        let input = InputState::with_value("abc");
        let line = input_line("T: ", &input, true);
        // Cursor sits past the end, so a reversed placeholder space is drawn.
        assert!(
            line.spans
                .iter()
                .any(|span| span.content == " "
                    && span.style.add_modifier.contains(Modifier::REVERSED)),
        );
    }

    #[test]
    fn unfocused_input_renders_plain_text() {
        let input = InputState::with_value("abc");
        let line = input_line("T: ", &input, false);
        assert!(line.spans.iter().any(|span| span.content == "abc"));
    }
}
