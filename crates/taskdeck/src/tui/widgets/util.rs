use std::borrow::Cow;

use ratatui::style::Color;
use taskdeck_core::{DueStatus, Priority, Task};
use time::format_description::well_known::Rfc3339;
use time::{Date, Month, OffsetDateTime};
use unicode_segmentation::UnicodeSegmentation;

pub(super) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = UnicodeSegmentation::graphemes(input, true).count();
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        let truncated: String = UnicodeSegmentation::graphemes(input, true)
            .take(max_graphemes)
            .collect();
        return Cow::Owned(truncated);
    }

    let keep = max_graphemes - ELLIPSIS_GRAPHEMES;
    let mut truncated: String = UnicodeSegmentation::graphemes(input, true).take(keep).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

pub(super) const fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "▽",
        Priority::Medium => "◆",
        Priority::High => "▲",
    }
}

pub(super) const fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Blue,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

/// Short badge for a task's due date, with the color it should render in.
pub(super) fn due_label(task: &Task, today: Date) -> Option<(String, Color)> {
    DueStatus::of(task, today).map(|status| match status {
        DueStatus::Overdue => ("overdue".to_owned(), Color::Red),
        DueStatus::DueToday => ("due today".to_owned(), Color::Yellow),
        DueStatus::Scheduled(date) => (format!("due {}", short_date(date)), Color::DarkGray),
    })
}

pub(super) fn short_date(date: Date) -> String {
    format!("{} {}", month_label(date.month()), date.day())
}

const fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

pub(super) fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

/// Parse a `#RRGGBB` string into a terminal color.
pub(super) fn hex_color(raw: &str) -> Option<Color> {
    let hex = raw.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
