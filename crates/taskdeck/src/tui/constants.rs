//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 250;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Highlight symbol shown beside selected list entries.
pub const LIST_HIGHLIGHT_SYMBOL: &str = "▶ ";
/// Width percentage for the task and category form popups before clamping.
pub const FORM_WIDTH_PERCENT: u16 = 60;
/// Height percentage for the task form popup before clamping.
pub const FORM_HEIGHT_PERCENT: u16 = 50;
/// Width percentage for the task detail popup before clamping.
pub const DETAIL_WIDTH_PERCENT: u16 = 80;
/// Height percentage for the task detail popup before clamping.
pub const DETAIL_HEIGHT_PERCENT: u16 = 80;
/// Minimum width for any popup.
pub const POPUP_MIN_WIDTH: u16 = 40;
/// Minimum height for any popup.
pub const POPUP_MIN_HEIGHT: u16 = 8;
/// Completions per day that draw a full-width activity bar.
pub const ACTIVITY_BAR_SCALE: usize = 5;
