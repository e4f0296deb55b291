//! Reply-keyboard button labels (spec.md §6).
//!
//! Exact strings participants type or tap from the main menu. Kept as a
//! finite set of constants so a deployment can localize by editing one
//! place; the dispatcher matches on these exact strings for idle-state text
//! messages.

pub const FILL_RECORD: &str = "Fill record";
pub const SHOW_RECORD: &str = "Show record";
pub const SEND_TO_SELF: &str = "Send to self";
pub const SEND_TO_REVIEWER: &str = "Send to reviewer";

pub fn main_menu_keyboard() -> Vec<Vec<String>> {
    vec![
        vec![FILL_RECORD.to_string(), SHOW_RECORD.to_string()],
        vec![SEND_TO_SELF.to_string(), SEND_TO_REVIEWER.to_string()],
    ]
}
