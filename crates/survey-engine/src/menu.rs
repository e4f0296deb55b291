//! Main-menu FSM driver (spec.md §4.5): list-view rendering and the
//! idle/main-menu keyboard. The FSM table itself lives in `survey-core`.

use survey_port::{CancelContext, InlineButton, Markup, OutboundPort};

use survey_core::UserState;

use crate::error::Result;
use crate::labels;
use crate::payload::{self, ListNavKind};
use crate::render::send_or_edit;

const PAGE_SIZE: usize = 5;
const EMPTY_LIST_TEXT: &str = "You have no saved records yet.";

/// Preview fields shown per list entry, by the reserved-key convention
/// spec.md §4.5 names: `name` and `city`.
const PREVIEW_KEYS: [&str; 2] = ["name", "city"];

pub async fn render_main_menu(
    user: &mut UserState,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    let text = "Main menu. What would you like to do?".to_string();
    let markup = Markup::reply_keyboard(labels::main_menu_keyboard());
    let previous = user.last_prompt.clone();
    let handle = send_or_edit(port, ctx, chat_id, &previous, &text, markup, true).await?;
    user.last_prompt = Some(handle);
    Ok(())
}

/// Render the current page of saved records (spec.md §4.5 "List view").
pub async fn render_list_view(
    user: &mut UserState,
    chat_id: i64,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<()> {
    let saved: Vec<&survey_core::Record> = user.records.iter().filter(|r| r.saved).collect();

    if saved.is_empty() {
        let previous = user.last_prompt.clone();
        let markup = Markup::Inline(vec![vec![InlineButton::new("Back to menu", payload::build_list_nav(ListNavKind::ToMenu))]]);
        let handle = send_or_edit(port, ctx, chat_id, &previous, EMPTY_LIST_TEXT, markup, false).await?;
        user.last_prompt = Some(handle);
        return Ok(());
    }

    // Newest-first.
    let mut ordered = saved;
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let offset = user.list_offset.min(ordered.len().saturating_sub(1));
    let page: Vec<&survey_core::Record> = ordered.iter().skip(offset).take(PAGE_SIZE).copied().collect();

    let mut text = String::new();
    for record in &page {
        let suffix: String = record.id.chars().rev().take(6).collect::<String>().chars().rev().collect();
        let created = record
            .created_at
            .map(|ts| ts.format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        text.push_str(&format!("#{suffix} — {created}\n"));
        for key in PREVIEW_KEYS {
            if let Some(value) = record.get(key) {
                text.push_str(&format!("  {key}: {value}\n"));
            }
        }
        text.push('\n');
    }

    let mut markup = Markup::None;
    let mut nav_row = Vec::new();
    if offset > 0 {
        nav_row.push(InlineButton::new("Back", payload::build_list_nav(ListNavKind::Back)));
    }
    if offset + PAGE_SIZE < ordered.len() {
        nav_row.push(InlineButton::new("Next", payload::build_list_nav(ListNavKind::Next)));
    }
    if !nav_row.is_empty() {
        markup.push_row(nav_row);
    }
    markup.push_row(vec![InlineButton::new("Back to menu", payload::build_list_nav(ListNavKind::ToMenu))]);

    let previous = user.last_prompt.clone();
    let handle = send_or_edit(port, ctx, chat_id, &previous, text.trim_end(), markup, false).await?;
    user.last_prompt = Some(handle);
    Ok(())
}

pub fn list_next(user: &mut UserState) {
    let saved_count = user.records.iter().filter(|r| r.saved).count();
    if user.list_offset + PAGE_SIZE < saved_count {
        user.list_offset += PAGE_SIZE;
    }
}

pub fn list_back(user: &mut UserState) {
    user.list_offset = user.list_offset.saturating_sub(PAGE_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use survey_core::Record;
    use survey_port::testing::FakePort;

    fn saved_record(id: &str, name: &str) -> Record {
        let mut r = Record::new_draft();
        r.data.insert("name".to_string(), name.to_string());
        r.finalize(id.to_string(), Utc::now());
        r
    }

    #[tokio::test]
    async fn empty_list_shows_static_text() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let mut user = UserState::new("u1", "Alice");
        render_list_view(&mut user, 1, &port, &ctx).await.unwrap();
        match &port.calls()[0] {
            survey_port::testing::PortCall::Send { text, .. } => assert_eq!(text, EMPTY_LIST_TEXT),
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_shows_preview_fields() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let mut user = UserState::new("u1", "Alice");
        user.records.push(saved_record("r1", "Alice"));
        render_list_view(&mut user, 1, &port, &ctx).await.unwrap();
        match &port.calls()[0] {
            survey_port::testing::PortCall::Send { text, .. } => assert!(text.contains("name: Alice")),
            other => panic!("expected send, got {other:?}"),
        }
    }

    #[test]
    fn list_next_stops_at_end() {
        let mut user = UserState::new("u1", "Alice");
        for i in 0..3 {
            user.records.push(saved_record(&format!("r{i}"), "Alice"));
        }
        list_next(&mut user);
        assert_eq!(user.list_offset, 0);
    }

    #[test]
    fn list_next_and_back_roundtrip() {
        let mut user = UserState::new("u1", "Alice");
        for i in 0..8 {
            user.records.push(saved_record(&format!("r{i}"), "Alice"));
        }
        list_next(&mut user);
        assert_eq!(user.list_offset, PAGE_SIZE);
        list_back(&mut user);
        assert_eq!(user.list_offset, 0);
    }
}
