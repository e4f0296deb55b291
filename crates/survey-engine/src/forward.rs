//! Forward pipeline (spec.md §4.8): aggregate the latest record into a
//! template-rendered text block, send it via the port, and conditionally
//! clear state on success.

use survey_core::config::TargetUser;
use survey_core::schema::Schema;
use survey_core::{Record, UserState};
use survey_port::{CancelContext, Markup, OutboundPort};

use crate::error::Result;

const NO_ANSWER: &str = "no_answer";

/// Which main-menu action triggered the forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardKind {
    /// Aggregate-and-send to the requester's own chat; never clears state.
    SelfForward,
    /// Aggregate-and-send to the configured reviewer; clears the forwarded
    /// record on success.
    ReviewerForward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    Sent { target_chat_id: i64 },
    NothingToSend,
    ReviewerNotConfigured,
    SendFailed,
}

/// Select the record to forward: most recent saved record, else the current
/// draft, else `None` (spec.md §4.8 step 1, and §8 "Selection preference").
fn select_record(user: &UserState) -> Option<&Record> {
    user.latest_saved().or(user.draft.as_ref())
}

/// Render one record into the reviewer-facing text block (spec.md §4.8 steps
/// 3-4). Returns `None` when the schema has no sections with questions —
/// treated the same as "nothing to send".
pub fn aggregate(schema: &Schema, record: &Record, user_name: &str) -> Option<String> {
    let created = record
        .created_at
        .map(|ts| ts.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| chrono::Utc::now().format("%d.%m.%Y %H:%M").to_string());

    let mut body = String::new();
    for section_id in schema.section_ids_sorted() {
        let section = schema.section(section_id).expect("section id came from this schema");
        if section.questions.is_empty() {
            continue;
        }
        body.push_str(&format!("## {}\n\n", section.title));
        for question in &section.questions {
            let answer = record.get(&question.store_key).unwrap_or(NO_ANSWER);
            body.push_str(&format!("- {}:\n  {}\n\n", question.prompt, answer));
        }
    }

    if body.is_empty() {
        return None;
    }

    Some(format!("Participant: {user_name}\nSubmitted: {created}\n\n{}", body.trim_end()))
}

/// Run the forward pipeline for one participant.
pub async fn forward(
    user: &mut UserState,
    schema: &Schema,
    target: &TargetUser,
    requester_chat_id: i64,
    kind: ForwardKind,
    port: &dyn OutboundPort,
    ctx: &CancelContext,
) -> Result<ForwardOutcome> {
    let record = match select_record(user) {
        Some(r) => r.clone(),
        None => {
            port.send(ctx, requester_chat_id, "Nothing to send yet.", Markup::None).await?;
            return Ok(ForwardOutcome::NothingToSend);
        }
    };

    let target_chat_id = match kind {
        ForwardKind::SelfForward => requester_chat_id,
        ForwardKind::ReviewerForward => {
            if !target.is_enabled() {
                port.send(
                    ctx,
                    requester_chat_id,
                    "No reviewer is configured; ask an administrator to set TARGET_USER_ID.",
                    Markup::None,
                )
                .await?;
                return Ok(ForwardOutcome::ReviewerNotConfigured);
            }
            target.get()
        }
    };

    let rendered = match aggregate(schema, &record, &user.display_name) {
        Some(text) => text,
        None => {
            port.send(ctx, requester_chat_id, "Nothing to send yet.", Markup::None).await?;
            return Ok(ForwardOutcome::NothingToSend);
        }
    };

    match port.send(ctx, target_chat_id, &rendered, Markup::None).await {
        Ok(_) => {}
        Err(_) => {
            port.send(
                ctx,
                requester_chat_id,
                "Could not send the record right now. Please try again later.",
                Markup::None,
            )
            .await?;
            return Ok(ForwardOutcome::SendFailed);
        }
    }

    if kind == ForwardKind::ReviewerForward {
        // `select_record` only ever returns the draft when no saved record
        // exists, so `record.saved` alone tells us which one was forwarded.
        if record.saved {
            user.records.retain(|r| r.id != record.id);
        } else {
            user.draft = None;
        }
        user.current_section = None;
        user.current_question_index = 0;
        user.last_prompt = None;
    }

    let confirmation = match kind {
        ForwardKind::SelfForward => "Sent to you.".to_string(),
        ForwardKind::ReviewerForward => format!("Sent to reviewer ({target_chat_id})."),
    };
    port.send(ctx, requester_chat_id, &confirmation, Markup::None).await?;

    Ok(ForwardOutcome::Sent { target_chat_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_core::schema::load_from_str;
    use survey_port::testing::FakePort;
    use survey_port::TransportError;

    const YAML: &str = r#"
sections:
  personal:
    title: Personal
    questions:
      - id: q1
        prompt: "Name?"
        type: text
        store_key: name
"#;

    fn saved(id: &str, name: &str) -> Record {
        let mut r = Record::new_draft();
        r.data.insert("name".to_string(), name.to_string());
        r.finalize(id.to_string(), chrono::Utc::now());
        r
    }

    #[test]
    fn aggregate_substitutes_no_answer_for_missing_value() {
        let schema = load_from_str(YAML).unwrap();
        let record = Record::new_draft();
        let text = aggregate(&schema, &record, "Alice").unwrap();
        assert!(text.contains(NO_ANSWER));
    }

    #[test]
    fn aggregate_is_idempotent() {
        let schema = load_from_str(YAML).unwrap();
        let record = saved("r1", "Alice");
        let a = aggregate(&schema, &record, "Alice").unwrap();
        let b = aggregate(&schema, &record, "Alice").unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn nothing_to_send_when_no_draft_or_saved() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let schema = load_from_str(YAML).unwrap();
        let target = TargetUser::default();
        let mut user = UserState::new("u1", "Alice");
        let outcome = forward(&mut user, &schema, &target, 1, ForwardKind::SelfForward, &port, &ctx)
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::NothingToSend);
    }

    #[tokio::test]
    async fn reviewer_forward_without_target_warns_and_stops() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let schema = load_from_str(YAML).unwrap();
        let target = TargetUser::default();
        let mut user = UserState::new("u1", "Alice");
        user.records.push(saved("r1", "Alice"));
        let outcome = forward(&mut user, &schema, &target, 1, ForwardKind::ReviewerForward, &port, &ctx)
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::ReviewerNotConfigured);
        assert_eq!(user.records.len(), 1);
    }

    #[tokio::test]
    async fn reviewer_forward_success_clears_only_forwarded_record() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let schema = load_from_str(YAML).unwrap();
        let target = TargetUser::default();
        target.set(999);
        let mut user = UserState::new("u1", "Alice");
        user.records.push(saved("r1", "Alice"));
        user.records.push(saved("r2", "Alice"));

        let outcome = forward(&mut user, &schema, &target, 1, ForwardKind::ReviewerForward, &port, &ctx)
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::Sent { target_chat_id: 999 });
        assert_eq!(user.records.len(), 1);
        assert_eq!(user.records[0].id, "r1");
    }

    #[tokio::test]
    async fn reviewer_forward_failure_retains_state() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let schema = load_from_str(YAML).unwrap();
        let target = TargetUser::default();
        target.set(999);
        let mut user = UserState::new("u1", "Alice");
        user.records.push(saved("r1", "Alice"));
        user.records.push(saved("r2", "Alice"));
        port.queue_send(Err(TransportError::RateLimited(std::time::Duration::from_secs(1))));

        let outcome = forward(&mut user, &schema, &target, 1, ForwardKind::ReviewerForward, &port, &ctx)
            .await
            .unwrap();
        assert_eq!(outcome, ForwardOutcome::SendFailed);
        assert_eq!(user.records.len(), 2);
    }

    #[tokio::test]
    async fn self_forward_never_clears() {
        let port = FakePort::new();
        let ctx = CancelContext::background();
        let schema = load_from_str(YAML).unwrap();
        let target = TargetUser::default();
        let mut user = UserState::new("u1", "Alice");
        user.records.push(saved("r1", "Alice"));

        forward(&mut user, &schema, &target, 1, ForwardKind::SelfForward, &port, &ctx)
            .await
            .unwrap();
        assert_eq!(user.records.len(), 1);
    }
}
