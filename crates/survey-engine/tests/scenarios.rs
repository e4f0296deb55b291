//! Concrete end-to-end scenarios (spec.md §8 "Concrete end-to-end scenarios").

use survey_core::config::TargetUser;
use survey_core::fsm::RecordState;
use survey_core::schema::load_from_str;
use survey_engine::event::{InboundEvent, Sender};
use survey_engine::{dispatch, UserStateStore};
use survey_port::testing::{FakePort, PortCall};
use survey_port::{CancelContext, MessageHandle, TransportError};
use survey_strategies::Registry;

const YAML: &str = r#"
sections:
  personal:
    title: Personal
    questions:
      - id: q1
        prompt: "Name?"
        type: text
        store_key: name
      - id: q2
        prompt: "City?"
        type: buttons
        store_key: city
        options:
          - text: Tbilisi
            value: tb
          - text: Other
            value: ot
"#;

fn sender() -> Sender {
    Sender { participant_id: "u1".to_string(), chat_id: 1, display_name: "Alice".to_string() }
}

struct Harness {
    port: FakePort,
    ctx: CancelContext,
    schema: survey_core::schema::Schema,
    resolver: Registry,
    store: UserStateStore,
    target: TargetUser,
}

impl Harness {
    fn new() -> Self {
        Self {
            port: FakePort::new(),
            ctx: CancelContext::background(),
            schema: load_from_str(YAML).unwrap(),
            resolver: Registry::builtin(),
            store: UserStateStore::new(),
            target: TargetUser::default(),
        }
    }

    async fn send(&self, event: InboundEvent) {
        dispatch(
            &self.ctx,
            Some(sender()),
            event,
            &self.port,
            &self.schema,
            &self.resolver,
            &self.store,
            &self.target,
            false,
        )
        .await
        .unwrap();
    }

    fn text(body: &str) -> InboundEvent {
        InboundEvent::Text { body: body.to_string(), message_id: 0 }
    }

    fn callback(id: &str, payload: &str) -> InboundEvent {
        InboundEvent::Callback { callback_id: id.to_string(), payload: payload.to_string() }
    }
}

#[tokio::test]
async fn scenario_1_happy_path() {
    let h = Harness::new();

    h.send(InboundEvent::StartCommand).await;
    h.send(Harness::text("Fill record")).await;
    h.send(Harness::callback("cb1", "section:personal")).await;
    h.send(Harness::text("Alice")).await;
    h.send(Harness::callback("cb2", "answer:q2:tb")).await;
    h.send(Harness::callback("cb3", "action:save_record")).await;

    let entry = h.store.get_or_create("u1", "Alice").await;
    let user = entry.lock().await;
    assert_eq!(user.records.len(), 1);
    assert_eq!(user.records[0].get("name"), Some("Alice"));
    assert_eq!(user.records[0].get("city"), Some("tb"));
    assert!(user.records[0].saved);
    assert!(user.draft.is_none());
    assert_eq!(user.record_fsm.state(), RecordState::RecordIdle);

    let calls = h.port.calls();
    let sends_and_edits = calls
        .iter()
        .filter(|c| matches!(c, PortCall::Send { .. } | PortCall::Edit { .. }))
        .count();
    let acks = calls.iter().filter(|c| matches!(c, PortCall::AcknowledgeCallback { .. })).count();
    assert!(sends_and_edits >= 5, "expected at least 5 prompt renders, got {sends_and_edits}");
    assert_eq!(acks, 3, "one acknowledgement per callback");
}

#[tokio::test]
async fn scenario_2_repeat_on_wrong_input() {
    let h = Harness::new();
    h.send(InboundEvent::StartCommand).await;
    h.send(Harness::text("Fill record")).await;
    h.send(Harness::callback("cb1", "section:personal")).await;
    h.send(Harness::text("Alice")).await;

    // Now at q2 (buttons). Send free text instead of tapping a button.
    h.send(Harness::text("Tbilisi")).await;

    let entry = h.store.get_or_create("u1", "Alice").await;
    let user = entry.lock().await;
    assert_eq!(user.draft.as_ref().unwrap().get("city"), None);
    assert_eq!(user.record_fsm.state(), RecordState::AnsweringQuestion);

    let calls = h.port.calls();
    let feedback_sent = calls.iter().any(|c| matches!(c, PortCall::Send { text, .. } if text.to_lowercase().contains("button")));
    assert!(feedback_sent, "expected feedback mentioning the buttons");
}

fn saved(id: &str, name: &str, city: &str) -> survey_core::Record {
    let mut r = survey_core::Record::new_draft();
    r.data.insert("name".to_string(), name.to_string());
    r.data.insert("city".to_string(), city.to_string());
    r.finalize(id.to_string(), chrono::Utc::now());
    r
}

#[tokio::test]
async fn scenario_3_reviewer_forward_success_clears_only_forwarded_record() {
    let h = Harness::new();
    h.target.set(999);
    {
        let entry = h.store.get_or_create("u1", "Alice").await;
        let mut user = entry.lock().await;
        user.records.push(saved("r1", "Alice", "tb"));
        user.records.push(saved("r2", "Alice", "ot"));
    }

    h.send(Harness::text("Send to reviewer")).await;

    let entry = h.store.get_or_create("u1", "Alice").await;
    let user = entry.lock().await;
    assert_eq!(user.records.len(), 1);
    assert_eq!(user.records[0].id, "r1");

    let calls = h.port.calls();
    let sent_to_reviewer = calls
        .iter()
        .any(|c| matches!(c, PortCall::Send { chat_id: 999, text, .. } if text.contains("Personal")));
    assert!(sent_to_reviewer);
    let confirmation = calls.iter().any(|c| matches!(c, PortCall::Send { chat_id: 1, text, .. } if text.contains("999")));
    assert!(confirmation);
}

#[tokio::test]
async fn scenario_4_reviewer_forward_failure_retains_state() {
    let h = Harness::new();
    h.target.set(999);
    {
        let entry = h.store.get_or_create("u1", "Alice").await;
        let mut user = entry.lock().await;
        user.records.push(saved("r1", "Alice", "tb"));
        user.records.push(saved("r2", "Alice", "ot"));
    }
    h.port.queue_send(Err(TransportError::RateLimited(std::time::Duration::from_secs(1))));

    h.send(Harness::text("Send to reviewer")).await;

    let entry = h.store.get_or_create("u1", "Alice").await;
    let user = entry.lock().await;
    assert_eq!(user.records.len(), 2);

    let calls = h.port.calls();
    let generic_failure = calls.iter().any(|c| matches!(c, PortCall::Send { chat_id: 1, .. }));
    assert!(generic_failure);
}

#[tokio::test]
async fn scenario_5_message_not_modified_tolerance() {
    let h = Harness::new();
    {
        let entry = h.store.get_or_create("u1", "Alice").await;
        let mut user = entry.lock().await;
        user.record_fsm.fire(survey_core::fsm::RecordEvent::StartRecord).unwrap();
        user.current_section = Some("personal".to_string());
        user.current_question_index = 1;
        user.record_fsm.fire(survey_core::fsm::RecordEvent::SelectSection).unwrap();
        user.last_prompt = Some(MessageHandle::new(1, 10, "fake", "City?"));
    }
    h.port.queue_edit(Err(TransportError::MessageNotModified));

    // Wrong-type input on the buttons question triggers a re-render (edit).
    h.send(Harness::text("Tbilisi")).await;

    let entry = h.store.get_or_create("u1", "Alice").await;
    let user = entry.lock().await;
    assert_eq!(user.last_prompt.as_ref().unwrap().message_id, 10);
    assert_eq!(user.last_prompt.as_ref().unwrap().chat_id, 1);
    assert_eq!(user.record_fsm.state(), RecordState::AnsweringQuestion);
}

#[tokio::test]
async fn scenario_6_stale_callback_is_a_no_op() {
    let h = Harness::new();
    {
        let entry = h.store.get_or_create("u1", "Alice").await;
        let mut user = entry.lock().await;
        user.record_fsm.fire(survey_core::fsm::RecordEvent::StartRecord).unwrap();
        user.current_section = Some("personal".to_string());
        user.current_question_index = 1;
        user.record_fsm.fire(survey_core::fsm::RecordEvent::SelectSection).unwrap();
    }

    h.send(Harness::callback("cb1", "answer:q1:tb")).await;

    let entry = h.store.get_or_create("u1", "Alice").await;
    let user = entry.lock().await;
    assert!(user.draft.is_none());
    assert_eq!(user.current_question_index, 1);
    assert_eq!(user.record_fsm.state(), RecordState::AnsweringQuestion);

    let calls = h.port.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        PortCall::AcknowledgeCallback { text, .. } => assert!(!text.is_empty()),
        other => panic!("expected acknowledge_callback, got {other:?}"),
    }
}
