//! Callback-payload grammar (spec.md §6 "Callback payload grammar").
//!
//! ```text
//! payload  := prefix ":" tail
//! prefix   := "answer" | "section" | "action" | "list_nav"
//! answer-tail   := question-id ":" option-value
//! section-tail  := section-id
//! action-tail   := "save_record" | "cancel_section" | "exit_menu"
//!               | "share_last"  | "new_record"
//! list-nav-tail := "next" | "back" | "tomenu"
//! ```
//!
//! Colons are reserved separators; callers must never construct a section
//! or question identifier or option value containing one.

pub const PREFIX_ANSWER: &str = "answer";
pub const PREFIX_SECTION: &str = "section";
pub const PREFIX_ACTION: &str = "action";
pub const PREFIX_LIST_NAV: &str = "list_nav";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SaveRecord,
    CancelSection,
    ExitMenu,
    ShareLast,
    NewRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListNavKind {
    Next,
    Back,
    ToMenu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    Answer { question_id: String, option_value: String },
    Section { section_id: String },
    Action(ActionKind),
    ListNav(ListNavKind),
}

/// Parse a raw callback-data string into a [`CallbackPayload`].
///
/// Returns `None` for anything that does not match the grammar; callers
/// treat this as an unrecognized payload (spec.md §4.7 step 3).
pub fn parse(payload: &str) -> Option<CallbackPayload> {
    let (prefix, tail) = payload.split_once(':')?;
    match prefix {
        PREFIX_ANSWER => {
            let (question_id, option_value) = tail.split_once(':')?;
            Some(CallbackPayload::Answer {
                question_id: question_id.to_string(),
                option_value: option_value.to_string(),
            })
        }
        PREFIX_SECTION => Some(CallbackPayload::Section { section_id: tail.to_string() }),
        PREFIX_ACTION => match tail {
            "save_record" => Some(CallbackPayload::Action(ActionKind::SaveRecord)),
            "cancel_section" => Some(CallbackPayload::Action(ActionKind::CancelSection)),
            "exit_menu" => Some(CallbackPayload::Action(ActionKind::ExitMenu)),
            "share_last" => Some(CallbackPayload::Action(ActionKind::ShareLast)),
            "new_record" => Some(CallbackPayload::Action(ActionKind::NewRecord)),
            _ => None,
        },
        PREFIX_LIST_NAV => match tail {
            "next" => Some(CallbackPayload::ListNav(ListNavKind::Next)),
            "back" => Some(CallbackPayload::ListNav(ListNavKind::Back)),
            "tomenu" => Some(CallbackPayload::ListNav(ListNavKind::ToMenu)),
            _ => None,
        },
        _ => None,
    }
}

pub fn build_section(section_id: &str) -> String {
    format!("{PREFIX_SECTION}:{section_id}")
}

pub fn build_action(kind: ActionKind) -> String {
    let tail = match kind {
        ActionKind::SaveRecord => "save_record",
        ActionKind::CancelSection => "cancel_section",
        ActionKind::ExitMenu => "exit_menu",
        ActionKind::ShareLast => "share_last",
        ActionKind::NewRecord => "new_record",
    };
    format!("{PREFIX_ACTION}:{tail}")
}

pub fn build_list_nav(kind: ListNavKind) -> String {
    let tail = match kind {
        ListNavKind::Next => "next",
        ListNavKind::Back => "back",
        ListNavKind::ToMenu => "tomenu",
    };
    format!("{PREFIX_LIST_NAV}:{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answer_payload() {
        let parsed = parse("answer:q2:tb").unwrap();
        assert_eq!(
            parsed,
            CallbackPayload::Answer { question_id: "q2".to_string(), option_value: "tb".to_string() }
        );
    }

    #[test]
    fn parses_section_payload() {
        assert_eq!(
            parse("section:personal").unwrap(),
            CallbackPayload::Section { section_id: "personal".to_string() }
        );
    }

    #[test]
    fn parses_action_and_list_nav_payloads() {
        assert_eq!(parse("action:save_record").unwrap(), CallbackPayload::Action(ActionKind::SaveRecord));
        assert_eq!(parse("list_nav:next").unwrap(), CallbackPayload::ListNav(ListNavKind::Next));
    }

    #[test]
    fn rejects_unknown_prefix_or_tail() {
        assert!(parse("bogus:foo").is_none());
        assert!(parse("action:not_a_real_action").is_none());
        assert!(parse("no-colon-here").is_none());
    }

    #[test]
    fn build_functions_round_trip_through_parse() {
        assert_eq!(parse(&build_section("personal")).unwrap(), CallbackPayload::Section { section_id: "personal".to_string() });
        assert_eq!(parse(&build_action(ActionKind::NewRecord)).unwrap(), CallbackPayload::Action(ActionKind::NewRecord));
        assert_eq!(parse(&build_list_nav(ListNavKind::Back)).unwrap(), CallbackPayload::ListNav(ListNavKind::Back));
    }
}
