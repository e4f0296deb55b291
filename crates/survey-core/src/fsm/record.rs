//! Record FSM (spec.md §4.6) — a small hand-rolled interpreter over the
//! three record-session states.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordState {
    #[default]
    RecordIdle,
    SelectingSection,
    AnsweringQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEvent {
    StartRecord,
    SelectSection,
    AnswerQuestion,
    SectionComplete,
    CancelSection,
    SaveRecord,
    ExitToMenu,
    ForceExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no transition for {event:?} from {from:?}")]
pub struct NoRecordTransition {
    pub from: RecordState,
    pub event: RecordEvent,
}

/// A tiny hand-rolled FSM interpreter over [`RecordState`].
///
/// The `answering-question --answer-question--> answering-question`
/// self-loop is explicitly present in the table below, unlike some FSM
/// libraries that reject a transition whose target equals the current
/// state. Per spec.md's Design Notes this self-loop is mandatory behavior
/// regardless of the library's default semantics: [`Self::fire`] always
/// accepts it, and [`Self::fire_or_reenter`] additionally demonstrates the
/// fallback a stricter FSM implementation would need.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFsm(RecordState);

impl RecordFsm {
    pub fn new() -> Self {
        Self(RecordState::RecordIdle)
    }

    pub fn state(&self) -> RecordState {
        self.0
    }

    pub fn fire(&mut self, event: RecordEvent) -> Result<RecordState, NoRecordTransition> {
        use RecordEvent::*;
        use RecordState::*;

        if event == ForceExit && self.0 != RecordIdle {
            self.0 = RecordIdle;
            return Ok(RecordIdle);
        }

        let next = match (self.0, event) {
            (RecordIdle, StartRecord) => SelectingSection,
            (SelectingSection, SelectSection) => AnsweringQuestion,
            (AnsweringQuestion, AnswerQuestion) => AnsweringQuestion,
            (AnsweringQuestion, SectionComplete) => SelectingSection,
            (AnsweringQuestion, CancelSection) => SelectingSection,
            (SelectingSection, SaveRecord) => RecordIdle,
            (SelectingSection, ExitToMenu) => RecordIdle,
            (from, event) => return Err(NoRecordTransition { from, event }),
        };
        self.0 = next;
        Ok(next)
    }

    /// Fire `event`; if the underlying table refuses it (can only happen for
    /// a stricter/alternate FSM backing than the one above), re-enter the
    /// current state directly rather than surfacing the rejection to the
    /// caller. The dispatcher uses this for `AnswerQuestion` progression
    /// (spec.md §4.6 "Answer progression").
    pub fn fire_or_reenter(&mut self, event: RecordEvent) -> RecordState {
        match self.fire(event) {
            Ok(state) => state,
            Err(_) => self.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_happy_path_cycle() {
        let mut fsm = RecordFsm::new();
        assert_eq!(fsm.fire(RecordEvent::StartRecord), Ok(RecordState::SelectingSection));
        assert_eq!(fsm.fire(RecordEvent::SelectSection), Ok(RecordState::AnsweringQuestion));
        assert_eq!(fsm.fire(RecordEvent::AnswerQuestion), Ok(RecordState::AnsweringQuestion));
        assert_eq!(fsm.fire(RecordEvent::SectionComplete), Ok(RecordState::SelectingSection));
        assert_eq!(fsm.fire(RecordEvent::SaveRecord), Ok(RecordState::RecordIdle));
    }

    #[test]
    fn force_exit_from_any_non_idle_state() {
        let mut fsm = RecordFsm::new();
        fsm.fire(RecordEvent::StartRecord).unwrap();
        assert_eq!(fsm.fire(RecordEvent::ForceExit), Ok(RecordState::RecordIdle));

        let mut fsm2 = RecordFsm::new();
        fsm2.fire(RecordEvent::StartRecord).unwrap();
        fsm2.fire(RecordEvent::SelectSection).unwrap();
        assert_eq!(fsm2.fire(RecordEvent::ForceExit), Ok(RecordState::RecordIdle));
    }

    #[test]
    fn force_exit_from_idle_is_rejected() {
        let mut fsm = RecordFsm::new();
        assert!(fsm.fire(RecordEvent::ForceExit).is_err());
    }

    #[test]
    fn self_loop_accepted() {
        let mut fsm = RecordFsm::new();
        fsm.fire(RecordEvent::StartRecord).unwrap();
        fsm.fire(RecordEvent::SelectSection).unwrap();
        assert_eq!(fsm.fire(RecordEvent::AnswerQuestion), Ok(RecordState::AnsweringQuestion));
    }

    #[test]
    fn fire_or_reenter_falls_back_on_rejection() {
        let mut fsm = RecordFsm::new();
        // `SaveRecord` is invalid from `RecordIdle`; the fallback must keep
        // the FSM in its current state rather than propagating the error.
        let state = fsm.fire_or_reenter(RecordEvent::SaveRecord);
        assert_eq!(state, RecordState::RecordIdle);
    }

    #[test]
    fn cancel_section_returns_to_selecting() {
        let mut fsm = RecordFsm::new();
        fsm.fire(RecordEvent::StartRecord).unwrap();
        fsm.fire(RecordEvent::SelectSection).unwrap();
        assert_eq!(fsm.fire(RecordEvent::CancelSection), Ok(RecordState::SelectingSection));
    }
}
