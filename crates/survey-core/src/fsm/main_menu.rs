//! Main-menu FSM (spec.md §4.5) — a small hand-rolled interpreter.
//!
//! Per the spec's Design Notes ("FSM library independence"), the
//! state/transition table is all that is mandated; no external FSM crate is
//! required. This module only holds the pure table. The side effects that
//! accompany each transition (rendering the list view, restoring the main
//! menu keyboard) belong to the dispatcher (`survey-engine`), which is
//! handed the resulting state and decides what to render.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainMenuState {
    #[default]
    Idle,
    ViewingList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuEvent {
    ViewList,
    ListNext,
    ListBack,
    BackToIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no transition for {event:?} from {from:?}")]
pub struct NoMainMenuTransition {
    pub from: MainMenuState,
    pub event: MainMenuEvent,
}

/// A tiny hand-rolled FSM interpreter over [`MainMenuState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MainMenuFsm(MainMenuState);

impl MainMenuFsm {
    pub fn new() -> Self {
        Self(MainMenuState::Idle)
    }

    pub fn state(&self) -> MainMenuState {
        self.0
    }

    /// Apply `event`, mutating state in place on success.
    pub fn fire(&mut self, event: MainMenuEvent) -> Result<MainMenuState, NoMainMenuTransition> {
        use MainMenuEvent::*;
        use MainMenuState::*;
        let next = match (self.0, event) {
            (Idle, ViewList) => ViewingList,
            (ViewingList, ListNext) => ViewingList,
            (ViewingList, ListBack) => ViewingList,
            (ViewingList, BackToIdle) => Idle,
            (from, event) => return Err(NoMainMenuTransition { from, event }),
        };
        self.0 = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_to_viewing_list() {
        let mut fsm = MainMenuFsm::new();
        assert_eq!(fsm.fire(MainMenuEvent::ViewList), Ok(MainMenuState::ViewingList));
    }

    #[test]
    fn viewing_list_paginate_stays() {
        let mut fsm = MainMenuFsm::new();
        fsm.fire(MainMenuEvent::ViewList).unwrap();
        assert_eq!(fsm.fire(MainMenuEvent::ListNext), Ok(MainMenuState::ViewingList));
        assert_eq!(fsm.fire(MainMenuEvent::ListBack), Ok(MainMenuState::ViewingList));
    }

    #[test]
    fn back_to_idle() {
        let mut fsm = MainMenuFsm::new();
        fsm.fire(MainMenuEvent::ViewList).unwrap();
        assert_eq!(fsm.fire(MainMenuEvent::BackToIdle), Ok(MainMenuState::Idle));
    }

    #[test]
    fn invalid_transition_rejected() {
        let mut fsm = MainMenuFsm::new();
        assert!(fsm.fire(MainMenuEvent::ListNext).is_err());
        // State unchanged after a rejected transition.
        assert_eq!(fsm.state(), MainMenuState::Idle);
    }
}
