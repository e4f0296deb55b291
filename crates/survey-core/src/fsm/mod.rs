pub mod main_menu;
pub mod record;

pub use main_menu::{MainMenuEvent, MainMenuFsm, MainMenuState};
pub use record::{NoRecordTransition, RecordEvent, RecordFsm, RecordState};
