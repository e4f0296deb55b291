pub mod load;
pub mod tree;
pub mod validate;

pub use load::{load_from_path, load_from_str};
pub use tree::{ButtonOption, Question, Schema, Section, RESERVED_KEY_PREFIX};
pub use validate::validate;
