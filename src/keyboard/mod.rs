//! Keyboard event source

mod event;
pub mod keymap;

pub use event::{diff_keys, KeyListener, KeyTransition};
pub use keymap::{key_label, key_position};
