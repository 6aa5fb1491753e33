//! Reading text to translate from files and stdin.

mod reader;

pub use reader::{InputReader, MAX_TEXT_CHARS};
