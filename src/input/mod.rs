//! Source text intake from a file or stdin.

mod reader;

pub use reader::{MAX_INPUT_SIZE, read_input, read_limited};
