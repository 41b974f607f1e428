//! Terminal presentation: spinner, colors and interactive prompts.

use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

/// Whether the user backed out of an inquire prompt (Escape or Ctrl+C).
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow, mapping a cancelled prompt to `Ok(None)`.
pub fn interactive<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            // leave the terminal on a fresh line
            eprintln!();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
