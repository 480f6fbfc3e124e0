//! Text rendering: variable dumps, call stack traces and small helpers.
//!
//! Everything here is a pure function from values to `String`; printing,
//! timestamps and masking happen in [`crate::Printer`].

mod stack;
mod text;
mod var;

pub use stack::{NO_FUNCTION, func_and_args, sprint_call_stack};
pub use text::{sindent, sprint, sprint_dashes, sprintn};
pub use var::{BLANK, FORMATTER_NAME, scalar_text, sprint_varx};
