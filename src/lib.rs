pub mod cli;
pub mod clock;
pub mod error;
pub mod format;
pub mod json;
pub mod logging;
mod macros;
pub mod mask;
pub mod printer;
pub mod program;
pub mod resolve;
pub mod settings;
pub mod source;
pub mod stack;
pub mod value;
pub mod variant;

pub use error::{GpError, Result};
pub use printer::{Emitter, Printer, ReportFormat};
pub use settings::Settings;
pub use stack::{CallStack, FrameGuard, StackFrame};
pub use value::{Dump, Value};
