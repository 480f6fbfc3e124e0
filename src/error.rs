use thiserror::Error;

/// Everything that can go wrong while resolving a call site.
///
/// Formatting never fails: values of an unsupported type degrade to a
/// placeholder line instead of an error.
#[derive(Debug, Error)]
pub enum GpError {
    /// A caller passed an out-of-range position or depth.
    #[error(
        "Programmer error - Variable \"{name}\" has an invalid value of \"{value}\".  The value must be an integer that is {requirement}."
    )]
    InvalidArgument {
        name: &'static str,
        value: usize,
        requirement: &'static str,
    },

    #[error(
        "Programmer error - The caller has asked for information about the stack frame at index \"{index}\".  However, the stack only contains {depth} entries.  Therefore the stack frame index is out of range."
    )]
    StackIndexOutOfRange { index: usize, depth: usize },

    /// The frame has no backing source text (synthetic or unreadable).
    #[error("no source text is available for frame \"{function}\" ({origin})")]
    SourceUnavailable { function: String, origin: String },

    #[error(
        "Programmer error - Could not find the source line with a reference to function \"{function}\"."
    )]
    CallSiteNotFound { function: String },

    #[error(
        "Programmer error - The caller has asked for the name of argument number \"{requested}\" but there were only \"{}\" args used:\n{listing}",
        args.len()
    )]
    ArgumentCountMismatch {
        requested: usize,
        args: Vec<String>,
        /// The parsed list rendered as a variable dump.
        listing: String,
    },

    #[error("invalid JSON at byte {offset}: {message}")]
    Json { offset: usize, message: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GpError {
    /// Text suitable for appending to an `**ERROR**` line: the message
    /// with exactly one trailing line feed.
    #[must_use]
    pub fn report_text(&self) -> String {
        let mut text = self.to_string();
        while text.ends_with('\n') {
            text.pop();
        }
        text.push('\n');
        text
    }
}

pub type Result<T> = std::result::Result<T, GpError>;
