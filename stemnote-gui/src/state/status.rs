//! Status line shown under the views.

/// Severity of the last status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Error,
}

/// User-facing status message.
pub struct Status {
    /// Message text.
    pub text: String,
    /// Severity, used for coloring.
    pub level: StatusLevel,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            text: "Ready".to_string(),
            level: StatusLevel::Info,
        }
    }
}

impl Status {
    /// Replace the message with an informational one.
    pub fn info(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.level = StatusLevel::Info;
    }

    /// Replace the message with an error.
    pub fn error(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.level = StatusLevel::Error;
    }
}
