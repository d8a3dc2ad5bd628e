use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    InvalidInput(String),
    InvalidData(String),
    Status(String),
    Transport(String),
    Io(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn status<M: Into<String>>(message: M) -> Self {
        Self::Status(message.into())
    }

    pub fn transport<M: Into<String>>(message: M) -> Self {
        Self::Transport(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Status(_) => "http_status",
            Self::Transport(_) => "transport_error",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) => message,
            Self::InvalidData(message) => message,
            Self::Status(message) => message,
            Self::Transport(message) => message,
            Self::Io(message) => message,
        }
    }

    /// True when the failure happened on the wire rather than locally.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Status(_) | Self::Transport(_) | Self::InvalidData(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}
