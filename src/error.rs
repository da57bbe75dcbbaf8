use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum AuthGateError {
    // Request errors
    InvalidInput(String),

    // Authentication errors
    InvalidCredentials,
    MissingAuthHeader,
    InvalidToken,
    NoSession,

    // Authorization errors
    InsufficientRole,
    AdminRequired,
    UnknownResource(String),

    // CSRF errors
    CsrfMismatch,

    // Configuration errors
    ConfigError(String),

    // System errors
    SystemError(String),
}

impl fmt::Display for AuthGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "{}", msg),
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
            Self::MissingAuthHeader => write!(f, "Missing or invalid Authorization header"),
            // Expired and forged tokens deliberately share one message
            Self::InvalidToken => write!(f, "Invalid or expired token"),
            Self::NoSession => write!(f, "No valid session"),
            Self::InsufficientRole => write!(f, "Insufficient role"),
            Self::AdminRequired => write!(f, "Admin role required"),
            Self::UnknownResource(name) => write!(f, "Unknown resource: {}", name),
            Self::CsrfMismatch => write!(f, "Invalid CSRF token"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl Error for AuthGateError {}

// Generic result type for the auth gate
pub type Result<T> = std::result::Result<T, AuthGateError>;
