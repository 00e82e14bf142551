use thiserror::Error;

pub const MSG_NETWORK: &str =
    "❌ Kan ikke koble til RailAdvice AI backend. Sjekk internettforbindelsen.";
pub const MSG_INVALID_REQUEST: &str =
    "❌ Ugyldig forespørsel. Prøv å omformulere spørsmålet ditt.";
pub const MSG_SERVER_ERROR: &str = "❌ Intern serverfeil. AI-systemet har problemer.";
pub const MSG_CORS: &str =
    "❌ CORS-feil. Backend må konfigureres for å tillate forespørsler fra dette domenet.";

/// Detail used when a failed response has no parsable body
pub const UNKNOWN_DETAIL: &str = "Ukjent feil";

/// Failure of a single request to the RailAdvice API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The host could not be reached (DNS, refused connection, timeout)
    #[error("Failed to fetch: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("API Error {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The server rejected the request's origin
    #[error("API Error {status}: {detail} (cors)")]
    Cors { status: u16, detail: String },

    /// A 2xx response whose body was not the expected JSON
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Diagnostic category used to pick the message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    InvalidRequest,
    ServerError,
    Cors,
    Unknown,
}

impl ChatError {
    /// Build the error for a non-2xx response. A detail mentioning CORS marks
    /// an origin rejection unless the status already has its own diagnostic.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        if status != 422 && status != 500 && detail.to_lowercase().contains("cors") {
            ChatError::Cors { status, detail }
        } else {
            ChatError::Http { status, detail }
        }
    }

    /// Checked in order: network, 422, 500, CORS, everything else.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::Network(_) => ErrorKind::Network,
            ChatError::Http { status: 422, .. } => ErrorKind::InvalidRequest,
            ChatError::Http { status: 500, .. } => ErrorKind::ServerError,
            ChatError::Cors { .. } => ErrorKind::Cors,
            ChatError::Http { .. } | ChatError::Decode(_) => ErrorKind::Unknown,
        }
    }

    /// The chat bubble text for this failure
    pub fn diagnostic(&self) -> String {
        match self.kind() {
            ErrorKind::Network => MSG_NETWORK.to_string(),
            ErrorKind::InvalidRequest => MSG_INVALID_REQUEST.to_string(),
            ErrorKind::ServerError => MSG_SERVER_ERROR.to_string(),
            ErrorKind::Cors => MSG_CORS.to_string(),
            ErrorKind::Unknown => format!("❌ Feil: {}", self),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ChatError::from_status(status.as_u16(), err.to_string())
        } else {
            ChatError::Network(err.to_string())
        }
    }
}
