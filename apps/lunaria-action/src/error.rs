//! Error type shared by the action's fallible steps.
//!
//! Skips (missing pull request context, wrong action, no tracked files) are
//! not errors; they are reported through `action::RunOutcome`.

pub type Result<T, E = ActionError> = core::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    /// The `@lunariajs/core` package could not be located.
    #[error("Failed to find the `@lunariajs/core` package. Did you remember to install dependencies?")]
    EngineNotFound,
    /// The engine's configuration failed validation.
    #[error("Failed to parse your Lunaria config:\n{0}")]
    InvalidConfig(String),
    /// A required input was not provided on the CLI or in the environment.
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),
    #[error("event payload: {0}")]
    Event(String),
    #[error("engine output: {0}")]
    EngineOutput(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GitHub API error ({status}) on {url}: {body}")]
    Api {
        status: u16,
        url: String,
        body: String,
    },
    #[error("http: {0}")]
    Http(String),
    #[error("invalid ignore keywords: {0}")]
    Regex(#[from] regex::Error),
}

impl ActionError {
    pub fn event(msg: impl Into<String>) -> Self {
        Self::Event(msg.into())
    }
    pub fn engine_output(msg: impl Into<String>) -> Self {
        Self::EngineOutput(msg.into())
    }
}

impl From<ureq::Error> for ActionError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, resp) => {
                let url = resp.get_url().to_string();
                let body = resp.into_string().unwrap_or_default();
                ActionError::Api { status, url, body }
            }
            ureq::Error::Transport(t) => ActionError::Http(t.to_string()),
        }
    }
}
