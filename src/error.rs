use thiserror::Error;

/// Errors produced while turning a request into a rendered card.
///
/// Everything upstream of rendering collapses into one of these; the HTTP
/// layer converts them into an error card (or a JSON error object) so the
/// caller always receives a response of the requested type.
#[derive(Debug, Error)]
pub enum Error {
    /// The contribution calendar came back with no days at all.
    #[error("No contribution data found")]
    EmptyDataset,

    /// GitHub does not know the requested login.
    #[error("Could not find a user with the username \"{0}\"")]
    UserNotFound(String),

    /// Transport or decode failure while talking to the GitHub API.
    #[error("Failed to fetch contribution data: {0}")]
    Fetch(String),

    /// The `theme` parameter named a preset that is not bundled.
    /// Non-fatal: the caller falls back to the default theme.
    #[error("Unknown theme \"{0}\"")]
    UnknownTheme(String),

    /// A required request parameter is missing or unusable.
    #[error("{0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
