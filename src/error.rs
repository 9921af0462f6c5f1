use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrailError>;

#[derive(Error, Debug)]
pub enum TrailError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Local repository error: {0}")]
    LocalRepo(String),
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// Every git failure means the mandatory local source is unreadable,
// so the gix error zoo collapses into LocalRepo.
impl From<gix::discover::Error> for TrailError {
    fn from(err: gix::discover::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

impl From<gix::object::find::existing::Error> for TrailError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for TrailError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

impl From<gix::object::commit::Error> for TrailError {
    fn from(err: gix::object::commit::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

impl From<gix::reference::find::existing::Error> for TrailError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

impl From<gix::head::peel::to_commit::Error> for TrailError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

impl From<gix::objs::decode::Error> for TrailError {
    fn from(err: gix::objs::decode::Error) -> Self {
        TrailError::LocalRepo(err.to_string())
    }
}

// Transport, TLS, decode and status failures are indistinguishable to the
// fallback controller; they all become RemoteUnavailable.
impl From<reqwest::Error> for TrailError {
    fn from(err: reqwest::Error) -> Self {
        TrailError::RemoteUnavailable(err.to_string())
    }
}
