use thiserror::Error;

pub type TabularResult<T> = Result<T, TabularError>;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("no backtest has been run yet")]
    NoBacktest,
}
