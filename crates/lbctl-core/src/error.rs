use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{kind} not found: {id_or_name}")]
    NotFound {
        kind: &'static str,
        id_or_name: String,
    },

    #[error("{field} date has an invalid format. It should be ISO 8601, like: {example}")]
    InvalidTimeFormat { field: &'static str, example: String },

    #[error("unknown metric type: {0}")]
    UnknownMetricType(String),

    #[error("{message} ({code}, HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("action {id} failed: {message} ({code})")]
    ActionFailed {
        id: i64,
        code: String,
        message: String,
    },

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, id_or_name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id_or_name: id_or_name.into(),
        }
    }
}
