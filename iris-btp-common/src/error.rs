use thiserror::Error;

/// An Error enum capturing the errors produced by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Block/stride parameters inconsistent with the iris-code dimensions
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Fusion or comparison inputs of incompatible dimensions
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    /// Non-binary values or wrong row/column count in a source file
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// A referenced template file was absent at scoring time
    #[error("missing template: {0}")]
    MissingResource(String),
    /// An IO error has occurred
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Some other error has occurred.
    #[error("Err: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(mes: String) -> Self {
        Self::Other(mes)
    }
}

impl From<&str> for Error {
    fn from(mes: &str) -> Self {
        Self::Other(mes.to_owned())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
