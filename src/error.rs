use std::fmt::{Display, Formatter};
use std::num::TryFromIntError;

use config::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Internal(String),
    Value(String),
    Parse(String),
    InvalidConfiguration(String),
}

impl Error {
    pub fn internal(msg: impl Into<String>) -> Error {
        Error::Internal(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Error {
        Error::Value(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Error {
        Error::Parse(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Error {
        Error::InvalidConfiguration(msg.into())
    }
}

#[macro_export]
macro_rules! parse_err {
    ($($arg:tt)*) => {
        $crate::error::Error::parse(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        $crate::error::Error::invalid_config(format!($($arg)*))
    };
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Internal(s) | Error::Value(s) => {
                write!(f, "{}", s)
            }
            Error::Parse(s) => write!(f, "parse error: {}", s),
            Error::InvalidConfiguration(s) => write!(f, "invalid configuration: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Frozen | ConfigError::Foreign(_) => Error::Internal(err.to_string()),
            _ => Error::InvalidConfiguration(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            return Error::Internal(err.to_string());
        }
        match err.position() {
            Some(pos) => Error::Parse(format!("invalid row at line {}: {}", pos.line(), err)),
            None => Error::Parse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<log::ParseLevelError> for Error {
    fn from(err: log::ParseLevelError) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Error::Internal(err.to_string())
    }
}
