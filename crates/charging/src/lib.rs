use std::{error::Error, fmt};

use validation::ValidationError;

pub mod client;
pub mod database;
pub mod memory;
pub mod query;
pub mod validation;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    /// The request itself is malformed.
    Invalid(ValidationError),
    /// The request is well-formed, but refers to data that does not exist.
    Unprocessable(String),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "The requested item does not exist."),
            Self::Invalid(why) => write!(f, "{}", why),
            Self::Unprocessable(why) => write!(f, "{}", why),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::MissingReference => {
                Self::Unprocessable("Referenced company doesn't exist".to_owned())
            }
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl From<ValidationError> for RequestError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
