use std::error;
use std::fmt;

/// Everything that can go wrong with one batched quote request. Consumers of
/// the board only ever see the `Display` text of this.
#[derive(Debug)]
pub enum QuoteRequestError {
    HttpRequest(reqwest::Error),
    HttpStatus(reqwest::StatusCode),
    JsonParse(serde_json::Error),
    Malformed(String),
    Other(String),
}

impl fmt::Display for QuoteRequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QuoteRequestError::HttpRequest(ref err) => write!(f, "HTTP Request Error: {}", err),
            QuoteRequestError::HttpStatus(status) => {
                write!(f, "Failed to fetch crypto data: HTTP status {}", status)
            }
            QuoteRequestError::JsonParse(ref err) => write!(f, "JSON Parse Error: {}", err),
            QuoteRequestError::Malformed(ref err) => write!(f, "Malformed Response: {}", err),
            QuoteRequestError::Other(ref err) => write!(f, "Other Error: {}", err),
        }
    }
}

impl error::Error for QuoteRequestError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            QuoteRequestError::HttpRequest(ref err) => Some(err),
            QuoteRequestError::JsonParse(ref err) => Some(err),
            QuoteRequestError::HttpStatus(_)
            | QuoteRequestError::Malformed(_)
            | QuoteRequestError::Other(_) => None,
        }
    }
}

impl From<reqwest::Error> for QuoteRequestError {
    fn from(err: reqwest::Error) -> QuoteRequestError {
        QuoteRequestError::HttpRequest(err)
    }
}

impl From<serde_json::Error> for QuoteRequestError {
    fn from(err: serde_json::Error) -> QuoteRequestError {
        QuoteRequestError::JsonParse(err)
    }
}

impl From<&str> for QuoteRequestError {
    fn from(err: &str) -> QuoteRequestError {
        QuoteRequestError::Other(err.to_string())
    }
}

impl From<String> for QuoteRequestError {
    fn from(err: String) -> QuoteRequestError {
        QuoteRequestError::Other(err)
    }
}
