use thiserror::Error;

/// Everything that can go wrong talking to the webservice.
///
/// Failures surface unchanged at the call site; the crate has no retry or
/// recovery layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure or non-success HTTP status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not well-formed XML.
    #[error("malformed response: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The service answered with a SOAP fault.
    #[error("soap fault {code}: {message}")]
    Fault { code: String, message: String },

    /// A scalar-valued operation came back without its result element.
    #[error("no {0}Result element in the response")]
    MissingResult(String),

    /// A scalar result that should be an integer but is not.
    #[error("unreadable integer in response: {0}")]
    Int(#[from] std::num::ParseIntError),

    /// A last-change-date result that does not parse as a datetime.
    #[error("unreadable datetime in response: {0}")]
    Date(#[from] chrono::format::ParseError),
}
