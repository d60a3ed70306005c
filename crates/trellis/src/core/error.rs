use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Parse error marker type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
    /// Parse error message.
    message: String,
}

impl ParseError {
    /// Construct a parse error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("font not found: {0}")]
    /// The font backend could not resolve the base font family.
    FontNotFound(String),

    #[error("node not found: {0:?}")]
    /// A node ID did not resolve in the arena.
    NodeNotFound(NodeId),

    #[error("adding {child:?} under {parent:?} would create a cycle")]
    /// An attach would make a node its own ancestor.
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },

    #[error("invalid operation: {0}")]
    /// Tree misuse, such as removing the root.
    InvalidOperation(String),

    #[error("parse error: {0}")]
    /// Parsing failure.
    Parse(#[source] ParseError),

    #[error("render: {0}")]
    /// Drawing backend failure.
    Render(String),

    #[error("backend: {0}")]
    /// Font or event backend failure.
    Backend(String),

    #[error("handler: {0}")]
    /// Failure returned by a user handler.
    Handler(String),
}

impl Error {
    /// Construct a handler error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }

    /// Construct a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(ParseError::new(msg))
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}
