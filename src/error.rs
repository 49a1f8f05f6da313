//! Fatal error kinds for document processing.
//!
//! Every error is terminal for the run: schemabind is a build-time tool, not
//! a long-running service, so there is no partial-result recovery. Structural
//! and mapping errors carry the offending document's file and 1-based line;
//! configuration errors predate any particular node.

use crate::node::Loc;
use std::fmt;

/// A fatal processing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node has the wrong shape or a required node is missing
    /// (e.g. `schema` absent from a body parameter, a `$ref` target with
    /// no schemas, a non-`$ref` member under `allOf`).
    Structural {
        /// Location of the offending node
        loc: Loc,
        /// Human-readable description of the shape violation
        message: String,
    },
    /// A `type`/`format` pair has no entry in the type-rule table, or a
    /// required identifier mapped to an empty replacement.
    Mapping {
        /// Location of the node that triggered the lookup
        loc: Loc,
        /// Description including the unmapped input
        message: String,
    },
    /// Bad rule configuration or document set: unsupported swagger version,
    /// malformed `additionalProperties`, a reference cycle between files.
    Config {
        /// Description of the misconfiguration
        message: String,
    },
}

impl Error {
    pub fn structural(loc: &Loc, message: impl Into<String>) -> Self {
        Error::Structural {
            loc: loc.clone(),
            message: message.into(),
        }
    }

    pub fn mapping(loc: &Loc, message: impl Into<String>) -> Self {
        Error::Mapping {
            loc: loc.clone(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Structural { loc, message } => write!(f, "{loc}: {message}"),
            Error::Mapping { loc, message } => write!(f, "{loc}: {message}"),
            Error::Config { message } => write!(f, "configuration error: {message}"),
        }
    }
}

impl std::error::Error for Error {}
