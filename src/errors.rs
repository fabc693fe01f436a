// Copyright 2017-2018 Peter Williams <peter@newton.cx> and collaborators
// Licensed under the GPL version 3.

//! Errors raised by flux calculations.

use std::error::Error;
use std::fmt;
use std::io;

use quadrature::QuadError;


/// Why did a flux calculation fail?
#[derive(Clone,Copy,Debug,Eq,Hash,PartialEq)]
pub enum FluxErrorKind {
    /// Requested bounds fall outside the valid domain of a table or model,
    /// or the inputs describe an empty or inverted range.
    Range,

    /// A quadrature failed catastrophically, e.g. on a non-finite integrand.
    Numerical,

    /// A table file could not be read, parsed or written.
    Io,
}


/// Error returned by the fallible operations of this crate.
#[derive(Clone,Debug,PartialEq)]
pub struct FluxError {
    kind: FluxErrorKind,
    message: String,
}

impl fmt::Display for FluxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            FluxErrorKind::Range => write!(f, "range error: {}", self.message),
            FluxErrorKind::Numerical => write!(f, "numerical failure: {}", self.message),
            FluxErrorKind::Io => write!(f, "I/O failure: {}", self.message),
        }
    }
}

impl Error for FluxError {}

impl FluxError {
    /// A bounds or domain violation.
    pub fn range<S: Into<String>>(message: S) -> Self {
        FluxError { kind: FluxErrorKind::Range, message: message.into() }
    }

    /// A catastrophic numerical failure.
    pub fn numerical<S: Into<String>>(message: S) -> Self {
        FluxError { kind: FluxErrorKind::Numerical, message: message.into() }
    }

    /// A failure reading or writing a table.
    pub fn io<S: Into<String>>(message: S) -> Self {
        FluxError { kind: FluxErrorKind::Io, message: message.into() }
    }

    /// What sort of failure this is.
    pub fn kind(&self) -> FluxErrorKind {
        self.kind
    }

    /// The human-readable description, without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for FluxError {
    fn from(e: io::Error) -> Self {
        FluxError::io(e.to_string())
    }
}

impl From<QuadError> for FluxError {
    fn from(e: QuadError) -> Self {
        FluxError::numerical(e.to_string())
    }
}


/// Shorthand for results of flux calculations.
pub type FluxResult<T> = Result<T, FluxError>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_kind() {
        let e: FluxError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(e.kind(), FluxErrorKind::Io);

        let e: FluxError = QuadError::NonFinite(0.5).into();
        assert_eq!(e.kind(), FluxErrorKind::Numerical);
        assert!(e.message().contains("not finite"));
    }

    #[test]
    fn display_names_kind() {
        let e = FluxError::range("window [0, 20] exceeds table [1, 10]");
        assert_eq!(e.to_string(), "range error: window [0, 20] exceeds table [1, 10]");
    }
}
