// Copyright 2026 The Packsim Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InfeasibleConfiguration,
    BadPayload,
    BadItem,
    BadGrid,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            InfeasibleConfiguration => "infeasible_configuration",
            BadPayload => "bad_payload",
            BadItem => "bad_item",
            BadGrid => "bad_grid",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised while decoding host input, before the engine runs.
    Input,
    /// Raised by the engine itself.
    Simulation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            details,
        }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Input,
            code: ErrorCode::BadPayload,
            details: Some(err.to_string()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Input => "InputError",
            ErrorKind::Simulation => "SimulationError",
        };
        match self.details {
            Some(ref details) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            None => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! sim_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(
            ErrorKind::Simulation,
            ErrorCode::$code,
            Some($str),
        ))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Simulation, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! input_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Input, ErrorCode::$code, Some($str)))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Simulation,
        ErrorCode::InfeasibleConfiguration,
        Some("no successful simulations".to_string()),
    );
    assert_eq!(
        "SimulationError{infeasible_configuration: no successful simulations}",
        format!("{err}")
    );

    let err = Error::new(ErrorKind::Input, ErrorCode::BadItem, None);
    assert_eq!("InputError{bad_item}", format!("{err}"));
}

#[test]
fn test_error_from_json() {
    let parse: result::Result<u32, _> = serde_json::from_str("{not json");
    let err: Error = parse.unwrap_err().into();
    assert_eq!(ErrorKind::Input, err.kind);
    assert_eq!(ErrorCode::BadPayload, err.code);
    assert!(err.get_details().is_some());
}
