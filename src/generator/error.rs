use thiserror::Error;

use crate::{
    error::LineError,
    tables::{Line, TableError},
};

/// An error as produced by the code generator: a table failure, annotated
/// with the source line of the construct being generated.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct GenError {
    kind: TableError,
    line: Line,
}
impl GenError {
    pub fn new(kind: TableError, line: Line) -> Self {
        Self { kind, line }
    }
    pub fn kind(&self) -> &TableError {
        &self.kind
    }
}
impl LineError for GenError {
    fn line(&self) -> Line {
        self.line
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

pub trait AddLine {
    type Annotated;

    fn add_line(self, line: Line) -> Self::Annotated;
}

impl<O> AddLine for Result<O, TableError> {
    type Annotated = Result<O, GenError>;

    fn add_line(self, line: Line) -> Self::Annotated {
        self.map_err(|kind| GenError::new(kind, line))
    }
}
