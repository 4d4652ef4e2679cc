use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort a parse.
///
/// Only fatal conditions live here. Non-fatal structural irregularities are
/// reported through a [DiagnosticSink](crate::diagnostics::DiagnosticSink)
/// and decoding continues with best-effort data.
#[derive(Error, Debug, Clone)]
pub enum ReadLasError {
    #[error(transparent)]
    Io(Arc<io::Error>), // std::io::Error is not Clone. Wrapping it in an Arc allows us to make ReadLasError Clone.
    #[error("Read of {count} bytes at offset {offset} is out of bounds (buffer is {buffer_len} bytes)")]
    OutOfBounds {
        offset: usize,
        count: usize,
        buffer_len: usize,
    },
    #[error("Bad LAS header: {desc}")]
    MalformedHeader { desc: String },
}

impl From<io::Error> for ReadLasError {
    fn from(e: io::Error) -> Self {
        ReadLasError::Io(Arc::new(e))
    }
}
