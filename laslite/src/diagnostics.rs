use log::error;
use std::fmt;
use std::sync::Mutex;

/// A non-fatal structural anomaly found while decoding.
///
/// These do not abort the parse; the affected record gets best-effort
/// contents and decoding continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A point record with format code 5-15: structurally recognized, but
    /// the payload layout is not decoded. The record is left zeroed.
    UnsupportedPointFormat { format: u8 },

    /// A VLR declaring a payload above the 16 bit limit. The payload is left
    /// empty and the following records are still decoded.
    OversizedVlrPayload { record_id: u16, declared_length: u64 },

    /// The declared VLR count does not fit between the header end and the
    /// start of point data. Records decoded so far are kept.
    VlrRegionOverflow { decoded: usize, declared: u32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedPointFormat { format } => {
                write!(f, "Unsupported point data record format: {format}")
            }
            Diagnostic::OversizedVlrPayload {
                record_id,
                declared_length,
            } => write!(
                f,
                "VLR {record_id} exceeds the payload limit of a variable length record: {declared_length}"
            ),
            Diagnostic::VlrRegionOverflow { decoded, declared } => write!(
                f,
                "The total size of VLRs exceeds the start of point data records ({decoded} of {declared} decoded)"
            ),
        }
    }
}

/// Receiver for [Diagnostic]s emitted during a decode session.
///
/// Point records may be decoded in parallel, so sinks are shared across
/// worker threads and report through a shared reference.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        error!("{diagnostic}");
    }
}

/// Collects diagnostics in memory so that callers (mostly tests) can inspect
/// what a parse reported.
#[derive(Debug, Default)]
pub struct BufferSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock().unwrap())
    }
}

impl DiagnosticSink for BufferSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic);
    }
}
