use crate::cloud::LasData;
use crate::cursor::ByteCursor;
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::error::ReadLasError;
use crate::header::PublicHeader;
use crate::point::{PointDataRecord, PointFormat};
use crate::vlr::{ExtendedVariableLengthRecord, VariableLengthRecord};
use log::{debug, error};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Options for [read_with].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Decode only the header and the point records, skipping the VLR and
    /// EVLR regions entirely. On by default; most consumers only want
    /// coordinates and colors.
    pub point_data_only: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            point_data_only: true,
        }
    }
}

/// Reads a LAS file with default options, reporting diagnostics to the log.
///
/// Returns `None` if the file cannot be opened, does not start with the LAS
/// signature, declares a point format outside the documented range, or ends
/// before the data it declares. Non-fatal irregularities are logged and the
/// best-effort result is still returned.
pub fn read(path: impl AsRef<Path>) -> Option<Arc<LasData>> {
    read_with(path, &ReadOptions::default(), &LogSink)
}

/// Like [read], with explicit options and diagnostic sink.
pub fn read_with(
    path: impl AsRef<Path>,
    options: &ReadOptions,
    sink: &dyn DiagnosticSink,
) -> Option<Arc<LasData>> {
    let path = path.as_ref();
    match try_read_with(path, options, sink) {
        Ok(data) => Some(Arc::new(data)),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Fallible variant of [read_with] for callers that want the error instead
/// of a log line.
pub fn try_read_with(
    path: &Path,
    options: &ReadOptions,
    sink: &dyn DiagnosticSink,
) -> Result<LasData, ReadLasError> {
    let start = Instant::now();

    // The whole file is materialized before any structural parsing; point
    // records and EVLRs are addressed by absolute offsets into this buffer.
    let file_bytes = fs::read(path)?;
    let data = decode(&file_bytes, options, sink)?;

    debug!(
        "Decoded {} points from {} in {:?}",
        data.num_points(),
        path.display(),
        start.elapsed()
    );
    Ok(data)
}

fn decode(
    file_bytes: &[u8],
    options: &ReadOptions,
    sink: &dyn DiagnosticSink,
) -> Result<LasData, ReadLasError> {
    let mut cursor = ByteCursor::new(file_bytes);
    let header = PublicHeader::read_from(&mut cursor)?;
    let format = header.point_format();
    debug!("point data record format: {}", format.code);

    let variable_length_records = if options.point_data_only {
        Vec::new()
    } else {
        read_vlrs(&cursor, &header, sink)?
    };

    let point_data_records = read_points(&cursor, &header, format, sink)?;

    let extended_variable_length_records = if options.point_data_only {
        Vec::new()
    } else {
        read_evlrs(&cursor, &header)?
    };

    Ok(LasData {
        header,
        variable_length_records,
        point_data_records,
        extended_variable_length_records,
    })
}

/// Walks the VLR region between header end and point data start.
///
/// Stops at the declared record count, or earlier if the next record would
/// start at or past the point data. The early stop is a structural
/// inconsistency of the file, reported as a diagnostic; records decoded up
/// to that point are kept.
fn read_vlrs(
    cursor: &ByteCursor,
    header: &PublicHeader,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<VariableLengthRecord>, ReadLasError> {
    let declared = header.number_of_variable_length_records;
    debug!("variable length records: {declared}");

    let mut vlr_cursor = cursor.fork_at(usize::from(header.header_size));
    let mut records = Vec::new();
    for _ in 0..declared {
        if vlr_cursor.position() >= header.offset_to_point_data as usize {
            sink.report(Diagnostic::VlrRegionOverflow {
                decoded: records.len(),
                declared,
            });
            break;
        }
        records.push(VariableLengthRecord::read_from(&mut vlr_cursor, sink)?);
    }
    Ok(records)
}

/// Decodes all point records.
///
/// Record `i` lives at `offset_to_point_data + i * point_data_record_length`
/// regardless of format, so records have no dependency on each other and the
/// loop runs index-parallel; collecting preserves index order.
fn read_points(
    cursor: &ByteCursor,
    header: &PublicHeader,
    format: PointFormat,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<PointDataRecord>, ReadLasError> {
    let count = usize::try_from(header.point_count()).unwrap_or(usize::MAX);
    debug!("point records: {count}");

    let offset_to_point_data = header.offset_to_point_data as usize;
    let stride = usize::from(header.point_data_record_length);

    (0..count)
        .into_par_iter()
        .map(|index| {
            // saturate: an offset beyond the buffer fails as OutOfBounds
            let offset = offset_to_point_data.saturating_add(index.saturating_mul(stride));
            let mut record_cursor = cursor.fork_at(offset);
            PointDataRecord::read_from(&mut record_cursor, format, sink)
        })
        .collect()
}

/// Walks the EVLR region at the file tail. Nothing to do for files before
/// las 1.4, which cannot declare EVLRs.
fn read_evlrs(
    cursor: &ByteCursor,
    header: &PublicHeader,
) -> Result<Vec<ExtendedVariableLengthRecord>, ReadLasError> {
    if !(header.has_first_evlr && header.has_evlr_count) {
        return Ok(Vec::new());
    }
    let declared = header.number_of_evlrs;
    debug!("extended variable length records: {declared}");

    let mut evlr_cursor = cursor.fork_at(header.start_of_first_evlr as usize);
    let mut records = Vec::new();
    for _ in 0..declared {
        records.push(ExtendedVariableLengthRecord::read_from(&mut evlr_cursor)?);
    }
    Ok(records)
}
