use crate::cursor::ByteCursor;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ReadLasError;

/// Payloads above this limit do not fit the VLR length field; the record is
/// kept with an empty payload and a diagnostic is reported.
const MAX_VLR_PAYLOAD_BYTES: u64 = u16::MAX as u64;

/// A variable length record from the metadata region between the public
/// header and the point data.
///
/// The payload is opaque to this crate; interpreting it (projection info,
/// extra byte descriptors, ...) is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableLengthRecord {
    pub reserved: u16,
    pub user_id: [u8; 16],
    pub record_id: u16,
    pub record_length_after_header: u16,
    pub description: [u8; 32],
    pub data: Vec<u8>,
}

impl VariableLengthRecord {
    pub fn read_from(
        cursor: &mut ByteCursor,
        sink: &dyn DiagnosticSink,
    ) -> Result<VariableLengthRecord, ReadLasError> {
        let reserved = cursor.read_u16()?;
        let user_id: [u8; 16] = cursor.read_array()?;
        let record_id = cursor.read_u16()?;
        let record_length_after_header = cursor.read_u16()?;
        let description: [u8; 32] = cursor.read_array()?;

        let declared_length = u64::from(record_length_after_header);
        let data = if declared_length <= MAX_VLR_PAYLOAD_BYTES {
            cursor.read_vec(declared_length as usize)?
        } else {
            sink.report(Diagnostic::OversizedVlrPayload {
                record_id,
                declared_length,
            });
            Vec::new()
        };

        Ok(VariableLengthRecord {
            reserved,
            user_id,
            record_id,
            record_length_after_header,
            description,
            data,
        })
    }
}

/// An extended variable length record from the file tail (las >= 1.4).
///
/// Same shape as [VariableLengthRecord] with a 64 bit length field. Unlike
/// the VLR the declared payload length is trusted as-is; a length that runs
/// past the end of the buffer fails the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedVariableLengthRecord {
    pub reserved: u16,
    pub user_id: [u8; 16],
    pub record_id: u16,
    pub record_length_after_header: u64,
    pub description: [u8; 32],
    pub data: Vec<u8>,
}

impl ExtendedVariableLengthRecord {
    pub fn read_from(
        cursor: &mut ByteCursor,
    ) -> Result<ExtendedVariableLengthRecord, ReadLasError> {
        let reserved = cursor.read_u16()?;
        let user_id: [u8; 16] = cursor.read_array()?;
        let record_id = cursor.read_u16()?;
        let record_length_after_header = cursor.read_u64()?;
        let description: [u8; 32] = cursor.read_array()?;

        // saturate on 32 bit targets; the read below fails cleanly either way
        let payload_len = usize::try_from(record_length_after_header).unwrap_or(usize::MAX);
        let data = cursor.read_vec(payload_len)?;

        Ok(ExtendedVariableLengthRecord {
            reserved,
            user_id,
            record_id,
            record_length_after_header,
            description,
            data,
        })
    }
}
