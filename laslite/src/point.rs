use crate::cursor::ByteCursor;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ReadLasError;
use serde::{Deserialize, Serialize};

/// Highest format code whose record layout this crate decodes. Codes 5-15
/// are recognized by the header but their payloads are not implemented.
pub const MAX_SUPPORTED_POINT_FORMAT: u8 = 4;

/// Field-presence table for a point data record format code.
///
/// Which optional trailing fields a record carries is a pure function of the
/// format code, so the decision is made once per file and the decoder only
/// consults the flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointFormat {
    pub code: u8,
    pub has_gps_time: bool,
    pub has_color: bool,
}

impl PointFormat {
    pub fn new(code: u8) -> Self {
        PointFormat {
            code,
            has_gps_time: matches!(code, 1 | 3 | 4),
            has_color: matches!(code, 2 | 3),
        }
    }

    /// Formats 0-4 decode field by field. Format 4 is treated like format 1;
    /// its waveform packet is not decoded.
    pub fn is_supported(&self) -> bool {
        self.code <= MAX_SUPPORTED_POINT_FORMAT
    }

    /// Number of bytes this crate decodes per record of this format. Files
    /// may declare a larger record length (extra bytes, waveform packets);
    /// the declared length stays authoritative for the record stride.
    pub fn len(&self) -> u16 {
        let mut len = 20;
        if self.has_gps_time {
            len += 8;
        }
        if self.has_color {
            len += 6;
        }
        len
    }
}

/// One decoded LIDAR sample.
///
/// `x`, `y` and `z` are the raw integer coordinates; rescaling to real-world
/// units happens in the coordinate views, not here. `gps_time` and the color
/// channels stay zero for formats that do not carry them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointDataRecord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub intensity: u16,
    pub classification: u8,
    pub scan_angle_rank: i8,
    pub user_data: u8,
    pub point_source_id: u16,
    pub gps_time: f64,
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl PointDataRecord {
    /// Decodes one record at the cursor position.
    ///
    /// For unsupported formats a diagnostic is reported and a zeroed record
    /// returned without consuming any bytes; the caller addresses records by
    /// the header-declared stride, so how much this decoder consumes does
    /// not matter. A short buffer aborts the whole parse.
    pub fn read_from(
        cursor: &mut ByteCursor,
        format: PointFormat,
        sink: &dyn DiagnosticSink,
    ) -> Result<PointDataRecord, ReadLasError> {
        if !format.is_supported() {
            sink.report(Diagnostic::UnsupportedPointFormat {
                format: format.code,
            });
            return Ok(PointDataRecord::default());
        }

        let mut record = PointDataRecord {
            x: cursor.read_i32()?,
            y: cursor.read_i32()?,
            z: cursor.read_i32()?,
            intensity: cursor.read_u16()?,
            ..Default::default()
        };
        cursor.skip(1)?; // return number / scan direction / edge flags, not decoded here
        record.classification = cursor.read_u8()?;
        record.scan_angle_rank = cursor.read_i8()?;
        record.user_data = cursor.read_u8()?;
        record.point_source_id = cursor.read_u16()?;

        if format.has_gps_time {
            record.gps_time = cursor.read_f64()?;
        }
        if format.has_color {
            record.red = cursor.read_u16()?;
            record.green = cursor.read_u16()?;
            record.blue = cursor.read_u16()?;
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::{PointDataRecord, PointFormat};
    use crate::cursor::ByteCursor;
    use crate::diagnostics::{BufferSink, Diagnostic};

    fn record_bytes(format: PointFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1000_i32.to_le_bytes()); // x
        bytes.extend_from_slice(&(-2000_i32).to_le_bytes()); // y
        bytes.extend_from_slice(&3000_i32.to_le_bytes()); // z
        bytes.extend_from_slice(&500_u16.to_le_bytes()); // intensity
        bytes.push(0b0010_1010); // flags
        bytes.push(2); // classification
        bytes.push((-5_i8) as u8); // scan angle rank
        bytes.push(9); // user data
        bytes.extend_from_slice(&77_u16.to_le_bytes()); // point source id
        if format.has_gps_time {
            bytes.extend_from_slice(&123.5_f64.to_le_bytes());
        }
        if format.has_color {
            bytes.extend_from_slice(&65535_u16.to_le_bytes());
            bytes.extend_from_slice(&32767_u16.to_le_bytes());
            bytes.extend_from_slice(&0_u16.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn format_table() {
        for (code, gps, color, len) in [
            (0_u8, false, false, 20_u16),
            (1, true, false, 28),
            (2, false, true, 26),
            (3, true, true, 34),
            (4, true, false, 28),
        ] {
            let format = PointFormat::new(code);
            assert!(format.is_supported());
            assert_eq!(format.has_gps_time, gps);
            assert_eq!(format.has_color, color);
            assert_eq!(format.len(), len);
        }
        for code in 5..=15 {
            assert!(!PointFormat::new(code).is_supported());
        }
    }

    #[test]
    fn decodes_the_common_prefix() {
        let format = PointFormat::new(0);
        let bytes = record_bytes(format);
        assert_eq!(bytes.len(), 20);

        let sink = BufferSink::new();
        let mut cursor = ByteCursor::new(&bytes);
        let record = PointDataRecord::read_from(&mut cursor, format, &sink).unwrap();

        assert_eq!(record.x, 1000);
        assert_eq!(record.y, -2000);
        assert_eq!(record.z, 3000);
        assert_eq!(record.intensity, 500);
        assert_eq!(record.classification, 2);
        assert_eq!(record.scan_angle_rank, -5);
        assert_eq!(record.user_data, 9);
        assert_eq!(record.point_source_id, 77);
        // format 0 has neither trailing group
        assert_eq!(record.gps_time, 0.0);
        assert_eq!((record.red, record.green, record.blue), (0, 0, 0));
        assert_eq!(cursor.position(), 20);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn format_3_has_gps_time_and_color() {
        let format = PointFormat::new(3);
        let bytes = record_bytes(format);
        assert_eq!(bytes.len(), 34);

        let sink = BufferSink::new();
        let mut cursor = ByteCursor::new(&bytes);
        let record = PointDataRecord::read_from(&mut cursor, format, &sink).unwrap();

        assert_eq!(record.gps_time, 123.5);
        assert_eq!(record.red, 65535);
        assert_eq!(record.green, 32767);
        assert_eq!(record.blue, 0);
    }

    #[test]
    fn format_1_has_gps_time_only() {
        let format = PointFormat::new(1);
        let bytes = record_bytes(format);
        let sink = BufferSink::new();
        let mut cursor = ByteCursor::new(&bytes);
        let record = PointDataRecord::read_from(&mut cursor, format, &sink).unwrap();

        assert_eq!(record.gps_time, 123.5);
        assert_eq!((record.red, record.green, record.blue), (0, 0, 0));
    }

    #[test]
    fn unsupported_format_yields_zeroed_record_and_diagnostic() {
        let bytes = [0xff_u8; 64];
        let sink = BufferSink::new();
        let mut cursor = ByteCursor::new(&bytes);
        let record =
            PointDataRecord::read_from(&mut cursor, PointFormat::new(7), &sink).unwrap();

        assert_eq!(record, PointDataRecord::default());
        assert_eq!(cursor.position(), 0);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::UnsupportedPointFormat { format: 7 }]
        );
    }

    #[test]
    fn short_record_fails() {
        let format = PointFormat::new(1);
        let bytes = record_bytes(PointFormat::new(0)); // missing the gps time
        let sink = BufferSink::new();
        let mut cursor = ByteCursor::new(&bytes);
        assert!(PointDataRecord::read_from(&mut cursor, format, &sink).is_err());
    }
}
