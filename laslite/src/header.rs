use crate::cursor::ByteCursor;
use crate::error::ReadLasError;
use crate::point::PointFormat;
use nalgebra::Vector3;
use std::string::FromUtf8Error;

pub const LAS_FILE_SIGNATURE: [u8; 4] = *b"LASF";

/// Formats 0-10 are defined by the LAS 1.4 specification. Everything above
/// is rejected outright; 5-10 pass this check but decode to placeholder
/// records (see [PointFormat::is_supported]).
pub const MAX_POINT_DATA_RECORD_FORMAT: u8 = 10;

/// The public header block at the start of every LAS file.
///
/// The `has_*` flags describe which of the version-gated tail fields were
/// actually present in the file. They are derived from `version_minor` once,
/// while the header is decoded; all later stages query the flags instead of
/// comparing versions again. Gated fields that are absent keep their zero
/// default.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicHeader {
    pub file_signature: [u8; 4],
    pub file_source_id: u16,
    pub global_encoding: u16,
    pub project_id_1: u32,
    pub project_id_2: u16,
    pub project_id_3: u16,
    pub project_id_4: [u8; 8],
    pub version_major: u8,
    pub version_minor: u8,
    pub system_identifier: [u8; 32],
    pub generating_software: [u8; 32],
    pub file_creation_day_of_year: u16,
    pub file_creation_year: u16,
    pub header_size: u16,
    pub offset_to_point_data: u32,
    pub number_of_variable_length_records: u32,
    pub point_data_record_format: u8,
    pub point_data_record_length: u16,
    pub legacy_number_of_point_records: u32,
    pub legacy_number_of_points_by_return: [u32; 5],
    pub scale: Vector3<f64>,
    pub offset: Vector3<f64>,
    pub max: Vector3<f64>,
    pub min: Vector3<f64>,

    // las >= 1.3
    pub start_of_waveform_data_packet_record: u64,

    // las >= 1.4
    pub start_of_first_evlr: u64,
    pub number_of_evlrs: u32,
    pub number_of_point_records: u64,
    pub number_of_points_by_return: [u64; 15],

    pub has_waveform_data_packet_start: bool,
    pub has_first_evlr: bool,
    pub has_evlr_count: bool,
    pub has_64bit_point_count: bool,
    pub has_points_by_return_64: bool,
}

impl Default for PublicHeader {
    fn default() -> Self {
        PublicHeader {
            file_signature: LAS_FILE_SIGNATURE,
            file_source_id: 0,
            global_encoding: 0,
            project_id_1: 0,
            project_id_2: 0,
            project_id_3: 0,
            project_id_4: [0; 8],
            version_major: 0,
            version_minor: 0,
            system_identifier: [0; 32],
            generating_software: [0; 32],
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            header_size: 0,
            offset_to_point_data: 0,
            number_of_variable_length_records: 0,
            point_data_record_format: 0,
            point_data_record_length: 0,
            legacy_number_of_point_records: 0,
            legacy_number_of_points_by_return: [0; 5],
            scale: Vector3::zeros(),
            offset: Vector3::zeros(),
            max: Vector3::zeros(),
            min: Vector3::zeros(),
            start_of_waveform_data_packet_record: 0,
            start_of_first_evlr: 0,
            number_of_evlrs: 0,
            number_of_point_records: 0,
            number_of_points_by_return: [0; 15],
            has_waveform_data_packet_start: false,
            has_first_evlr: false,
            has_evlr_count: false,
            has_64bit_point_count: false,
            has_points_by_return_64: false,
        }
    }
}

impl PublicHeader {
    /// Decodes the header from the start of the file buffer.
    ///
    /// The signature is validated as soon as it is read; a file that does not
    /// start with `LASF` causes no further reads. A point data record format
    /// above [MAX_POINT_DATA_RECORD_FORMAT] is rejected the same way. A
    /// buffer shorter than the header it declares is malformed as well.
    pub fn read_from(cursor: &mut ByteCursor) -> Result<PublicHeader, ReadLasError> {
        Self::decode(cursor).map_err(|e| match e {
            ReadLasError::OutOfBounds { offset, .. } => ReadLasError::MalformedHeader {
                desc: format!("file ends inside the public header (at offset {offset})"),
            },
            other => other,
        })
    }

    fn decode(cursor: &mut ByteCursor) -> Result<PublicHeader, ReadLasError> {
        let file_signature: [u8; 4] = cursor.read_array()?;
        if file_signature != LAS_FILE_SIGNATURE {
            return Err(ReadLasError::MalformedHeader {
                desc: format!("invalid file signature {file_signature:?}"),
            });
        }
        let file_source_id = cursor.read_u16()?;
        let global_encoding = cursor.read_u16()?;
        let project_id_1 = cursor.read_u32()?;
        let project_id_2 = cursor.read_u16()?;
        let project_id_3 = cursor.read_u16()?;
        let project_id_4: [u8; 8] = cursor.read_array()?;
        let version_major = cursor.read_u8()?;
        let version_minor = cursor.read_u8()?;

        // Which tail fields exist is a pure function of the minor version.
        // Decided here, queried everywhere else.
        let has_waveform_data_packet_start = version_minor >= 3;
        let has_first_evlr = version_minor >= 4;
        let has_evlr_count = version_minor >= 4;
        let has_64bit_point_count = version_minor >= 4;
        let has_points_by_return_64 = version_minor >= 4;

        let system_identifier: [u8; 32] = cursor.read_array()?;
        let generating_software: [u8; 32] = cursor.read_array()?;
        let file_creation_day_of_year = cursor.read_u16()?;
        let file_creation_year = cursor.read_u16()?;
        let header_size = cursor.read_u16()?;
        let offset_to_point_data = cursor.read_u32()?;
        let number_of_variable_length_records = cursor.read_u32()?;

        let point_data_record_format = cursor.read_u8()?;
        if point_data_record_format > MAX_POINT_DATA_RECORD_FORMAT {
            return Err(ReadLasError::MalformedHeader {
                desc: format!("invalid point data record format: {point_data_record_format}"),
            });
        }
        let point_data_record_length = cursor.read_u16()?;

        let legacy_number_of_point_records = cursor.read_u32()?;
        let mut legacy_number_of_points_by_return = [0_u32; 5];
        for entry in &mut legacy_number_of_points_by_return {
            *entry = cursor.read_u32()?;
        }

        let mut scale = Vector3::zeros();
        let mut offset = Vector3::zeros();
        scale.x = cursor.read_f64()?;
        scale.y = cursor.read_f64()?;
        scale.z = cursor.read_f64()?;
        offset.x = cursor.read_f64()?;
        offset.y = cursor.read_f64()?;
        offset.z = cursor.read_f64()?;

        // the file interleaves the bounds per axis: max x, min x, max y, ...
        let mut max = Vector3::zeros();
        let mut min = Vector3::zeros();
        max.x = cursor.read_f64()?;
        min.x = cursor.read_f64()?;
        max.y = cursor.read_f64()?;
        min.y = cursor.read_f64()?;
        max.z = cursor.read_f64()?;
        min.z = cursor.read_f64()?;

        // Version-gated tail, in fixed file order. The cursor must not
        // advance over fields the file does not have.
        let start_of_waveform_data_packet_record = if has_waveform_data_packet_start {
            cursor.read_u64()?
        } else {
            0
        };
        let start_of_first_evlr = if has_first_evlr { cursor.read_u64()? } else { 0 };
        let number_of_evlrs = if has_evlr_count { cursor.read_u32()? } else { 0 };
        let number_of_point_records = if has_64bit_point_count {
            cursor.read_u64()?
        } else {
            0
        };
        let mut number_of_points_by_return = [0_u64; 15];
        if has_points_by_return_64 {
            for entry in &mut number_of_points_by_return {
                *entry = cursor.read_u64()?;
            }
        }

        Ok(PublicHeader {
            file_signature,
            file_source_id,
            global_encoding,
            project_id_1,
            project_id_2,
            project_id_3,
            project_id_4,
            version_major,
            version_minor,
            system_identifier,
            generating_software,
            file_creation_day_of_year,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_record_format,
            point_data_record_length,
            legacy_number_of_point_records,
            legacy_number_of_points_by_return,
            scale,
            offset,
            max,
            min,
            start_of_waveform_data_packet_record,
            start_of_first_evlr,
            number_of_evlrs,
            number_of_point_records,
            number_of_points_by_return,
            has_waveform_data_packet_start,
            has_first_evlr,
            has_evlr_count,
            has_64bit_point_count,
            has_points_by_return_64,
        })
    }

    pub fn point_format(&self) -> PointFormat {
        PointFormat::new(self.point_data_record_format)
    }

    /// Number of point records to decode. Legacy formats keep their count in
    /// the 32 bit field even in 1.4 files; only formats above 5 use the
    /// 64 bit count.
    pub fn point_count(&self) -> u64 {
        if self.point_data_record_format <= 5 {
            u64::from(self.legacy_number_of_point_records)
        } else {
            self.number_of_point_records
        }
    }
}

/// Decodes one of the NUL-padded fixed-width strings of the LAS format.
pub fn las_string(las_str: &[u8]) -> Result<String, FromUtf8Error> {
    let bytes = las_str
        .iter()
        .take_while(|byte| **byte != 0)
        .cloned()
        .collect();
    String::from_utf8(bytes)
}
