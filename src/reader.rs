//! LAS point reader.

use crate::color::Rgb16;
use crate::{Error, Result};
use las::point::Format;
use las::raw;
use las::{Transform, Vector};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

const IS_COMPRESSED_MASK: u8 = 0x80;

/// A point as read from the LAS file, with scale and offset applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// `None` if the point format has no color
    pub color: Option<Rgb16>,
}

/// The parts of the LAS header needed to read the point records.
#[derive(Clone, Copy, Debug)]
pub struct LasSummary {
    pub version: las::Version,
    /// Point data record format id
    pub point_format: u8,
    /// Size of a point record in bytes, extra bytes included
    pub point_record_length: u16,
    /// Number of point records according to the header.
    /// The file may hold fewer.
    pub declared_point_count: u64,
    pub transforms: Vector<Transform>,
}

impl LasSummary {
    fn from_raw(header: &raw::Header) -> Self {
        let declared_point_count = match &header.large_file {
            Some(large_file) if large_file.number_of_point_records > 0 => {
                large_file.number_of_point_records
            }
            _ => u64::from(header.number_of_point_records),
        };
        let transforms = Vector {
            x: Transform {
                scale: header.x_scale_factor,
                offset: header.x_offset,
            },
            y: Transform {
                scale: header.y_scale_factor,
                offset: header.y_offset,
            },
            z: Transform {
                scale: header.z_scale_factor,
                offset: header.z_offset,
            },
        };
        LasSummary {
            version: header.version,
            point_format: header.point_data_record_format,
            point_record_length: header.point_data_record_length,
            declared_point_count,
            transforms,
        }
    }
}

/// Forward-only reader over the point records of an uncompressed LAS file.
pub struct LasSource<R> {
    src: R,
    summary: LasSummary,
    format: Format,
    record: Vec<u8>,
    num_points_left: u64,
    num_points_read: u64,
}

impl LasSource<BufReader<File>> {
    /// Opens a LAS file and reads its header.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        LasSource::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> LasSource<R> {
    /// Reads the LAS header and positions `src` at the first point record.
    pub fn new(mut src: R) -> Result<Self> {
        let header = raw::Header::read_from(&mut src)?;
        let summary = LasSummary::from_raw(&header);
        debug!("{:?}", summary);

        if summary.version.major != 1 || summary.version.minor > 4 {
            return Err(Error::UnsupportedVersion(summary.version));
        }
        if summary.point_format & IS_COMPRESSED_MASK == IS_COMPRESSED_MASK {
            return Err(Error::CompressedPointData(summary.point_format));
        }
        let format = Format::new(summary.point_format)?;
        if summary.point_record_length < format.len() {
            return Err(Error::PointRecordTooShort {
                format: summary.point_format,
                length: summary.point_record_length,
                required: format.len(),
            });
        }

        src.seek(SeekFrom::Start(u64::from(header.offset_to_point_data)))?;

        Ok(LasSource {
            src,
            summary,
            format,
            record: vec![0u8; summary.point_record_length as usize],
            num_points_left: summary.declared_point_count,
            num_points_read: 0,
        })
    }

    pub fn summary(&self) -> &LasSummary {
        &self.summary
    }

    /// Number of records read so far.
    pub fn points_read(&self) -> u64 {
        self.num_points_read
    }

    /// Reads the next point record.
    ///
    /// Returns `Ok(None)` after the declared number of points, or when the
    /// stream ends before a complete record.
    pub fn next_point(&mut self) -> Result<Option<RawPoint>> {
        if self.num_points_left == 0 {
            return Ok(None);
        }
        match self.src.read_exact(&mut self.record) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                warn!(
                    "point data ends after {} of {} declared points",
                    self.num_points_read, self.summary.declared_point_count
                );
                self.num_points_left = 0;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let raw_point = raw::Point::read_from(self.record.as_slice(), &self.format)?;
        let point = las::Point::new(raw_point, &self.summary.transforms);

        self.num_points_left -= 1;
        self.num_points_read += 1;
        Ok(Some(RawPoint {
            x: point.x,
            y: point.y,
            z: point.z,
            color: point.color.map(Rgb16::from),
        }))
    }
}

impl<R: Read + Seek> Iterator for LasSource<R> {
    type Item = Result<RawPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_point();
        if next.is_err() {
            self.num_points_left = 0;
        }
        next.transpose()
    }
}
