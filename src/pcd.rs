//! PCD v0.7 writer for `x y z rgb` clouds.

use crate::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// A PCL `PointXYZRGB` point. `rgb` is packed as `0x00RRGGBB`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OutputPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rgb: u32,
}

/// Unorganized cloud of [OutputPoint]s.
#[derive(Clone, Debug, Default)]
pub struct CloudBuffer {
    points: Vec<OutputPoint>,
}

impl CloudBuffer {
    /// Allocates `n` zeroed points.
    ///
    /// Fails with [Error::TooManyPoints] instead of aborting when the memory
    /// cannot be reserved.
    pub fn allocate(n: u64) -> Result<Self> {
        let len = usize::try_from(n).map_err(|_| Error::TooManyPoints(n))?;
        let mut points = Vec::new();
        points
            .try_reserve_exact(len)
            .map_err(|_| Error::TooManyPoints(n))?;
        points.resize(len, OutputPoint::default());
        Ok(CloudBuffer { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn width(&self) -> usize {
        self.points.len()
    }

    /// Always 1, the cloud has no grid structure.
    pub fn height(&self) -> usize {
        1
    }

    /// Always false, points may hold non-finite values.
    pub fn is_dense(&self) -> bool {
        false
    }

    pub fn points(&self) -> &[OutputPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [OutputPoint] {
        &mut self.points
    }
}

/// Reinterprets a packed color as the float PCL stores in its `rgb` field.
///
/// A packed color has a zero top byte, so the result is zero or subnormal, never NaN.
/// Only the binary body stores this float. The ascii body prints the packed
/// integer, as PCL's ascii writer does for `rgb`.
pub fn rgb_as_f32(rgb: u32) -> f32 {
    f32::from_bits(rgb)
}

/// Encoding of the point data section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataType {
    #[default]
    Ascii,
    Binary,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Ascii => f.write_str("ascii"),
            DataType::Binary => f.write_str("binary"),
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ascii" => Ok(DataType::Ascii),
            "binary" => Ok(DataType::Binary),
            _ => Err(Error::InvalidOption {
                name: "pcd data type",
                value: s.to_string(),
            }),
        }
    }
}

/// PCD file header
#[derive(Clone, Debug, PartialEq)]
pub struct PcdHeader {
    pub width: usize,
    pub height: usize,
    pub points: usize,
    pub data_type: DataType,
}

impl PcdHeader {
    pub fn for_cloud(cloud: &CloudBuffer, data_type: DataType) -> Self {
        PcdHeader {
            width: cloud.width(),
            height: cloud.height(),
            points: cloud.len(),
            data_type,
        }
    }
}

impl fmt::Display for PcdHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "# .PCD v0.7 - Point Cloud Data file format\n\
            VERSION 0.7\n\
            FIELDS x y z rgb\n\
            SIZE 4 4 4 4\n\
            TYPE F F F F\n\
            COUNT 1 1 1 1\n\
            WIDTH {}\n\
            HEIGHT {}\n\
            VIEWPOINT 0 0 0 1 0 0 0\n\
            POINTS {}\n\
            DATA {}\n",
            self.width, self.height, self.points, self.data_type
        )
    }
}

/// Writes the cloud into a file, replacing any existing file.
pub fn write_pcd_file<P: AsRef<Path>>(
    cloud: &CloudBuffer,
    data_type: DataType,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_pcd(cloud, data_type, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes the cloud into the provided writer
pub fn write_pcd<W: Write>(
    cloud: &CloudBuffer,
    data_type: DataType,
    writer: &mut W,
) -> Result<()> {
    let header = PcdHeader::for_cloud(cloud, data_type);
    writer.write_all(header.to_string().as_bytes())?;
    match data_type {
        DataType::Ascii => write_ascii(cloud, writer),
        DataType::Binary => write_binary(cloud, writer),
    }
}

// PCL prints `rgb` as the packed unsigned integer even though the field is TYPE F
fn write_ascii<W: Write>(cloud: &CloudBuffer, writer: &mut W) -> Result<()> {
    for p in cloud.points() {
        writeln!(writer, "{} {} {} {}", p.x, p.y, p.z, p.rgb)?;
    }
    Ok(())
}

fn write_binary<W: Write>(cloud: &CloudBuffer, writer: &mut W) -> Result<()> {
    for p in cloud.points() {
        writer.write_f32::<LittleEndian>(p.x)?;
        writer.write_f32::<LittleEndian>(p.y)?;
        writer.write_f32::<LittleEndian>(p.z)?;
        writer.write_f32::<LittleEndian>(rgb_as_f32(p.rgb))?;
    }
    Ok(())
}
