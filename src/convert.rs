//! LAS to PCD conversion.

use crate::color::ColorScaling;
use crate::pcd::{write_pcd_file, CloudBuffer, DataType, OutputPoint};
use crate::reader::{LasSource, RawPoint};
use crate::Result;
use log::{debug, warn};
use std::env;
use std::io::{Read, Seek};
use std::path::Path;

/// Environment variable selecting the [ColorScaling]
pub const COLOR_SCALING_VAR: &str = "LAS2PCD_COLOR_SCALING";
/// Environment variable selecting the PCD [DataType]
pub const DATA_TYPE_VAR: &str = "LAS2PCD_DATA";

/// Conversion settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub color_scaling: ColorScaling,
    pub data_type: DataType,
}

impl ConvertOptions {
    /// Reads the options from [COLOR_SCALING_VAR] and [DATA_TYPE_VAR].
    /// Unset variables keep the default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let mut options = ConvertOptions::default();
        if let Some(value) = lookup(COLOR_SCALING_VAR) {
            options.color_scaling = value.parse()?;
        }
        if let Some(value) = lookup(DATA_TYPE_VAR) {
            options.data_type = value.parse()?;
        }
        Ok(options)
    }
}

/// Point counts of a finished conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConversionReport {
    /// Number of points according to the LAS header
    pub declared: u64,
    /// Number of point records actually read
    pub read: u64,
    /// Number of points in the PCD file
    pub written: u64,
}

/// LAS to PCD converter
#[derive(Clone, Debug, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Converter { options }
    }

    pub fn output_point(&self, point: &RawPoint) -> OutputPoint {
        OutputPoint {
            x: point.x as f32,
            y: point.y as f32,
            z: point.z as f32,
            rgb: self.options.color_scaling.requantize_rgb(point.color),
        }
    }

    /// Reads all declared points of `source` into a new cloud.
    ///
    /// The cloud always holds the declared number of points. Slots the source
    /// could not fill stay zero, records beyond the declared count are not read.
    pub fn read_cloud<R: Read + Seek>(&self, source: &mut LasSource<R>) -> Result<CloudBuffer> {
        let declared = source.summary().declared_point_count;
        let mut cloud = CloudBuffer::allocate(declared)?;
        debug!("allocated {} points", cloud.len());

        for slot in cloud.points_mut() {
            match source.next_point()? {
                Some(point) => *slot = self.output_point(&point),
                None => break,
            }
        }

        if source.points_read() < declared {
            warn!(
                "only {} of {} declared points read, the remaining points are zero",
                source.points_read(),
                declared
            );
        }
        Ok(cloud)
    }

    /// Converts the LAS file at `input` into a PCD file at `output`.
    ///
    /// Nothing is written if reading fails.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<ConversionReport> {
        let mut source = LasSource::from_path(input.as_ref())?;
        debug!(
            "read header of {}: {} points declared",
            input.as_ref().display(),
            source.summary().declared_point_count
        );

        let cloud = self.read_cloud(&mut source)?;

        write_pcd_file(&cloud, self.options.data_type, output.as_ref())?;
        debug!("wrote {}", output.as_ref().display());

        Ok(ConversionReport {
            declared: source.summary().declared_point_count,
            read: source.points_read(),
            written: cloud.len() as u64,
        })
    }
}

/// Converts with the given options, see [Converter::convert].
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: ConvertOptions,
) -> Result<ConversionReport> {
    Converter::new(options).convert(input, output)
}
