//! Library for converting [LAS](https://www.asprs.org/divisions-committees/lidar-division/laser-las-file-format-exchange-activities)
//! point clouds into the [PCD](https://pointclouds.org/documentation/tutorials/pcd_file_format.html) format.

mod error;

pub mod color;
pub mod convert;
pub mod pcd;
pub mod reader;

pub use color::{ColorScaling, Rgb16};
pub use convert::{convert, ConversionReport, ConvertOptions, Converter};
pub use error::{Error, Result};
pub use pcd::{CloudBuffer, DataType, OutputPoint};
pub use reader::{LasSource, LasSummary, RawPoint};
