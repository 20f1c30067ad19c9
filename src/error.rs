use std::path::PathBuf;
use thiserror::Error;

/// crate specific Result type
pub type Result<T> = std::result::Result<T, Error>;

/// crate specific Error enum
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be opened for reading
    #[error("Impossible to open the file : {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created
    #[error("Impossible to create the file : {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// [las::Error]
    #[error(transparent)]
    LasError(#[from] las::Error),

    /// Only las versions 1.0 to 1.4 can be read
    #[error("Unsupported las version: {:?}", .0)]
    UnsupportedVersion(las::Version),

    /// LAZ point data is not decompressed
    #[error("Compressed point data (point format {}) is not supported", .0)]
    CompressedPointData(u8),

    /// The point data record length in the header is smaller than the point format
    #[error("Point data record length {length} is too short for point format {format} ({required} bytes)")]
    PointRecordTooShort { format: u8, length: u16, required: u16 },

    /// The declared point count does not fit in memory on this platform
    #[error("Too many points to allocate: {}", .0)]
    TooManyPoints(u64),

    /// An option value could not be parsed
    #[error("Invalid value {value:?} for {name}")]
    InvalidOption { name: &'static str, value: String },

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
