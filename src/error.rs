use thiserror::Error;

use crate::client::ServiceError;
use crate::image::ImageError;
use crate::parser::ParseError;

/// Any failure along the scan path.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ScanError>;
