//! Errors raised while constructing an [`OpenAddressTable`](crate::OpenAddressTable)

/// Represents errors that can occur when building a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The requested capacity was zero
    InvalidCapacity(usize),

    /// The requested load factor was not a number
    InvalidLoadFactor(f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCapacity(capacity) => {
                write!(f, "capacity must be a positive number of slots, got {capacity}")
            }
            Self::InvalidLoadFactor(load_factor) => {
                write!(f, "load factor must be a number, got {load_factor}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Table result
pub type Result<T> = std::result::Result<T, Error>;
