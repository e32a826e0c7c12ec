use std::{borrow::Cow, fmt};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The bit-field of a request number a value is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Direction,
    Type,
    Number,
    Size,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Direction => "direction",
            Field::Type => "type",
            Field::Number => "number",
            Field::Size => "size",
        })
    }
}

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    OutOfRange { field: Field, value: u64 },
    SizeTooLarge { size: usize },
    InvalidData(Cow<'static, str>),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IO(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "io: {}", e),
            Error::OutOfRange { field, value } => {
                write!(f, "value {} out of range for {} field", value, field)
            }
            Error::SizeTooLarge { size } => write!(
                f,
                "payload size {} exceeds {}",
                size,
                crate::codec::IOC_SIZEMASK
            ),
            Error::InvalidData(msg) => write!(f, "invalid data: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(e) => Some(e),
            _ => None,
        }
    }
}

macro_rules! ensure_fits {
    ($field:expr, $val:expr, $mask:expr) => {
        if $val > $mask {
            tracing::debug!(field = %$field, value = $val, "request field out of range");
            return Err($crate::Error::OutOfRange {
                field: $field,
                value: $val as u64,
            });
        }
    };
}

pub(crate) use ensure_fits;
