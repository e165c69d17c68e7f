//! Error types of the resource cache.
//!
//! Manager-level failures (`add`, `request`, ...) are returned synchronously as
//! `Error`. Load failures never escape a background task; they are recorded on
//! the `Resource` as an `ErrorCode` and logged.

use failure::Fail;

/// The compact error taxonomy stored on resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError,
    LoadingError,
    UnknownResource,
    CannotOpenFile,
    MemoryAllocationFailed,
    BackendError,
    BadFormat,
    Capacity,
    DuplicatePath,
    NotFound,
    PathTooLong,
}

impl Default for ErrorCode {
    fn default() -> Self {
        ErrorCode::NoError
    }
}

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Malformed content: {}", _0)]
    Loading(String),
    #[fail(display = "Resource {} has not been registered.", _0)]
    UnknownResource(String),
    #[fail(display = "Could not open {}: {}", _0, _1)]
    CannotOpenFile(String, #[cause] ::std::io::Error),
    #[fail(display = "Failed to allocate {} bytes.", _0)]
    MemoryAllocationFailed(usize),
    #[fail(display = "Backend failure: {}", _0)]
    Backend(failure::Error),
    #[fail(display = "Bad format: {}", _0)]
    BadFormat(String),
    #[fail(display = "Out of resource slots (capacity {}).", _0)]
    Capacity(usize),
    #[fail(display = "Resource {} has been registered already.", _0)]
    DuplicatePath(String),
    #[fail(display = "Resource {} is neither a builtin nor an existing file.", _0)]
    NotFound(String),
    #[fail(display = "Path of {} bytes exceeds the limit of {} bytes.", _0, _1)]
    PathTooLong(usize, usize),
    #[fail(display = "{}", _0)]
    IO(#[cause] ::std::io::Error),
    #[fail(display = "{}", _0)]
    Bincode(#[cause] ::bincode::Error),
    #[fail(display = "{}", _0)]
    Json(#[cause] ::serde_json::Error),
}

impl Error {
    /// Maps this error into the code recorded on a failed resource.
    pub fn code(&self) -> ErrorCode {
        match *self {
            Error::Loading(_) | Error::Bincode(_) | Error::Json(_) => ErrorCode::LoadingError,
            Error::UnknownResource(_) => ErrorCode::UnknownResource,
            Error::CannotOpenFile(_, _) | Error::IO(_) => ErrorCode::CannotOpenFile,
            Error::MemoryAllocationFailed(_) => ErrorCode::MemoryAllocationFailed,
            Error::Backend(_) => ErrorCode::BackendError,
            Error::BadFormat(_) => ErrorCode::BadFormat,
            Error::Capacity(_) => ErrorCode::Capacity,
            Error::DuplicatePath(_) => ErrorCode::DuplicatePath,
            Error::NotFound(_) => ErrorCode::NotFound,
            Error::PathTooLong(_, _) => ErrorCode::PathTooLong,
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<::bincode::Error> for Error {
    fn from(err: ::bincode::Error) -> Self {
        Error::Bincode(err)
    }
}

impl From<::serde_json::Error> for Error {
    fn from(err: ::serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<failure::Error> for Error {
    fn from(err: failure::Error) -> Self {
        Error::Backend(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(ErrorCode::default(), ErrorCode::NoError);
        assert_eq!(Error::Capacity(4).code(), ErrorCode::Capacity);
        assert_eq!(
            Error::BadFormat("magic".into()).code(),
            ErrorCode::BadFormat
        );

        let io = ::std::io::Error::new(::std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            Error::CannotOpenFile("a.bin".into(), io).code(),
            ErrorCode::CannotOpenFile
        );

        let err: Error = format_err!("device lost").into();
        assert_eq!(err.code(), ErrorCode::BackendError);
    }
}
