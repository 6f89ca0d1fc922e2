use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of everything that can go wrong around an engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid command, data directory or separator.
    Config,
    /// Malformed extra arguments or language tokens.
    Build,
    /// Spawn failure or non-zero engine exit.
    Process,
    /// File copy/read/write/delete failure.
    Io,
    /// Image source or output format the calling layer cannot handle.
    Unsupported,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),
    #[error("invalid data directory: '{}'", .0.display())]
    InvalidDataDir(PathBuf),
    #[error("invalid content separator: {0:?}")]
    InvalidSeparator(String),
    #[error("unable to parse the extra arguments {args:?}: {reason}")]
    ExtraArgs { args: String, reason: String },
    #[error("unknown output format: {0:?}")]
    UnknownFormat(String),
    #[error("the language '{0}' doesn't exist or is not supported yet")]
    UnsupportedLanguage(String),
    #[error("unable to parse the command line: {0}")]
    CommandLine(String),
    #[error("could not open the process '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("engine exited with status {status:?}: {message}")]
    Engine { status: Option<i32>, message: String },
    #[error("{action} '{}' failed (os error {}): {source}", .path.display(), .source.raw_os_error().unwrap_or(0))]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read '{}' as UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("{library}: could not save the image to '{}': {reason}", .path.display())]
    ImageSave {
        library: &'static str,
        path: PathBuf,
        reason: String,
    },
    #[error("malformed hOCR markup: {0}")]
    Markup(String),
    #[error("hOCR conversion is unavailable (built without the `hocr` feature)")]
    MarkupUnavailable,
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("{format} format is not supported by {operation}, use image_to_file instead")]
    UnsupportedFormat {
        format: &'static str,
        operation: &'static str,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCommand(_) | Error::InvalidDataDir(_) | Error::InvalidSeparator(_) => {
                ErrorKind::Config
            }
            Error::ExtraArgs { .. } | Error::UnknownFormat(_) | Error::UnsupportedLanguage(_) => {
                ErrorKind::Build
            }
            Error::CommandLine(_) | Error::Spawn { .. } | Error::Engine { .. } => {
                ErrorKind::Process
            }
            Error::Io { .. } | Error::Decode { .. } | Error::Markup(_) => ErrorKind::Io,
            Error::ImageSave { .. }
            | Error::UnsupportedImage(_)
            | Error::MarkupUnavailable
            | Error::UnsupportedFormat { .. } => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A non-fatal condition reported once through `tracing` and the session observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: ErrorKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&Error> for Warning {
    fn from(err: &Error) -> Self {
        Warning::new(err.kind(), err.to_string())
    }
}

pub type WarningObserver = Box<dyn Fn(&Warning) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Error::InvalidSeparator(String::new()).kind(), ErrorKind::Config);
        assert_eq!(Error::UnsupportedLanguage("xyz".into()).kind(), ErrorKind::Build);
        assert_eq!(
            Error::Engine {
                status: Some(1),
                message: "boom".into()
            }
            .kind(),
            ErrorKind::Process
        );
        assert_eq!(
            Error::UnsupportedFormat {
                format: "pdf",
                operation: "image_to_data"
            }
            .kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn io_message_carries_os_code() {
        let err = Error::io(
            "read",
            "/nope",
            std::io::Error::from_raw_os_error(2),
        );
        let msg = err.to_string();
        assert!(msg.contains("os error 2"));
        assert!(msg.contains("/nope"));
    }
}
