use miette::Diagnostic;
use thiserror::Error;

/// Main error type for xstitch operations
#[derive(Error, Diagnostic, Debug)]
pub enum XsError {
    #[error("IO error: {0}")]
    #[diagnostic(code(xstitch::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(xstitch::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(xstitch::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Palette format error on line {line}: {message}")]
    #[diagnostic(code(xstitch::palette::format))]
    Format {
        line: usize,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Not found: {message}")]
    #[diagnostic(code(xstitch::not_found))]
    NotFound { message: String },

    #[error("Invalid parameter: {message}")]
    #[diagnostic(code(xstitch::invalid_parameter))]
    InvalidParameter {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(xstitch::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Font error: {message}")]
    #[diagnostic(code(xstitch::font))]
    Font { message: String },
}

impl XsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        XsError::InvalidParameter {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, XsError>;
