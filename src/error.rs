use thiserror::Error;

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Terminal failure of a single conversion call.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Malformed input handed to one of the parsers
    #[error("failed to parse {format}: {message}")]
    ParseFailure {
        format: &'static str,
        message: String,
    },

    /// Nothing to convert
    #[error("no {0} found in input")]
    EmptyInput(&'static str),

    /// A value shape the conversion has no rule for. Reserved: no current
    /// conversion raises it, unknown Markdown token kinds are dropped instead.
    #[error("unsupported input shape: {0}")]
    UnsupportedShape(String),

    /// Packaging or unpacking a .docx archive failed
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        ConvertError::ParseFailure {
            format,
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::parse("XML", err)
    }
}

impl From<csv::Error> for ConvertError {
    fn from(err: csv::Error) -> Self {
        ConvertError::parse("CSV", err)
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::parse("JSON", err)
    }
}
