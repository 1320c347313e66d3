use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("invalid odt format: {0}")]
    InvalidOdtFormat(String),
    #[error("archive entry not found: {0}")]
    EntryNotFound(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("table has no reference row: {0}")]
    MissingReferenceRow(String),
    #[error("row has {values} values but the reference row yields {styles} styled columns")]
    StyleColumnMismatch { values: usize, styles: usize },
    #[error("xml parse error: {0}")]
    XmlParseError(String),
    #[error("zip error: {0}")]
    ZipError(String),
    #[error("io error: {0}")]
    IoError(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("pdf conversion failed: {0}")]
    ConversionFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    Io,
    Parse,
    Conversion,
    Input,
}

impl AppError {
    pub fn code(&self) -> i32 {
        match self {
            AppError::InvalidPath(_) => 1001,
            AppError::FileNotFound(_) => 1002,
            AppError::InvalidOdtFormat(_) => 1004,
            AppError::EntryNotFound(_) => 1005,
            AppError::TableNotFound(_) => 1006,
            AppError::MissingReferenceRow(_) => 1007,
            AppError::StyleColumnMismatch { .. } => 1008,
            AppError::XmlParseError(_) => 1009,
            AppError::ZipError(_) => 1010,
            AppError::IoError(_) => 1011,
            AppError::InvalidInput(_) => 1012,
            AppError::ConversionFailed(_) => 1013,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidOdtFormat(_)
            | AppError::EntryNotFound(_)
            | AppError::TableNotFound(_)
            | AppError::MissingReferenceRow(_)
            | AppError::StyleColumnMismatch { .. } => ErrorKind::Structural,
            AppError::InvalidPath(_)
            | AppError::FileNotFound(_)
            | AppError::ZipError(_)
            | AppError::IoError(_) => ErrorKind::Io,
            AppError::XmlParseError(_) => ErrorKind::Parse,
            AppError::ConversionFailed(_) => ErrorKind::Conversion,
            AppError::InvalidInput(_) => ErrorKind::Input,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(value.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::ZipError(value.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(value: quick_xml::Error) -> Self {
        Self::XmlParseError(value.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for AppError {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Self::XmlParseError(value.to_string())
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(value: base64::DecodeError) -> Self {
        Self::InvalidInput(format!("invalid base64: {value}"))
    }
}
