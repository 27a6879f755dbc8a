use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimetableError>;

/// Failures that abort a conversion, or a single document within one.
///
/// Malformed rows are not represented here: the aggregator counts and skips
/// them without ever producing an error.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("failed to read source {path}: {source}")]
    SourceRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid source: {0}")]
    SourceFormat(String),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TimetableError {
    /// Stable code used in IPC error responses.
    pub fn code(&self) -> &'static str {
        match self {
            TimetableError::SourceRead { .. } | TimetableError::SourceFormat(_) => "source_failed",
            TimetableError::Template(_) | TimetableError::Render(_) => "render_failed",
            TimetableError::Archive(_) => "package_failed",
            TimetableError::Io(_) => "io_failed",
            TimetableError::Config(_) => "bad_config",
        }
    }
}
