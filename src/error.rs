#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not read SVG file: {0}")]
    Io(#[from] std::io::Error),
    #[error("SVG parse error: {0}")]
    SvgParse(String),
    #[error("Unsupported transform: {0}")]
    UnsupportedTransform(String),
    #[error("Unsupported path command \"{0}\"")]
    UnsupportedCommand(String),
    #[error("Malformed path data: {0}")]
    MalformedPathData(String),
    #[error("{element}: {source}")]
    Element {
        element: String,
        #[source]
        source: Box<Error>,
    },
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Attach the element that caused this error.
    pub(crate) fn within(self, element: String) -> Self {
        Error::Element {
            element,
            source: Box::new(self),
        }
    }

    /// The innermost error, with any element context stripped.
    pub fn kind(&self) -> &Error {
        match self {
            Error::Element { source, .. } => source.kind(),
            other => other,
        }
    }
}
