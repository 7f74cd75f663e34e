use thiserror::Error;

/// Failures while reading the sales table. All of them abort report generation.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("columns `{0}` and `{1}` both hold the quantity; keep only one")]
    ConflictingColumns(String, String),

    #[error("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

/// Internal consistency failures raised while composing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("quantity overflow while summing {0}")]
    QuantityOverflow(String),
}
