use colored::Colorize;
use passit_db_storage_aws::AwsStoreError;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the access-pattern layer.
    Api(passit_db_api::ApiError),
    /// Index migration failure.
    Indexer(passit_db_indexer::IndexerError),
    /// Store setup failure (region, endpoint).
    Store(AwsStoreError),
    /// Configuration issues.
    Config(String),
    /// Bad file path, unreadable input, parse failure.
    Input(String),
    /// Argument / usage errors.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = "error:".red().bold();
        match self {
            CliError::Api(e) => write!(f, "{label} {e} (status {})", e.status_code()),
            CliError::Indexer(e) => write!(f, "{label} {e}"),
            CliError::Store(e @ AwsStoreError::MissingRegion) => write!(
                f,
                "{label} {e}\n  {} pass --region or set PASSIT_REGION / AWS_REGION",
                "help:".cyan().bold(),
            ),
            CliError::Store(e) => write!(f, "{label} {e}"),
            CliError::Config(msg) | CliError::Input(msg) | CliError::Usage(msg) => {
                write!(f, "{label} {msg}")
            }
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<passit_db_api::ApiError> for CliError {
    fn from(e: passit_db_api::ApiError) -> Self {
        match e {
            passit_db_api::ApiError::Config(msg) => CliError::Config(msg),
            e if e.status_code() == 400 => CliError::Usage(e.to_string()),
            e => CliError::Api(e),
        }
    }
}

impl From<passit_db_query::QueryError> for CliError {
    fn from(e: passit_db_query::QueryError) -> Self {
        CliError::from(passit_db_api::ApiError::from(e))
    }
}

impl From<passit_db_indexer::IndexerError> for CliError {
    fn from(e: passit_db_indexer::IndexerError) -> Self {
        CliError::Indexer(e)
    }
}

impl From<AwsStoreError> for CliError {
    fn from(e: AwsStoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Input(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Input(format!("JSON parse error: {e}"))
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        }
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    process::exit(err.exit_code())
}

pub type CliResult<T> = std::result::Result<T, CliError>;
