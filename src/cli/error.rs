//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::NoDocument => exitcode::NOINPUT,
                    ApplicationError::EmptyDocument
                    | ApplicationError::DocumentTooLarge { .. } => exitcode::DATAERR,
                    ApplicationError::Analysis { .. } => exitcode::UNAVAILABLE,
                    ApplicationError::MalformedResponse { .. } => exitcode::DATAERR,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::Domain(_) => exitcode::DATAERR,
                    ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::traits::ModelError;

    #[test]
    fn given_analysis_failure_when_mapping_exit_code_then_unavailable() {
        let err: CliError = ApplicationError::Analysis {
            source: ModelError::Status {
                status: 429,
                message: "quota".into(),
            },
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
        assert!(err.to_string().contains("(429): quota"));
    }

    #[test]
    fn given_domain_error_when_mapping_exit_code_then_data_error() {
        let err: CliError = ApplicationError::Domain(DomainError::RootDeletion).into();
        assert_eq!(err.exit_code(), exitcode::DATAERR);
        assert_eq!(err.to_string(), "Cannot delete the main message node");
    }

    #[test]
    fn given_usage_error_when_mapping_exit_code_then_usage() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), exitcode::USAGE);
    }
}
