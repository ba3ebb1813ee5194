//! Error handling for the BankShield engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShieldError {
    #[error("Inventory provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    #[error("Package not found in inventory: {package_id}")]
    PackageNotFound { package_id: String },

    #[error("Capability query failed for {package_id}: {message}")]
    CapabilityQueryFailed { package_id: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid transaction record: {message}")]
    InvalidTransaction { message: String },

    #[error("Data serialization error: {message}")]
    SerializationError { message: String },
}

impl ShieldError {
    /// Convert error to a message suitable for the banking user
    pub fn to_user_message(&self) -> String {
        match self {
            ShieldError::ProviderUnavailable { .. } => {
                "Device scan is temporarily unavailable. Please try again.".to_string()
            }
            ShieldError::PackageNotFound { .. } => {
                "The selected application is no longer installed.".to_string()
            }
            ShieldError::CapabilityQueryFailed { .. } => {
                "Some application details could not be read. Results may be incomplete.".to_string()
            }
            ShieldError::InvalidTransaction { .. } => {
                "Transaction details are incomplete. Please check and retry.".to_string()
            }
            _ => "An error occurred. Please try again or contact support.".to_string(),
        }
    }

    /// Check if the operation can simply be retried by the caller
    pub fn is_recoverable(&self) -> bool {
        match self {
            ShieldError::ProviderUnavailable { .. }
            | ShieldError::CapabilityQueryFailed { .. } => true,

            ShieldError::PackageNotFound { .. }
            | ShieldError::ConfigError { .. }
            | ShieldError::InvalidTransaction { .. }
            | ShieldError::SerializationError { .. } => false,
        }
    }

    /// Get severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ShieldError::ConfigError { .. } => ErrorSeverity::Critical,

            ShieldError::ProviderUnavailable { .. }
            | ShieldError::InvalidTransaction { .. } => ErrorSeverity::High,

            ShieldError::CapabilityQueryFailed { .. }
            | ShieldError::SerializationError { .. } => ErrorSeverity::Medium,

            ShieldError::PackageNotFound { .. } => ErrorSeverity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, ShieldError>;
