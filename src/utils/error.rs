use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    #[error("Boundary not found for id {id}")]
    NotFound { id: String },

    #[error("Boundary not found for profile {profile}")]
    ProfileNotFound { profile: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl From<quick_xml::Error> for CatalogError {
    fn from(e: quick_xml::Error) -> Self {
        CatalogError::MalformedDocument {
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ClientInput,
    NotFound,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn malformed(message: impl Into<String>) -> Self {
        CatalogError::MalformedDocument {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CatalogError::StorageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::MalformedDocument { .. } => ErrorCategory::ClientInput,
            CatalogError::NotFound { .. } | CatalogError::ProfileNotFound { .. } => {
                ErrorCategory::NotFound
            }
            CatalogError::StorageError { .. }
            | CatalogError::IoError(_)
            | CatalogError::SerializationError(_) => ErrorCategory::Storage,
            CatalogError::ConfigError { .. }
            | CatalogError::MissingConfigError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 查無資料屬於正常結果
            ErrorCategory::NotFound => ErrorSeverity::Low,
            ErrorCategory::ClientInput => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// 給終端使用者看的錯誤訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::MalformedDocument { message } => {
                format!("The uploaded document could not be read: {}", message)
            }
            CatalogError::NotFound { id } => format!("No boundary is stored under '{}'", id),
            CatalogError::ProfileNotFound { profile } => {
                format!("No stored boundary matches profile '{}'", profile)
            }
            CatalogError::StorageError { .. }
            | CatalogError::IoError(_)
            | CatalogError::SerializationError(_) => {
                format!("The catalog storage is unavailable: {}", self)
            }
            _ => format!("Invalid configuration: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::ClientInput => {
                "Check that the file is a CGMES document with an md:FullModel header"
            }
            ErrorCategory::NotFound => "List the catalog to see which boundaries are available",
            ErrorCategory::Storage => "Check that the data directory exists and is writable",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
