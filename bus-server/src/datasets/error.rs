//! Dataset loading error types.

/// Errors that can occur when loading a static dataset.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// The resource could not be retrieved
    #[error("failed to load {resource}: {message}")]
    Fetch { resource: String, message: String },

    /// The resource was retrieved but is not a valid dataset
    #[error("invalid data in {resource}: {message}")]
    Parse { resource: String, message: String },
}

impl DatasetError {
    pub(crate) fn fetch(resource: &str, message: impl Into<String>) -> Self {
        DatasetError::Fetch {
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn parse(resource: &str, message: impl Into<String>) -> Self {
        DatasetError::Parse {
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    /// Name of the resource that failed.
    pub fn resource(&self) -> &str {
        match self {
            DatasetError::Fetch { resource, .. } | DatasetError::Parse { resource, .. } => resource,
        }
    }
}
