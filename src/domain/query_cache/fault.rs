//! Cache faults

use thiserror::Error;

use crate::domain::DomainError;

/// Failure inside the cache that callers may choose to downgrade
#[derive(Debug, Error)]
pub enum CacheFault {
    #[error("Query embedding failed: {0}")]
    Embedding(#[source] DomainError),

    #[error("Cache index failed: {0}")]
    Index(#[source] DomainError),
}

impl CacheFault {
    pub fn embedding(error: DomainError) -> Self {
        Self::Embedding(error)
    }

    pub fn index(error: DomainError) -> Self {
        Self::Index(error)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Embedding(_) => "embedding",
            Self::Index(_) => "index",
        }
    }
}

impl From<CacheFault> for DomainError {
    fn from(fault: CacheFault) -> Self {
        DomainError::cache(fault.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_display_and_kind() {
        let fault = CacheFault::embedding(DomainError::provider("openai", "timeout"));

        assert_eq!(fault.kind(), "embedding");
        assert!(fault.to_string().contains("timeout"));

        let fault = CacheFault::index(DomainError::storage("disk full"));
        assert_eq!(fault.kind(), "index");
        assert!(fault.to_string().starts_with("Cache index failed"));
    }

    #[test]
    fn test_fault_into_domain_error() {
        let error: DomainError = CacheFault::index(DomainError::storage("gone")).into();

        assert!(matches!(error, DomainError::Cache { .. }));
    }
}
