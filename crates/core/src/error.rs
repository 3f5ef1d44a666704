#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid Bundle: {0}")]
    BundleAssembly(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("FHIR model error: {0}")]
    Fhir(#[from] fhir::FhirError),
    #[error("failed to write bundle for validation: {0}")]
    TempFile(std::io::Error),
    #[error("Error running validator '{program}': {source}")]
    ValidatorLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// True for errors caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ConvertError::InvalidInput(_) | ConvertError::BundleAssembly(_)
        )
    }
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
