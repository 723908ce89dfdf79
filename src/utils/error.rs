/// Utility enum that covers all possible errors during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any error originating from the `kube-rs` crate
    #[error("Kubernetes reported error: {source}")]
    KubeError {
        #[from]
        source: kube::Error,
    },

    /// Error in user input or Heat resource definition, typically missing fields.
    #[error("Invalid Heat resource: {0}")]
    UserInputError(String),

    /// A certificate service reference for a TLS endpoint could not be resolved.
    #[error("TLS error for {endpoint} endpoint: {reason}")]
    TlsError { endpoint: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
