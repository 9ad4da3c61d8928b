//! Credential/config collaborator consumed by the sync coordinator.

/// Supplies the remote location and whether sync is configured at all.
///
/// Absence of a credential is a supported local-only mode, not a fault.
pub trait CredentialProvider: Send + Sync {
    /// Whether a remote credential is configured.
    fn has_remote_credential(&self) -> bool;

    /// Fully-qualified remote endpoint, including any embedded credential.
    /// `None` when no remote is configured.
    fn remote_endpoint(&self) -> Option<String>;

    /// Strip credential material from text before it is logged or recorded.
    fn redact(&self, text: &str) -> String;
}
