//! Secret redaction port.

/// Removes credentials from tool output before anything else sees it.
pub trait SecretRedactor: Send + Sync {
    fn redact(&self, text: &str) -> String;
}
