//! Desktop alert port.

/// Operating-system level alert.
///
/// Implementations must return immediately and swallow their own failures.
pub trait DesktopAlert: Send + Sync {
    fn alert(&self, title: &str, body: &str);
}
