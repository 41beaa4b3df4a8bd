//! Desktop alert adapters.

mod os_alert;

pub use os_alert::OsDesktopAlert;
