//! Secret redaction: masks credentials in tool output before it is
//! audited, notified or sent back to the model.

mod regex_redactor;

pub use regex_redactor::{RegexSecretRedactor, SecretPattern};
