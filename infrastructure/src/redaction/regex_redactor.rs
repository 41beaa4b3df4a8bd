//! Regex-based [`SecretRedactor`].

use conductor_application::ports::redactor::SecretRedactor;
use regex::Regex;
use tracing::warn;

/// Built-in patterns: `(name, regex, replacement)`.
///
/// Order matters: more specific shapes come before the generic ones they
/// would otherwise be swallowed by.
const BUILTIN_PATTERNS: &[(&str, &str, &str)] = &[
    (
        "private_key",
        r"-----BEGIN [A-Z ]*PRIVATE KEY-----[\s\S]*?-----END [A-Z ]*PRIVATE KEY-----",
        "[REDACTED_PRIVATE_KEY]",
    ),
    (
        "anthropic_key",
        r"sk-ant-[A-Za-z0-9_\-]{20,}",
        "[REDACTED_API_KEY]",
    ),
    ("api_key_sk", r"sk-[A-Za-z0-9_\-]{20,}", "[REDACTED_API_KEY]"),
    (
        "github_token",
        r"gh[pousr]_[A-Za-z0-9]{36,}",
        "[REDACTED_GITHUB_TOKEN]",
    ),
    (
        "aws_access_key",
        r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b",
        "[REDACTED_AWS_KEY]",
    ),
    (
        "google_api_key",
        r"AIza[0-9A-Za-z\-_]{35}",
        "[REDACTED_GOOGLE_KEY]",
    ),
    (
        "slack_token",
        r"xox[abprs]-[A-Za-z0-9\-]{10,}",
        "[REDACTED_SLACK_TOKEN]",
    ),
    (
        "bearer_token",
        r"(?i)\b(bearer\s+)[A-Za-z0-9\-._~+/]+=*",
        "${1}[REDACTED]",
    ),
    (
        "secret_assignment",
        r#"(?i)(password|passwd|pwd|secret|api[_-]?key|access[_-]?token|auth[_-]?token|client[_-]?secret)(\s*[=:]\s*)["']?[^\s"']+["']?"#,
        "${1}${2}[REDACTED]",
    ),
];

/// A named pattern and what its matches are replaced with.
#[derive(Debug, Clone)]
pub struct SecretPattern {
    pub name: String,
    pub pattern: Regex,
    pub replacement: String,
}

impl SecretPattern {
    pub fn new(name: &str, pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }
}

/// Masks API keys, bearer tokens, cloud credentials, private-key blocks
/// and `password=`-style assignments.
#[derive(Debug, Clone)]
pub struct RegexSecretRedactor {
    patterns: Vec<SecretPattern>,
}

impl RegexSecretRedactor {
    /// Redactor with the built-in patterns only
    pub fn new() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|(name, pattern, replacement)| {
                SecretPattern::new(name, pattern, replacement)
                    .map_err(|e| warn!(pattern = %name, "Skipping secret pattern: {}", e))
                    .ok()
            })
            .collect();
        Self { patterns }
    }

    /// Add user-configured patterns; matches become `[REDACTED]`.
    pub fn with_extra_patterns<I, S>(mut self, patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, pattern) in patterns.into_iter().enumerate() {
            self.patterns.push(SecretPattern::new(
                &format!("custom_{}", i),
                pattern.as_ref(),
                "[REDACTED]",
            )?);
        }
        Ok(self)
    }

    /// Names of the patterns that match `text`.
    pub fn detect(&self, text: &str) -> Vec<&str> {
        self.patterns
            .iter()
            .filter(|p| p.pattern.is_match(text))
            .map(|p| p.name.as_str())
            .collect()
    }
}

impl Default for RegexSecretRedactor {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretRedactor for RegexSecretRedactor {
    fn redact(&self, text: &str) -> String {
        let mut output = text.to_string();
        for p in &self.patterns {
            if p.pattern.is_match(&output) {
                output = p
                    .pattern
                    .replace_all(&output, p.replacement.as_str())
                    .into_owned();
            }
        }
        output
    }
}
