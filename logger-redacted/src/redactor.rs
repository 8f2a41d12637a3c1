use crate::config::LoggerConfig;
use base64::{engine::general_purpose, Engine as _};
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

mod patterns {
    #![allow(clippy::unwrap_used)]

    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref EMAIL_REGEX: Regex =
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
        pub static ref PHONE_REGEX: Regex = Regex::new(
            r"(?:\+\d{1,3}[-.\s]?)?\(?\b\d{3}\)?[-.\s]\d{3}[-.\s]?\d{4}\b|\+\d{1,3}[-.\s]\d{3}[-.\s]\d{4}\b"
        )
        .unwrap();
        pub static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
        pub static ref UHID_REGEX: Regex = Regex::new(r"\b[A-Z]{3}\d{7}\b").unwrap();
    }
}

use patterns::{EMAIL_REGEX, PHONE_REGEX, SSN_REGEX, UHID_REGEX};

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub redact_uhids: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            redact_uhids: true,
            hash_for_correlation: true,
            custom_patterns: Vec::new(),
        }
    }
}

impl From<&LoggerConfig> for RedactionConfig {
    fn from(config: &LoggerConfig) -> Self {
        Self {
            enabled: config.redaction_enabled,
            ..Self::default()
        }
    }
}

/// PII redactor for log messages
///
/// Search text typed into the patient search box routinely contains phone
/// numbers and UHIDs, so anything user-typed passes through here before it
/// reaches a log line.
#[derive(Debug, Clone)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn from_logger_config(config: &LoggerConfig) -> Self {
        Self::new(RedactionConfig::from(config))
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // Emails first: their local part may look like a phone number
        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", |email| {
                let local = email.chars().next().unwrap_or('*');
                let domain = email
                    .split_once('@')
                    .and_then(|(_, d)| d.chars().next())
                    .unwrap_or('*');
                format!("{local}***@{domain}***")
            });
        }

        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", |_| "***-**-****".to_string());
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", |_| {
                "(***) ***-****".to_string()
            });
        }

        if self.config.redact_uhids {
            result = self.replace(&UHID_REGEX, &result, "UHID", |uhid| {
                let prefix: String = uhid.chars().take(3).collect();
                format!("{prefix}*******")
            });
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn replace(
        &self,
        pattern: &Regex,
        text: &str,
        label: &str,
        mask: impl Fn(&str) -> String,
    ) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{label}[{}]", Self::hash_value(matched))
                } else {
                    mask(matched)
                }
            })
            .to_string()
    }

    fn hash_value(value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        // First 8 bytes are enough to correlate repeated values
        let prefix: Vec<u8> = digest.iter().take(8).copied().collect();
        general_purpose::STANDARD.encode(prefix)
    }
}
