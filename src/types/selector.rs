// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Validated equality-based label selectors.

use crate::constants::labels::{MAX_NAME_LEN, MAX_PREFIX_LEN};
use crate::error::{Result, RolloutError};
use crate::types::workload::Labels;
use std::fmt;

/// A non-empty set of `key=value` requirements, serialized in key order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Labels,
}

impl LabelSelector {
    pub fn from_labels(labels: &Labels) -> Result<Self> {
        if labels.is_empty() {
            return Err(RolloutError::SelectorInvalid(
                "label set is empty and would select every pod".to_string(),
            ));
        }

        for (key, value) in labels {
            validate_key(key).map_err(|reason| {
                RolloutError::SelectorInvalid(format!("key '{}': {}", key, reason))
            })?;
            validate_value(value).map_err(|reason| {
                RolloutError::SelectorInvalid(format!(
                    "value '{}' of key '{}': {}",
                    value, key, reason
                ))
            })?;
        }

        Ok(Self {
            requirements: labels.clone(),
        })
    }

    /// True when every requirement is present in `labels`
    pub fn matches(&self, labels: &Labels) -> bool {
        self.requirements
            .iter()
            .all(|(k, v)| labels.get(k) == Some(v))
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

fn validate_key(key: &str) -> std::result::Result<(), String> {
    let name = match key.split_once('/') {
        Some((prefix, name)) => {
            validate_prefix(prefix)?;
            name
        }
        None => key,
    };
    if name.is_empty() {
        return Err("name part must not be empty".to_string());
    }
    validate_name(name)
}

fn validate_value(value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }
    validate_name(value)
}

fn validate_name(name: &str) -> std::result::Result<(), String> {
    if name.len() > MAX_NAME_LEN {
        return Err(format!("must be at most {} characters", MAX_NAME_LEN));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err("may only contain alphanumerics, '-', '_' and '.'".to_string());
    }
    if !starts_and_ends_alphanumeric(name) {
        return Err("must start and end with an alphanumeric character".to_string());
    }
    Ok(())
}

/// DNS-1123 subdomain
fn validate_prefix(prefix: &str) -> std::result::Result<(), String> {
    if prefix.is_empty() || prefix.len() > MAX_PREFIX_LEN {
        return Err(format!("prefix must be 1 to {} characters", MAX_PREFIX_LEN));
    }
    let valid_label = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && starts_and_ends_alphanumeric(part)
    };
    if !prefix.split('.').all(valid_label) {
        return Err(format!("prefix '{}' is not a valid DNS subdomain", prefix));
    }
    Ok(())
}

fn starts_and_ends_alphanumeric(s: &str) -> bool {
    let first = s.chars().next();
    let last = s.chars().last();
    first.is_some_and(|c| c.is_ascii_alphanumeric())
        && last.is_some_and(|c| c.is_ascii_alphanumeric())
}
