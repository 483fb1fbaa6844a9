//! Conversation settings persisted in `config.json`.
//!
//! Updates go through [`ConfigUpdate`]: a fixed whitelist of fields, each validated before any is applied.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

pub const DEFAULT_MODEL_NAME: &str = "fluffy/l3-8b-stheno-v3.2:latest";
pub const DEFAULT_CONTEXT_LIMIT: usize = 5000;
pub const DEFAULT_REFRESH_RATE: u32 = 4;
pub const DEFAULT_MAX_WIDTH: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Passed through to the inference backend.
    pub model_name: String,
    /// Budget for the conversation buffer; also sent to the backend as its context size.
    pub context_limit: usize,
    /// Terminal redraws per second while streaming.
    pub refresh_rate: u32,
    /// Terminal column cap for rendered replies.
    pub max_width: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            context_limit: DEFAULT_CONTEXT_LIMIT,
            refresh_rate: DEFAULT_REFRESH_RATE,
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

impl Configuration {
    /// Every integer must be positive and the model name non-blank.
    pub fn validate(&self) -> Result<(), StorageError> {
        validate_model_name(&self.model_name)?;
        validate_positive("context_limit", self.context_limit as u64)?;
        validate_positive("refresh_rate", u64::from(self.refresh_rate))?;
        validate_positive("max_width", u64::from(self.max_width))?;
        Ok(())
    }

    /// Returns a copy with `update` applied, or the first validation failure. `self` is untouched.
    pub fn apply(&self, update: &ConfigUpdate) -> Result<Configuration, StorageError> {
        let mut next = self.clone();
        if let Some(model_name) = &update.model_name {
            next.model_name = model_name.trim().to_string();
        }
        if let Some(context_limit) = update.context_limit {
            next.context_limit = context_limit;
        }
        if let Some(refresh_rate) = update.refresh_rate {
            next.refresh_rate = refresh_rate;
        }
        if let Some(max_width) = update.max_width {
            next.max_width = max_width;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial update of [`Configuration`]. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
}

impl ConfigUpdate {
    /// Parses a request body. Wrong types, negative numbers and unknown keys become `InvalidConfig`.
    pub fn from_json(value: serde_json::Value) -> Result<Self, StorageError> {
        serde_json::from_value(value).map_err(|e| StorageError::InvalidConfig(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.model_name.is_none()
            && self.context_limit.is_none()
            && self.refresh_rate.is_none()
            && self.max_width.is_none()
    }
}

fn validate_model_name(model_name: &str) -> Result<(), StorageError> {
    if model_name.trim().is_empty() {
        return Err(StorageError::InvalidConfig(
            "model_name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_positive(field: &str, value: u64) -> Result<(), StorageError> {
    if value == 0 {
        return Err(StorageError::InvalidConfig(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(())
}
