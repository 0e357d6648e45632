//! Salon configuration document (`config.json`).
//!
//! Required at startup. Holds the ordered stylist list; the first stylist is the
//! default assignment for bookings that do not name one. Any other keys are kept
//! so the document can be served back verbatim.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SalonConfig {
    raw: Value,
    stylists: Vec<String>,
}

impl SalonConfig {
    /// Read and validate the document. A missing file is fatal for the caller.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("salon configuration not found at {}", path.display()))?;
        let raw: Value = serde_json::from_str(&content)
            .with_context(|| format!("salon configuration at {} is not valid JSON", path.display()))?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self> {
        let list = raw
            .get("stylists")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("salon configuration must contain a `stylists` array"))?;
        let stylists = list
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("stylist names must be strings"))
            })
            .collect::<Result<Vec<_>>>()?;
        if stylists.is_empty() {
            return Err(anyhow!("salon configuration lists no stylists"));
        }
        if stylists.iter().any(|s| s.trim().is_empty()) {
            return Err(anyhow!("stylist names must not be empty"));
        }
        Ok(Self { raw, stylists })
    }

    /// Convenience constructor for a document holding only the stylist list.
    pub fn with_stylists<I, S>(stylists: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = stylists.into_iter().map(Into::into).collect();
        Self::from_value(serde_json::json!({ "stylists": names }))
    }

    /// The document exactly as loaded.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn stylists(&self) -> &[String] {
        &self.stylists
    }

    pub fn default_stylist(&self) -> &str {
        // from_value rejects an empty list
        &self.stylists[0]
    }

    pub fn is_stylist(&self, name: &str) -> bool {
        self.stylists.iter().any(|s| s == name)
    }
}
