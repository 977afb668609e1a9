//! # Settings
//!
//! The singleton configuration read by the renderer: who issues receipts,
//! how amounts are labelled and where documents go.
//!
//! ## Partial Updates
//! A [`SettingsPatch`] names only the fields a client wants to change.
//! [`Settings::merge`] applies it field by field against the fixed schema
//! below; unknown fields are rejected at deserialization time.
//!
//! ```text
//! current Settings ──┐
//!                    ├──► merge ──► validate_settings ──► persisted
//! SettingsPatch ─────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_ORGANIZATION_NAME: &str = "My Organization";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";
pub const DEFAULT_FOOTER_TEXT: &str = "Thank you for your payment.";

/// Organization and formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Settings {
    pub organization_name: String,
    pub organization_address: String,
    pub organization_contact: String,
    pub currency_symbol: String,
    pub footer_text: String,
    /// Folder for rendered documents; empty means the application default.
    pub output_folder: String,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Factory defaults, with documents going to `output_folder`.
    pub fn defaults(output_folder: impl Into<String>) -> Self {
        Settings {
            organization_name: DEFAULT_ORGANIZATION_NAME.to_string(),
            organization_address: String::new(),
            organization_contact: String::new(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            footer_text: DEFAULT_FOOTER_TEXT.to_string(),
            output_folder: output_folder.into(),
            updated_at: Utc::now(),
        }
    }

    /// Applies every field present in `patch`, leaving the rest untouched.
    ///
    /// ## Example
    /// ```rust
    /// use receipt_core::{Settings, SettingsPatch};
    ///
    /// let mut settings = Settings::defaults("/tmp/pdfs");
    /// settings.merge(SettingsPatch {
    ///     currency_symbol: Some("$".to_string()),
    ///     ..SettingsPatch::default()
    /// });
    /// assert_eq!(settings.currency_symbol, "$");
    /// assert_eq!(settings.output_folder, "/tmp/pdfs");
    /// ```
    pub fn merge(&mut self, patch: SettingsPatch) {
        let SettingsPatch {
            organization_name,
            organization_address,
            organization_contact,
            currency_symbol,
            footer_text,
            output_folder,
        } = patch;

        if let Some(v) = organization_name {
            self.organization_name = v;
        }
        if let Some(v) = organization_address {
            self.organization_address = v;
        }
        if let Some(v) = organization_contact {
            self.organization_contact = v;
        }
        if let Some(v) = currency_symbol {
            self.currency_symbol = v;
        }
        if let Some(v) = footer_text {
            self.footer_text = v;
        }
        if let Some(v) = output_folder {
            self.output_folder = v;
        }
    }
}

/// Fields a client may change. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct SettingsPatch {
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub organization_address: Option<String>,
    #[serde(default)]
    pub organization_contact: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default)]
    pub output_folder: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_only_touches_present_fields() {
        let mut settings = Settings::defaults("/data/pdfs");
        let before = settings.clone();

        settings.merge(SettingsPatch {
            organization_name: Some("Greenfield College".to_string()),
            footer_text: Some(String::new()),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.organization_name, "Greenfield College");
        assert_eq!(settings.footer_text, "");
        assert_eq!(settings.currency_symbol, before.currency_symbol);
        assert_eq!(settings.output_folder, before.output_folder);
        assert_eq!(settings.organization_address, before.organization_address);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut settings = Settings::defaults("");
        let before = settings.clone();
        settings.merge(SettingsPatch::default());
        assert_eq!(settings, before);
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result: Result<SettingsPatch, _> = serde_json::from_str(r#"{"school_logo": "x.png"}"#);
        assert!(result.is_err());
    }
}
