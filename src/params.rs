//! Module parameters and cross-field validation.
//!
//! Every constraint here is enforced before any external invocation: a
//! parameter set that fails validation never reaches the command builder.

use crate::error::WpError;
use clap::ValueEnum;
use serde::Deserialize;

/// Actions understood by the `core` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoreAction {
    Download,
    Update,
    Install,
    Verify,
}

/// Actions understood by the `config` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigAction {
    Create,
}

/// Parameter map for the `core` module.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreParams {
    pub path: String,
    pub action: CoreAction,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub network: bool,
    #[serde(default)]
    pub minor: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub admin_user: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub skip_email: bool,
}

impl CoreParams {
    /// Enforce mutually-exclusive and required-together constraints.
    pub fn validate(&self) -> Result<(), WpError> {
        if self.version.is_some() && self.minor {
            return Err(WpError::InvalidParams(
                "version and minor are mutually exclusive".into(),
            ));
        }
        if self.minor && self.action != CoreAction::Update {
            return Err(WpError::InvalidParams(
                "minor is only valid with the update action".into(),
            ));
        }
        if self.action == CoreAction::Install {
            let missing: Vec<&str> = [
                ("url", self.url.is_none()),
                ("title", self.title.is_none()),
                ("admin_user", self.admin_user.is_none()),
                ("admin_email", self.admin_email.is_none()),
            ]
            .iter()
            .filter(|(_, absent)| *absent)
            .map(|(name, _)| *name)
            .collect();

            if !missing.is_empty() {
                return Err(WpError::InvalidParams(format!(
                    "the install action requires url, title, admin_user and admin_email \
                     (missing: {})",
                    missing.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Parameter map for the `config` module.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigParams {
    pub path: String,
    pub action: ConfigAction,
    #[serde(default)]
    pub dbname: Option<String>,
    #[serde(default)]
    pub dbuser: Option<String>,
    #[serde(default)]
    pub dbpass: Option<String>,
    #[serde(default)]
    pub dbhost: Option<String>,
    #[serde(default)]
    pub dbprefix: Option<String>,
    #[serde(default)]
    pub dbcharset: Option<String>,
    #[serde(default)]
    pub dbcollate: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl ConfigParams {
    pub fn validate(&self) -> Result<(), WpError> {
        match self.action {
            ConfigAction::Create => {
                let missing: Vec<&str> = [
                    ("dbname", self.dbname.is_none()),
                    ("dbuser", self.dbuser.is_none()),
                    ("dbpass", self.dbpass.is_none()),
                ]
                .iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| *name)
                .collect();

                if !missing.is_empty() {
                    return Err(WpError::InvalidParams(format!(
                        "the create action requires dbname, dbuser and dbpass (missing: {})",
                        missing.join(", ")
                    )));
                }
            }
        }
        Ok(())
    }
}
