use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LedgerError, Result};
use crate::types::Role;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// monthly rate, as a percentage, new loans are granted at unless one is given
    pub default_monthly_rate: Rate,
    /// role whose dues count toward the collection summary, `None` for everyone
    pub dues_role: Option<Role>,
}

impl LedgerConfig {
    /// 5% a month, dues from regular members only
    pub fn standard() -> Self {
        Self {
            default_monthly_rate: Rate::from_percentage(5),
            dues_role: Some(Role::Member),
        }
    }

    /// load from a json document; absent fields fall back to `standard()`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let partial: PartialConfig = serde_json::from_str(json).map_err(|e| {
            LedgerError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;

        let standard = Self::standard();
        let config = Self {
            default_monthly_rate: partial.default_monthly_rate.unwrap_or(standard.default_monthly_rate),
            dues_role: partial.dues_role.unwrap_or(standard.dues_role),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_monthly_rate.is_out_of_range() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "default monthly rate {} must be between 0% and {}",
                    self.default_monthly_rate,
                    Rate::MAX_MONTHLY
                ),
            });
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Deserialize)]
struct PartialConfig {
    default_monthly_rate: Option<Rate>,
    // outer option: field present; inner: explicit null means every role
    #[serde(default, deserialize_with = "present")]
    dues_role: Option<Option<Role>>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<Role>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Role>::deserialize(deserializer).map(Some)
}
