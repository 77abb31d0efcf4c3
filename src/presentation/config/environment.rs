use std::env;
use std::fmt;
use std::str::FromStr;

use super::SettingsError;

const ENVIRONMENT_VAR: &str = "APP_ENVIRONMENT";

/// Deployment profile. Picks the `appsettings.{Profile}` file layered over
/// the built-in defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Local,
    Test,
    Prod,
}

impl Environment {
    /// Reads `APP_ENVIRONMENT`; unset means `Local`.
    pub fn from_env() -> Result<Self, SettingsError> {
        match env::var(ENVIRONMENT_VAR) {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn settings_file(self) -> String {
        format!("appsettings.{}", self)
    }
}

impl FromStr for Environment {
    type Err = SettingsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "local" | "dev" | "development" => Ok(Self::Local),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(SettingsError::UnknownEnvironment(raw.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = match self {
            Self::Local => "Local",
            Self::Test => "Test",
            Self::Prod => "Prod",
        };
        f.write_str(profile)
    }
}
