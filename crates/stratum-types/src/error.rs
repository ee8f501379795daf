//! Error type shared by the engine and the store adapters

use crate::types::SettingLevel;

pub type StResult<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// No definition is registered under this setting name
	SettingNotFound(Box<str>),
	/// The definition does not allow values at this level
	InvalidScope { name: Box<str>, level: SettingLevel },
	/// A stored value of an encrypted setting could not be decrypted
	Decryption(Box<str>),
	/// A resolved value could not be parsed into the requested type
	Parse { name: Box<str>, value: String },
	ConfigError(String),
	NotFound,
	DbError,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::SettingNotFound(name) => write!(f, "There is no setting defined with name: {}", name),
			Error::InvalidScope { name, level } => {
				write!(f, "Setting '{}' cannot be stored at {} level", name, level)
			}
			Error::Decryption(name) => write!(f, "Stored value of setting '{}' cannot be decrypted", name),
			Error::Parse { name, value } => {
				write!(f, "Value '{}' of setting '{}' cannot be parsed", value, name)
			}
			Error::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
			Error::NotFound => write!(f, "not found"),
			Error::DbError => write!(f, "setting store error"),
		}
	}
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display_names_the_setting() {
		let err = Error::SettingNotFound("MyMissingSetting".into());
		assert!(err.to_string().contains("MyMissingSetting"));

		let err = Error::InvalidScope { name: "MyAppLevelSetting".into(), level: SettingLevel::User };
		assert_eq!(err.to_string(), "Setting 'MyAppLevelSetting' cannot be stored at user level");
	}
}

// vim: ts=4
