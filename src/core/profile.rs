//! Generation profiles.
//!
//! Inventories come in two dialects that differ only in the
//! device-classification field, the sentinels used for missing values, and
//! the default login. A `Profile` carries those differences as data so the
//! rest of the generator has a single code path.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which inventory dialect the generator speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    /// `device_type` classification, `unknown` sentinels, `pi` login.
    #[default]
    DeviceType,
    /// `is_raspberry_pi` classification, `-`/`false` sentinels, `tom` login.
    RaspberryPi,
}

impl ProfileKind {
    /// Header name of the device-classification column.
    pub fn device_class_column(&self) -> &'static str {
        match self {
            ProfileKind::DeviceType => "device_type",
            ProfileKind::RaspberryPi => "is_raspberry_pi",
        }
    }

    /// Env-file key the classification is written under.
    pub fn device_class_env_key(&self) -> &'static str {
        match self {
            ProfileKind::DeviceType => "DEVICE_TYPE",
            ProfileKind::RaspberryPi => "IS_RASPBERRY_PI",
        }
    }

    /// Label used for the classification in the generated README.
    pub fn device_class_label(&self) -> &'static str {
        match self {
            ProfileKind::DeviceType => "Device type",
            ProfileKind::RaspberryPi => "Raspberry Pi",
        }
    }

    /// Sentinel for empty text fields (hostname, OS info, model).
    pub fn missing_text(&self) -> &'static str {
        match self {
            ProfileKind::DeviceType => "unknown",
            ProfileKind::RaspberryPi => "-",
        }
    }

    /// Sentinel for an empty device-classification field.
    pub fn missing_device_class(&self) -> &'static str {
        match self {
            ProfileKind::DeviceType => "unknown",
            ProfileKind::RaspberryPi => "false",
        }
    }

    /// Login used when a row carries no username.
    pub fn default_username(&self) -> &'static str {
        match self {
            ProfileKind::DeviceType => "pi",
            ProfileKind::RaspberryPi => "tom",
        }
    }
}

/// Effective generation settings: a dialect plus the overridable knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub kind: ProfileKind,
    pub username: String,
    pub ssh_port: u16,
}

impl Profile {
    pub fn new(kind: ProfileKind) -> Self {
        Self {
            kind,
            username: kind.default_username().to_string(),
            ssh_port: 22,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_ssh_port(mut self, port: u16) -> Self {
        self.ssh_port = port;
        self
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(ProfileKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_type_profile_defaults() {
        let profile = Profile::new(ProfileKind::DeviceType);
        assert_eq!(profile.username, "pi");
        assert_eq!(profile.ssh_port, 22);
        assert_eq!(profile.kind.missing_text(), "unknown");
        assert_eq!(profile.kind.device_class_env_key(), "DEVICE_TYPE");
    }

    #[test]
    fn raspberry_pi_profile_defaults() {
        let profile = Profile::new(ProfileKind::RaspberryPi);
        assert_eq!(profile.username, "tom");
        assert_eq!(profile.kind.missing_text(), "-");
        assert_eq!(profile.kind.missing_device_class(), "false");
        assert_eq!(profile.kind.device_class_column(), "is_raspberry_pi");
    }

    #[test]
    fn username_override_replaces_default() {
        let profile = Profile::new(ProfileKind::DeviceType).with_username("ops");
        assert_eq!(profile.username, "ops");
    }
}
