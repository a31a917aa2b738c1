use chrono::Local;

use crate::profile::Profile;

/// One parsed inventory row.
///
/// `ip` is the only required field; every other field may be empty until
/// [`DeviceRecord::with_defaults`] resolves it against a profile. Records are
/// constructed fresh per row and discarded after materialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub row_number: usize,
    pub ip: String,
    pub hostname: String,
    pub device_class: String,
    pub os_info: String,
    pub model: String,
    pub scan_date: String,
    pub username: String,
}

impl DeviceRecord {
    /// Fill empty optional fields with their profile defaults.
    ///
    /// An empty scan date becomes the current local time; an empty username
    /// becomes the profile login.
    pub fn with_defaults(mut self, profile: &Profile) -> Self {
        if self.hostname.is_empty() {
            self.hostname = profile.kind.missing_text().to_string();
        }
        if self.device_class.is_empty() {
            self.device_class = profile.kind.missing_device_class().to_string();
        }
        if self.os_info.is_empty() {
            self.os_info = profile.kind.missing_text().to_string();
        }
        if self.model.is_empty() {
            self.model = profile.kind.missing_text().to_string();
        }
        if self.scan_date.is_empty() {
            self.scan_date = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        }
        if self.username.is_empty() {
            self.username = profile.username.clone();
        }
        self
    }
}
