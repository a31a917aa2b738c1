//! Host bundle materialization.
//!
//! Consumes one device record at a time and writes its three-file
//! configuration bundle (.env, ssh_config, README.md) under the destination
//! root, hardening filesystem permissions as it goes.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::normalize::normalize_host;
use crate::paths;
use crate::profile::Profile;
use crate::record::DeviceRecord;
use crate::utils::{io, template};

const BUNDLE_DIR_MODE: u32 = 0o700;
const SECRET_FILE_MODE: u32 = 0o600;
const README_FILE_MODE: u32 = 0o644;

const ENV_TEMPLATE: &str = r#"# SSH Host Configuration

# Connection Details
HOST={{host}}
USER={{user}}

# Network Configuration
PORT={{port}}
KEY={{keyPath}}

# Host Metadata
HOSTNAME='{{hostname}}'
{{deviceClassKey}}='{{deviceClass}}'
OS_INFO='{{osInfo}}'
MODEL='{{model}}'
SCAN_DATE='{{scanDate}}'
"#;

const SSH_CONFIG_TEMPLATE: &str = r#"Host {{host}}
    HostName {{host}}
    User {{user}}
    Port {{port}}
    IdentityFile ~/.ssh/id_rsa_{{normalizedHost}}
    # Additional custom SSH options can be added here
"#;

const README_TEMPLATE: &str = r#"# Host: {{host}}

## Connection Details
- **IP**: {{host}}
- **Hostname**: {{hostname}}
- **User**: {{user}}

## System Information
- **{{deviceClassLabel}}**: {{deviceClass}}
- **OS**: {{osInfo}}
- **Model**: {{model}}
- **Scanned**: {{scanDate}}

## SSH Configuration
SSH configuration available in `ssh_config`.
Connection key: `~/.ssh/id_rsa_{{normalizedHost}}`

## Connect
```bash
ssh {{user}}@{{host}}
```

or with the generated configuration:

```bash
ssh -F ssh_config {{host}}
```

## Generate the SSH key
```bash
ssh-keygen -t rsa -b 4096 -f ~/.ssh/id_rsa_{{normalizedHost}}
ssh-copy-id -i ~/.ssh/id_rsa_{{normalizedHost}}.pub {{user}}@{{host}}
```
"#;

struct TemplateVars;

impl TemplateVars {
    const HOST: &'static str = "host";
    const USER: &'static str = "user";
    const PORT: &'static str = "port";
    const KEY_PATH: &'static str = "keyPath";
    const HOSTNAME: &'static str = "hostname";
    const DEVICE_CLASS_KEY: &'static str = "deviceClassKey";
    const DEVICE_CLASS_LABEL: &'static str = "deviceClassLabel";
    const DEVICE_CLASS: &'static str = "deviceClass";
    const OS_INFO: &'static str = "osInfo";
    const MODEL: &'static str = "model";
    const SCAN_DATE: &'static str = "scanDate";
    const NORMALIZED_HOST: &'static str = "normalizedHost";
}

/// Paths of the three files written for one device.
#[derive(Debug, Clone)]
pub struct HostBundle {
    pub dir: PathBuf,
    pub env_file: PathBuf,
    pub ssh_config: PathBuf,
    pub readme: PathBuf,
}

/// Writes host bundles under a destination root.
///
/// The root is created lazily on the first materialized record, so a run
/// that produces no records leaves the filesystem untouched.
pub struct Materializer {
    hosts_root: PathBuf,
    ssh_dir: PathBuf,
    profile: Profile,
    root_ready: bool,
}

impl Materializer {
    pub fn new(hosts_root: PathBuf, ssh_dir: PathBuf, profile: Profile) -> Self {
        Self {
            hosts_root,
            ssh_dir,
            profile,
            root_ready: false,
        }
    }

    /// Destination root and key directory resolved from the caller's home.
    pub fn with_default_paths(profile: Profile) -> Result<Self> {
        Ok(Self::new(paths::hosts_root()?, paths::ssh_dir()?, profile))
    }

    pub fn hosts_root(&self) -> &Path {
        &self.hosts_root
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Create or overwrite the bundle for one device record.
    pub fn materialize(&mut self, record: &DeviceRecord) -> Result<HostBundle> {
        let normalized = normalize_host(&record.ip);

        self.ensure_root()?;

        let dir = self.hosts_root.join(&record.ip);
        fs::create_dir_all(&dir).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("create {}", dir.display())))
        })?;
        io::set_mode(&dir, BUNDLE_DIR_MODE, "harden bundle directory")?;

        let record = record.clone().with_defaults(&self.profile);

        let bundle = HostBundle {
            env_file: dir.join(".env"),
            ssh_config: dir.join("ssh_config"),
            readme: dir.join("README.md"),
            dir,
        };

        let (env_content, ssh_content, readme_content) = self.render(&record, &normalized);

        io::write_file_with_mode(&bundle.env_file, &env_content, SECRET_FILE_MODE, "write .env")?;
        io::write_file_with_mode(
            &bundle.ssh_config,
            &ssh_content,
            SECRET_FILE_MODE,
            "write ssh_config",
        )?;
        io::write_file_with_mode(
            &bundle.readme,
            &readme_content,
            README_FILE_MODE,
            "write README.md",
        )?;

        log_status!(
            "generate",
            "Created configuration for host {} in {}",
            record.ip,
            bundle.dir.display()
        );

        Ok(bundle)
    }

    /// Create the destination root once, hardened to owner-only access.
    fn ensure_root(&mut self) -> Result<()> {
        if self.root_ready {
            return Ok(());
        }

        fs::create_dir_all(&self.hosts_root).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("create {}", self.hosts_root.display())),
            )
        })?;
        io::set_mode(&self.hosts_root, BUNDLE_DIR_MODE, "harden hosts root")?;

        self.root_ready = true;
        Ok(())
    }

    fn render(&self, record: &DeviceRecord, normalized: &str) -> (String, String, String) {
        let port = self.profile.ssh_port.to_string();
        let key_path = self
            .ssh_dir
            .join(format!("id_rsa_{}", normalized))
            .display()
            .to_string();

        let vars: Vec<(&str, &str)> = vec![
            (TemplateVars::HOST, &record.ip),
            (TemplateVars::USER, &record.username),
            (TemplateVars::PORT, &port),
            (TemplateVars::KEY_PATH, &key_path),
            (TemplateVars::HOSTNAME, &record.hostname),
            (
                TemplateVars::DEVICE_CLASS_KEY,
                self.profile.kind.device_class_env_key(),
            ),
            (
                TemplateVars::DEVICE_CLASS_LABEL,
                self.profile.kind.device_class_label(),
            ),
            (TemplateVars::DEVICE_CLASS, &record.device_class),
            (TemplateVars::OS_INFO, &record.os_info),
            (TemplateVars::MODEL, &record.model),
            (TemplateVars::SCAN_DATE, &record.scan_date),
            (TemplateVars::NORMALIZED_HOST, normalized),
        ];

        (
            template::render(ENV_TEMPLATE, &vars),
            template::render(SSH_CONFIG_TEMPLATE, &vars),
            template::render(README_TEMPLATE, &vars),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileKind;
    use std::fs;
    use tempfile::tempdir;

    fn record(ip: &str) -> DeviceRecord {
        DeviceRecord {
            ip: ip.to_string(),
            hostname: "pi-cam".to_string(),
            device_class: "camera".to_string(),
            os_info: "Raspbian 12".to_string(),
            model: "Pi 4B".to_string(),
            scan_date: "2025-05-15 12:00:00".to_string(),
            ..DeviceRecord::default()
        }
    }

    fn materializer(root: &Path, profile: Profile) -> Materializer {
        Materializer::new(root.join("hosts"), root.join("ssh"), profile)
    }

    #[test]
    fn materialize_writes_three_files() {
        let dir = tempdir().unwrap();
        let mut m = materializer(dir.path(), Profile::default());

        let bundle = m.materialize(&record("192.168.1.1")).unwrap();

        assert!(bundle.env_file.exists());
        assert!(bundle.ssh_config.exists());
        assert!(bundle.readme.exists());
        assert_eq!(bundle.dir, dir.path().join("hosts").join("192.168.1.1"));
    }

    #[test]
    fn env_file_contains_connection_and_metadata() {
        let dir = tempdir().unwrap();
        let mut m = materializer(dir.path(), Profile::default());

        let bundle = m.materialize(&record("192.168.1.1")).unwrap();
        let env = fs::read_to_string(&bundle.env_file).unwrap();

        assert!(env.contains("HOST=192.168.1.1"));
        assert!(env.contains("USER=pi"));
        assert!(env.contains("PORT=22"));
        assert!(env.contains("id_rsa_192_168_1_1"));
        assert!(env.contains("HOSTNAME='pi-cam'"));
        assert!(env.contains("DEVICE_TYPE='camera'"));
        assert!(env.contains("SCAN_DATE='2025-05-15 12:00:00'"));
    }

    #[test]
    fn ssh_config_uses_raw_ip_and_normalized_key() {
        let dir = tempdir().unwrap();
        let mut m = materializer(dir.path(), Profile::default());

        let bundle = m.materialize(&record("192.168.1.1")).unwrap();
        let ssh = fs::read_to_string(&bundle.ssh_config).unwrap();

        assert!(ssh.starts_with("Host 192.168.1.1\n"));
        assert!(ssh.contains("HostName 192.168.1.1"));
        assert!(ssh.contains("IdentityFile ~/.ssh/id_rsa_192_168_1_1"));
    }

    #[test]
    fn raspberry_pi_profile_changes_env_key() {
        let dir = tempdir().unwrap();
        let mut m = materializer(dir.path(), Profile::new(ProfileKind::RaspberryPi));

        let bundle = m.materialize(&record("10.0.0.7")).unwrap();
        let env = fs::read_to_string(&bundle.env_file).unwrap();

        assert!(env.contains("IS_RASPBERRY_PI='camera'"));
        assert!(env.contains("USER=tom"));
        assert!(!env.contains("DEVICE_TYPE="));
    }

    #[cfg(unix)]
    #[test]
    fn bundle_permissions_are_hardened() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let mut m = materializer(dir.path(), Profile::default());

        let bundle = m.materialize(&record("10.0.0.7")).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&dir.path().join("hosts")), 0o700);
        assert_eq!(mode(&bundle.dir), 0o700);
        assert_eq!(mode(&bundle.env_file), 0o600);
        assert_eq!(mode(&bundle.ssh_config), 0o600);
        assert_eq!(mode(&bundle.readme), 0o644);
    }

    #[test]
    fn rematerialize_overwrites_identically() {
        let dir = tempdir().unwrap();
        let mut m = materializer(dir.path(), Profile::default());

        let first = m.materialize(&record("10.0.0.7")).unwrap();
        let before = fs::read_to_string(&first.env_file).unwrap();

        let second = m.materialize(&record("10.0.0.7")).unwrap();
        let after = fs::read_to_string(&second.env_file).unwrap();

        assert_eq!(before, after);
        let entries = fs::read_dir(&second.dir).unwrap().count();
        assert_eq!(entries, 3);
    }
}
