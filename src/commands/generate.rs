use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use hostgen::defaults;
use hostgen::generate::{self, GenerateReport};
use hostgen::materialize::Materializer;
use hostgen::paths;
use hostgen::profile::{Profile, ProfileKind};

#[derive(Serialize)]
pub struct GenerateOutput {
    command: String,
    #[serde(flatten)]
    report: GenerateReport,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the device inventory CSV
    #[arg(default_value = "devices.csv")]
    pub input: PathBuf,

    /// Destination root for generated bundles (default: ~/hosts)
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<String>,

    /// Inventory dialect to generate for
    #[arg(long, value_enum)]
    pub profile: Option<ProfileKind>,

    /// Login used when a row carries no username
    #[arg(long)]
    pub username: Option<String>,
}

pub fn run(args: GenerateArgs) -> hostgen::Result<(GenerateOutput, i32)> {
    let config = defaults::load_defaults();

    let kind = args.profile.unwrap_or(config.profile);
    let mut profile = Profile::new(kind).with_ssh_port(config.ssh_port);

    if let Some(username) = args.username.or(config.username) {
        if username.trim().is_empty() {
            return Err(hostgen::Error::validation_invalid_argument(
                "username",
                "Username cannot be empty",
            ));
        }
        profile = profile.with_username(username);
    }

    let mut materializer = match args.output_root.or(config.output_root) {
        Some(root) => {
            if root.trim().is_empty() {
                return Err(hostgen::Error::validation_invalid_argument(
                    "output_root",
                    "Output root cannot be empty",
                ));
            }
            let root = shellexpand::tilde(&root).into_owned();
            Materializer::new(PathBuf::from(root), paths::ssh_dir()?, profile)
        }
        None => Materializer::with_default_paths(profile)?,
    };

    let report = generate::run(&args.input, &mut materializer)?;
    let exit_code = if report.summary.succeeded > 0 { 0 } else { 1 };

    Ok((
        GenerateOutput {
            command: "generate".to_string(),
            report,
        },
        exit_code,
    ))
}
