use clap::Parser;

mod commands;
mod output;

use commands::generate;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "hostgen")]
#[command(version = VERSION)]
#[command(about = "Generate SSH host configuration bundles from a device inventory")]
struct Cli {
    #[command(flatten)]
    args: generate::GenerateArgs,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let (json_result, exit_code) = output::map_cmd_result_to_json(generate::run(cli.args));

    if output::print_json_result(json_result).is_err() {
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
