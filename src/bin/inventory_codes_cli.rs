//! Inventory Codes CLI
//!
//! Commands: ean13, code128, qr, profiles
//! Prompts interactively when --data is not given.
//! Exit status only signals success or failure; the reason is in the report.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use inventory_codes::{
    logging, read_valid_input, GeneratedCode, GenerationError, GenerationPipeline,
    GenerationRequest, ProfileRegistry, StdinSource, Symbology, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "inventory-codes-cli")]
#[command(about = "Inventory Codes CLI - EAN-13, Code128 and QR generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory for generated images
    #[arg(short, long, default_value = "output", env = "INVENTORY_CODES_OUTPUT_DIR", global = true)]
    output_dir: PathBuf,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an EAN-13 barcode from 12 digits
    Ean13 {
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Generate a Code128 barcode from 1-20 alphanumeric characters
    Code128 {
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Generate a QR code using a generation profile
    Qr {
        #[arg(short, long)]
        data: Option<String>,

        /// Profile name (built-in: issuer, compact)
        #[arg(short, long, default_value = "issuer")]
        profile: String,

        /// Directory with extra JSON profiles
        #[arg(long, default_value = "profiles")]
        profiles_dir: PathBuf,
    },

    /// List available QR profiles
    Profiles {
        #[arg(long, default_value = "profiles")]
        profiles_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let pipeline = GenerationPipeline::with_output_root(cli.output_dir.clone());

    let (symbology, data, profile) = match cli.command {
        Commands::Profiles { profiles_dir } => {
            return match ProfileRegistry::load_from_dir(&profiles_dir) {
                Ok(registry) => {
                    let output = serde_json::json!({
                        "engine_version": ENGINE_VERSION,
                        "profiles": registry.list(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
                    ExitCode::SUCCESS
                }
                Err(e) => report_error(cli.json, &e.to_string(), ExitCode::FAILURE),
            };
        }
        Commands::Ean13 { data } => (Symbology::Ean13, data, None),
        Commands::Code128 { data } => (Symbology::Code128, data, None),
        Commands::Qr { data, profile, profiles_dir } => {
            let registry = match ProfileRegistry::load_from_dir(&profiles_dir) {
                Ok(r) => r,
                Err(e) => return report_error(cli.json, &e.to_string(), ExitCode::FAILURE),
            };
            match registry.get(&profile) {
                Some(p) => (Symbology::Qr, data, Some(p.clone())),
                None => {
                    let msg = format!("Unknown profile: {}", profile);
                    return report_error(cli.json, &msg, ExitCode::FAILURE);
                }
            }
        }
    };

    let raw_text = match data {
        Some(d) => d,
        None => match read_valid_input(&mut StdinSource::stdin(), symbology) {
            Ok(Some(line)) => line,
            Ok(None) => return report_error(cli.json, "no input provided", ExitCode::FAILURE),
            Err(e) => return report_error(cli.json, &e.to_string(), ExitCode::FAILURE),
        },
    };

    let request = match profile {
        Some(p) => GenerationRequest::qr(raw_text, p),
        None if symbology == Symbology::Ean13 => GenerationRequest::ean13(raw_text),
        None => GenerationRequest::code128(raw_text),
    };

    finish(cli.json, &request, pipeline.generate(&request))
}

fn finish(
    json: bool,
    request: &GenerationRequest,
    result: Result<GeneratedCode, GenerationError>,
) -> ExitCode {
    match result {
        Ok(code) => {
            report_success(json, request, &code);
            ExitCode::SUCCESS
        }
        Err(e) => report_error(json, &e.to_string(), ExitCode::FAILURE),
    }
}

fn report_success(json: bool, request: &GenerationRequest, code: &GeneratedCode) {
    if json {
        let output = serde_json::json!({
            "success": true,
            "code": code,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return;
    }

    let path = code.path.display();
    match request.prefix() {
        Some(prefix) => println!("QR code with prefix '{}' saved at '{}'", prefix, path),
        None => println!("{} barcode saved at '{}'", code.symbology, path),
    }
}

fn report_error(json: bool, message: &str, exit: ExitCode) -> ExitCode {
    if json {
        let output = serde_json::json!({
            "success": false,
            "error": message,
        });
        println!("{}", serde_json::to_string(&output).unwrap_or_default());
    } else {
        eprintln!("An error occurred: {}", message);
    }
    exit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_failure_shares_one_exit_status() {
        let request = GenerationRequest::code128("");
        for err in [
            GenerationError::InvalidInput("must be 1-20 alphanumeric characters".into()),
            GenerationError::EncodingFailed("Code128 encoding failed".into()),
            GenerationError::IoFailed("output/barcode: denied".into()),
        ] {
            assert_eq!(finish(true, &request, Err(err)), ExitCode::FAILURE);
        }
    }

    #[test]
    fn test_success_exit_status() {
        let request = GenerationRequest::ean13("123456789012");
        let code = GeneratedCode {
            symbology: Symbology::Ean13,
            payload: "123456789012".into(),
            path: PathBuf::from("output/barcode/barcode_2025.01.01-00.00.00.png"),
        };
        assert_eq!(finish(false, &request, Ok(code)), ExitCode::SUCCESS);
    }
}
