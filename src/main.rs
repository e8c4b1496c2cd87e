//! Vault8 command-line client.
//!
//! Builds signed URLs and uploads images. Results go to stdout, logs to
//! stderr.

use std::process::ExitCode;
use std::time::SystemTime;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vault8::{
    config::{
        Cli, Command, ImageUrlConfig, OutputFormat, ServiceConfig, TokenConfig,
        UploadCommandConfig, UploadUrlConfig, VerifyConfig,
    },
    Client, UploadDispatcher, ValidityWindow,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::ImageUrl(config) => run_image_url(config),
        Command::UploadUrl(config) => run_upload_url(config),
        Command::Token(config) => run_token(config),
        Command::Verify(config) => run_verify(config),
        Command::Upload(config) => run_upload(config).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "vault8=debug" } else { "vault8=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Set up logging and build the client shared by all commands.
fn prepare(service: &ServiceConfig, validation: Result<(), String>) -> Option<Client> {
    init_logging(service.verbose);

    if let Err(e) = validation {
        error!("Configuration error: {}", e);
        return None;
    }

    match service.build_client() {
        Ok(client) => {
            debug!(
                service_url = %client.service_url(),
                hash = %client.policy().hash,
                "Client ready"
            );
            Some(client)
        }
        Err(e) => {
            error!("Configuration error: {}", e);
            None
        }
    }
}

/// Print a generated URL in the requested format.
fn print_url(format: OutputFormat, url: &str, path: &str, window: &ValidityWindow) {
    match format {
        OutputFormat::Url => println!("{}", url),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "url": url,
                "path": path,
                "time": window.current_time,
                "until": window.until_time,
            });
            println!("{:#}", json);
        }
    }
}

// =============================================================================
// Image URL Command
// =============================================================================

fn run_image_url(config: ImageUrlConfig) -> ExitCode {
    let Some(client) = prepare(&config.service, config.validate()) else {
        return ExitCode::FAILURE;
    };

    let filters = match config.parse_filters() {
        Ok(filters) => filters,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let window = config.window.resolve(SystemTime::now(), None);

    let result = client
        .image_path(&config.resource_id, &filters, &config.file_name)
        .and_then(|path| {
            client
                .image_url(&config.resource_id, &filters, &config.file_name, window)
                .map(|url| (path, url))
        });

    match result {
        Ok((path, url)) => {
            print_url(config.format, &url, &path, &window);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Upload URL Command
// =============================================================================

fn run_upload_url(config: UploadUrlConfig) -> ExitCode {
    let Some(client) = prepare(&config.service, config.validate()) else {
        return ExitCode::FAILURE;
    };

    let (current_time, until_time) = match config.window.resolve_bounded(SystemTime::now()) {
        Ok(bounds) => bounds,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match client.upload_url(&config.path, current_time, until_time) {
        Ok(url) => {
            let window = ValidityWindow::between(current_time, until_time);
            print_url(config.format, &url, &config.path, &window);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Token Command
// =============================================================================

fn run_token(config: TokenConfig) -> ExitCode {
    let Some(client) = prepare(&config.service, config.validate()) else {
        return ExitCode::FAILURE;
    };

    println!("{}", client.encode_token(&config.path, config.window()));
    ExitCode::SUCCESS
}

// =============================================================================
// Verify Command
// =============================================================================

fn run_verify(config: VerifyConfig) -> ExitCode {
    let Some(client) = prepare(&config.service, Ok(())) else {
        return ExitCode::FAILURE;
    };

    match client.verify_url(&config.url) {
        Ok(()) => {
            println!("valid");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("invalid: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Upload Command
// =============================================================================

async fn run_upload(config: UploadCommandConfig) -> ExitCode {
    let Some(client) = prepare(&config.service, config.validate()) else {
        return ExitCode::FAILURE;
    };

    let (current_time, until_time) = match config.window.resolve_bounded(SystemTime::now()) {
        Ok(bounds) => bounds,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let payload = match config.payload() {
        Ok(payload) => payload,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let uploader = match UploadDispatcher::new(client, &config.upload_config()) {
        Ok(uploader) => uploader.with_upload_path(config.path.clone()),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = uploader.upload(payload, current_time, until_time).await;
    println!("{:#}", serde_json::Value::Object(result.fields.clone()));

    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
