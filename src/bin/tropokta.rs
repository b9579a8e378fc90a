#![recursion_limit = "256"]
//! # tropokta
//!
//! Command-line worker that applies CloudFormation custom-resource events to
//! an Okta organization.
//!
//! ## Usage
//!
//! Handle a single event stored in a file:
//!
//! ```bash
//! tropokta event.json
//! ```
//!
//! Run as a long-lived worker reading one JSON event per line from stdin. The
//! API token is decrypted on the first event and reused for the rest:
//!
//! ```bash
//! event-source | tropokta
//! ```
//!
//! ## Environment
//!
//! - `OKTA_URL` - Okta organization URL (required)
//! - `OKTA_TOKEN` - base64 KMS ciphertext of the API token (required)
//! - `OKTA_AUTH_SCHEME` - authorization scheme, defaults to `SSWS`
//! - `OKTA_REQUEST_TIMEOUT_SECS` - per-request timeout, defaults to 30
//! - `RUST_LOG` - log filter, defaults to `info`
//!
//! Standard AWS variables (`AWS_REGION`, credentials) configure KMS access.
//!
//! ## Exit Codes
//!
//! - `0`: every event was handled and reported
//! - `1`: configuration error, unreadable input, or a fatal handling error

use log::{error, info, warn};
use std::env;
use std::error::Error;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tropokta::{
    CredentialProvider, Dispatcher, HttpCallbackReporter, KmsDecrypter, OktaClient,
    ProviderConfig, ProviderError,
};

type EventDispatcher = Dispatcher<OktaClient<KmsDecrypter>, HttpCallbackReporter>;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 || matches!(args.get(1).map(String::as_str), Some("-h" | "--help")) {
        eprintln!("Usage: {} [EVENT_FILE]", args[0]);
        eprintln!("Reads newline-delimited events from stdin when no file is given.");
        process::exit(1);
    }

    let dispatcher = match build_dispatcher().await {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to start: {}", e);
            process::exit(1);
        }
    };

    let result = match args.get(1) {
        Some(path) => handle_file(&dispatcher, path).await,
        None => handle_stdin(&dispatcher).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

async fn build_dispatcher() -> Result<EventDispatcher, ProviderError> {
    let config = ProviderConfig::from_env()?;
    info!("Using Okta organization {}", config.base_url);

    let decrypter = KmsDecrypter::from_env().await;
    let credentials = Arc::new(CredentialProvider::new(
        config.encrypted_token.clone(),
        decrypter,
    ));
    let client = OktaClient::new(&config, credentials)?;
    let reporter = HttpCallbackReporter::new(config.request_timeout)?;

    Ok(Dispatcher::new(client, reporter))
}

async fn handle_file(dispatcher: &EventDispatcher, path: &str) -> Result<(), Box<dyn Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    match dispatcher.handle_raw(&raw).await? {
        Some(_) => Ok(()),
        None => Err(format!("{path} does not contain an event with a response URL").into()),
    }
}

async fn handle_stdin(dispatcher: &EventDispatcher) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        match dispatcher.handle_raw(&line).await {
            Ok(Some(_)) => handled += 1,
            Ok(None) => {}
            Err(e @ ProviderError::Callback { .. }) => warn!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Input closed after {} events", handled);
    Ok(())
}
