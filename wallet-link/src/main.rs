//! `wallet-link` command line front end

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use wallet_link::core::service::WalletProvider;
use wallet_link::debug;
use wallet_link::services::{
    open_install_page, ApiClient, Browser, FileExporter, LocalWalletProvider, RpcWalletProvider,
    Session,
};
use wallet_link::{LinkConfig, LinkError, LinkEvent, LinkingFlow, LinkingState, WalletAddress};

#[derive(Parser)]
#[command(name = "wallet-link")]
#[command(about = "Link a wallet address to your account", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session token for the settings backend
    #[arg(long, global = true, env = "WALLET_LINK_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log to stderr as well as the log file
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the wallet address linked to the account
    Status,

    /// Generate a custodial address, register it and export its private key
    Create {
        /// Directory receiving the private key file
        #[arg(short, long)]
        export_dir: Option<PathBuf>,
    },

    /// Register an address you already control
    Provide {
        /// 0x-prefixed wallet address
        address: String,
    },

    /// Wait for an external wallet to report its active address, then register it
    Detect {
        /// External wallet JSON-RPC endpoint
        #[arg(long)]
        rpc_url: Option<String>,

        /// Seconds between samples
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Samples taken before giving up
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Check an address without contacting the backend
    Validate {
        /// Candidate address
        address: String,
    },

    /// Open the wallet extension download page
    InstallWallet {
        /// Browser to install into (chrome, firefox, opera, other)
        #[arg(short, long, default_value = "other")]
        browser: Browser,

        /// Print the URL instead of opening it
        #[arg(long)]
        print_only: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut debug_config = debug::DebugConfig::from_env();
    debug_config.log_to_stderr |= cli.verbose;
    debug::init_logger(&debug_config);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), LinkError> {
    match cli.command {
        Commands::Validate { address } => validate(&address),
        Commands::InstallWallet { browser, print_only } => {
            if print_only {
                println!("{}", browser.install_url());
            } else {
                let url = open_install_page(browser)?;
                println!("Opened {}", url);
            }
            Ok(())
        }
        Commands::Status => {
            let config = load_config(cli.api_url, cli.token)?;
            let flow = build_flow(&config, Arc::new(LocalWalletProvider::new())).await?;
            flow.initialize().await?;
            match flow.current_address() {
                Some(address) => {
                    let checksum = address.to_checksum();
                    println!("Linked: {}", shared::truncate_address(&checksum));
                    println!("Address: {}", checksum);
                }
                None => println!("No wallet address linked"),
            }
            Ok(())
        }
        Commands::Create { export_dir } => {
            let mut config = load_config(cli.api_url, cli.token)?;
            if let Some(dir) = export_dir {
                config.export_dir = dir;
            }
            let flow = build_flow(&config, Arc::new(LocalWalletProvider::new())).await?;
            if already_linked(&flow).await? {
                return Ok(());
            }

            let address = flow.create_custodial_address().await?;
            println!("Registered {}", address.to_checksum());

            let location = flow.export_private_key().await?;
            println!("Private key written to {}", location);
            println!("Keep this file safe: it is the only copy of the key.");
            Ok(())
        }
        Commands::Provide { address } => {
            let config = load_config(cli.api_url, cli.token)?;
            let flow = build_flow(&config, Arc::new(LocalWalletProvider::new())).await?;
            flow.initialize().await?;

            flow.set_address_input(address.trim());
            let linked = flow.submit_provided_address().await?;
            println!("Linked: {}", linked.to_checksum());
            Ok(())
        }
        Commands::Detect {
            rpc_url,
            interval_secs,
            max_attempts,
        } => {
            let mut config = load_config(cli.api_url, cli.token)?;
            if let Some(url) = rpc_url {
                config.provider_rpc_url = url;
            }
            if let Some(secs) = interval_secs {
                config.poll_interval = std::time::Duration::from_secs(secs);
            }
            if let Some(attempts) = max_attempts {
                config.max_poll_attempts = attempts;
            }
            config.validate()?;

            let provider = RpcWalletProvider::new(&config.provider_rpc_url, config.request_timeout)?;
            let flow = build_flow(&config, Arc::new(provider)).await?;
            if already_linked(&flow).await? {
                return Ok(());
            }
            detect(&flow, &config).await
        }
    }
}

fn validate(candidate: &str) -> Result<(), LinkError> {
    if candidate.is_empty() {
        return Err(LinkError::FormatInvalid("Wallet address is required".to_string()));
    }
    LinkingFlow::validate_address_format(candidate)?;
    let address = WalletAddress::parse(candidate)?;
    println!("Valid: {}", address.to_checksum());
    Ok(())
}

fn load_config(api_url: Option<String>, token: Option<String>) -> Result<LinkConfig, LinkError> {
    let mut config = LinkConfig::from_env()?;
    if let Some(url) = api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if token.is_some() {
        config.api_token = token;
    }
    config.validate()?;
    Ok(config)
}

async fn build_flow(
    config: &LinkConfig,
    provider: Arc<dyn WalletProvider>,
) -> Result<LinkingFlow, LinkError> {
    let api = Arc::new(ApiClient::new(config)?);

    let session = match Session::from_api(&api).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Session unavailable, relying on wallet settings");
            Session::default()
        }
    };

    Ok(LinkingFlow::new(
        config.clone(),
        provider,
        api,
        Arc::new(session),
        Arc::new(FileExporter::new(&config.export_dir)),
    ))
}

async fn already_linked(flow: &LinkingFlow) -> Result<bool, LinkError> {
    flow.initialize().await?;
    if let Some(address) = flow.current_address() {
        println!("Already linked: {}", address.to_checksum());
        return Ok(true);
    }
    Ok(false)
}

/// Run external detection until it links, gives up or is interrupted
async fn detect(flow: &LinkingFlow, config: &LinkConfig) -> Result<(), LinkError> {
    let events = flow.subscribe();
    flow.begin_external_detection().await?;

    println!(
        "Waiting for your wallet at {} (up to {}s). Unlock it or switch accounts to continue.",
        config.provider_rpc_url,
        config.max_detection_time().as_secs()
    );

    loop {
        tokio::select! {
            event = events.recv() => {
                let Ok(event) = event else { break };
                let now = chrono::Local::now().format("%H:%M:%S");
                match event {
                    LinkEvent::AddressSetupComplete(address) => {
                        println!("[{}] Linked: {}", now, address.to_checksum());
                        return Ok(());
                    }
                    LinkEvent::Toast(message) => {
                        eprintln!("[{}] {}", now, message);
                    }
                    LinkEvent::StateChanged(LinkingState::AwaitingAddress) => {
                        return Err(LinkError::State("External wallet detection stopped".to_string()));
                    }
                    LinkEvent::StateChanged(state) => info!(state = %state, "Flow state changed"),
                    LinkEvent::ExternalProviderDetected(_) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                flow.teardown();
                return Err(LinkError::State("Detection interrupted".to_string()));
            }
        }
    }

    Err(LinkError::State("Flow closed before an address was linked".to_string()))
}
