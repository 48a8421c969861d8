use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use pico_placa::config::{load_config, ServerConfig};
use pico_placa::net::ProtocolClient;
use pico_placa::observability::logging;
use pico_placa::protocol::decode;

#[derive(Parser)]
#[command(name = "placa-cli")]
#[command(about = "Client for the pico y placa line protocol", long_about = None)]
struct Cli {
    /// Server TOML configuration; supplies the default address and timeout.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server address [default: listener.bind_address]
    #[arg(short, long)]
    addr: Option<String>,

    /// Connect and response timeout in seconds [default: timeouts.connect_secs]
    #[arg(short, long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in (INGRESO)
    Ingreso { user: String, password: String },
    /// Look up the restricted weekday for a plate (CALCULO)
    Calculo {
        first: String,
        second: String,
        plate: String,
    },
    /// Show how many plates this connection has looked up (CONTADOR)
    Contador,
    /// Send a raw request line
    Raw { line: Vec<String> },
    /// Read request lines from stdin and send them over one connection
    Session,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging("warn");
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn client_config(cli: &Cli) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(addr) = &cli.addr {
        config.listener.bind_address = addr.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeouts.connect_secs = secs;
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = client_config(&cli)?;
    let mut client = ProtocolClient::connect_with_config(&config).await?;

    let response = match cli.command {
        Commands::Ingreso { user, password } => client.login(&user, &password).await?,
        Commands::Calculo {
            first,
            second,
            plate,
        } => client.calculate(&first, &second, &plate).await?,
        Commands::Contador => client.count().await?,
        Commands::Raw { line } => client.execute(&decode(&line.join(" "))).await?,
        Commands::Session => {
            let stdin = BufReader::new(tokio::io::stdin());
            client.run_session(stdin, &mut tokio::io::stdout()).await?;
            return Ok(());
        }
    };

    println!("{}", response);
    Ok(())
}
