use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use simplechat::console::{ConsoleExit, RoleKind};
use simplechat::logging::LogTarget;
use simplechat::{
    parse_client_args, ClientConsole, Config, DisplaySink, Session, StdoutDisplay, TcpChatClient,
};

fn config_path() -> String {
    std::env::var("SIMPLECHAT_CONFIG").unwrap_or_else(|_| "simplechat.toml".to_string())
}

fn main() -> ExitCode {
    let path = config_path();
    let config = match Config::load_or_default(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    if simplechat::logging::init(&config.logging, RoleKind::Client) == LogTarget::Stderr {
        eprintln!("Logging to stderr; the log directory is not writable.");
    }

    let args = match parse_client_args(std::env::args().skip(1), &config.client) {
        Ok(args) => args,
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(warning) = &args.warning {
        println!("{warning}");
    }

    let display: Arc<dyn DisplaySink> = Arc::new(StdoutDisplay);
    let endpoint = match TcpChatClient::new(&args.host, args.port, Arc::clone(&display)) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("Failed to set up client endpoint: {}", e);
            println!("Error: Can't setup connection! Terminating client.");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Chat client for {} targeting {}:{}",
        args.login_id, args.host, args.port
    );

    let session = Session::client(args.login_id, args.host, args.port);
    let mut console = ClientConsole::new(session, Box::new(endpoint), display);
    console.connect_on_startup();

    match console.run(std::io::stdin().lock()) {
        ConsoleExit::InputError => ExitCode::FAILURE,
        ConsoleExit::Quit | ConsoleExit::EndOfInput => ExitCode::SUCCESS,
    }
}
