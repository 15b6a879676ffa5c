use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use simplechat::console::{ConsoleExit, RoleKind};
use simplechat::logging::LogTarget;
use simplechat::{
    parse_server_args, Config, DisplaySink, ServerConsole, Session, StdoutDisplay, TcpChatServer,
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

    if simplechat::logging::init(&config.logging, RoleKind::Server) == LogTarget::Stderr {
        eprintln!("Logging to stderr; the log directory is not writable.");
    }

    let args = parse_server_args(std::env::args().skip(1), &config.server);
    if let Some(warning) = &args.warning {
        println!("{warning}");
    }

    let display: Arc<dyn DisplaySink> = Arc::new(StdoutDisplay);
    let endpoint = match TcpChatServer::new(
        &config.server.host,
        args.port,
        config.server.max_connections,
        Arc::clone(&display),
    ) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("Failed to set up server endpoint: {}", e);
            println!("Error: Can't setup server! Terminating.");
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Chat server configured on {}:{} (max {} connections)",
        config.server.host, args.port, config.server.max_connections
    );

    let session = Session::server(config.server.host.clone(), args.port);
    let mut console = ServerConsole::new(session, Box::new(endpoint), display);
    console.listen_on_startup();

    match console.run(std::io::stdin().lock()) {
        ConsoleExit::InputError => ExitCode::FAILURE,
        ConsoleExit::Quit | ConsoleExit::EndOfInput => ExitCode::SUCCESS,
    }
}
