//! slirc - Straylight IRC client.
//!
//! A small console client: connects, keeps the state tracker in sync and
//! forwards console input. Reconnects when the connection drops.

use slirc_client::config::Config;
use slirc_client::console::{self, ConsoleInput};
use slirc_client::handlers::CONNECTED;
use slirc_client::network::{self, ClientCommand, Session, Throttle};
use slirc_client::{Client, ConnectionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONSOLE_QUEUE: usize = 16;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "client.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.address(),
        nick = %config.identity.nick,
        "Starting slirc"
    );

    let mut client = Client::new(config.identity.to_identity())
        .with_casemapping(config.identity.casemapping.into())
        .with_ctcp_version(config.ctcp.version.clone());

    let autojoin = config.channels.autojoin.clone();
    client.register(CONNECTED, move |client, _| {
        for channel in &autojoin {
            client.join(channel, None);
        }
        Ok(())
    });

    let mut console = spawn_console();
    let mut quitting = false;

    loop {
        match network::dial(&config.server).await {
            Ok(stream) => {
                client.login(config.server.password.as_deref());
                let session = Session::connect(stream, client, Throttle::from_config(&config.flood));
                let (returned, reason) = run_session(session, &mut console, &mut quitting).await?;
                client = returned;
                if let Some(e) = reason {
                    warn!(error = %e, code = e.error_code(), "Disconnected");
                }
            }
            Err(e) => error!(error = %e, code = e.error_code(), "Connection failed"),
        }

        if quitting || !config.reconnect.enabled {
            break;
        }

        info!(delay_secs = config.reconnect.delay_secs, "Reconnecting");
        tokio::select! {
            _ = tokio::time::sleep(config.reconnect.delay()) => {}
            Some(ConsoleInput::Quit(_)) = console.recv() => break,
        }
        client.reset();
    }

    info!("Shutting down");
    Ok(())
}

/// Forward console input until the session reports why it ended, then take
/// the client back.
async fn run_session(
    mut session: Session,
    console: &mut mpsc::Receiver<ConsoleInput>,
    quitting: &mut bool,
) -> anyhow::Result<(Client, Option<ConnectionError>)> {
    let mut console_open = true;
    let reason = loop {
        tokio::select! {
            reason = session.errors.recv() => break reason,
            input = console.recv(), if console_open => match input {
                Some(input) => {
                    if matches!(input, ConsoleInput::Quit(_)) {
                        *quitting = true;
                    }
                    forward(&session.commands, input).await;
                }
                None => {
                    // stdin closed: leave politely.
                    console_open = false;
                    *quitting = true;
                    let _ = session.commands.send(ClientCommand::Quit(None)).await;
                }
            },
        }
    };
    let client = session.finish().await?;
    Ok((client, reason))
}

async fn forward(commands: &mpsc::Sender<ClientCommand>, input: ConsoleInput) {
    if input == ConsoleInput::Dump {
        let (tx, rx) = oneshot::channel();
        if commands.send(ClientCommand::Dump(tx)).await.is_ok() {
            if let Ok(dump) = rx.await {
                println!("{dump}");
            }
        }
        return;
    }
    if let Some(command) = input.into_command() {
        if commands.send(command).await.is_err() {
            warn!("Connection is closing; console input dropped");
        }
    }
}

fn spawn_console() -> mpsc::Receiver<ConsoleInput> {
    let (tx, rx) = mpsc::channel(CONSOLE_QUEUE);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match console::parse(&line) {
                    Ok(Some(input)) => {
                        if tx.send(input).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Bad console input"),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read console");
                    break;
                }
            }
        }
    });
    rx
}
