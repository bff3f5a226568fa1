//! One live connection: a read loop that owns the [`Client`] and a write loop
//! that owns the socket's write half.
//!
//! ```text
//!   socket ──FramedRead──▶ read loop ──outbound mpsc──▶ write loop ──FramedWrite──▶ socket
//!                            ▲   │                         │
//!          commands mpsc ────┘   └──── errors mpsc ◀───────┘
//! ```
//!
//! The read loop is the only task that touches the tracker. It handles one
//! line to completion, then moves whatever the handlers queued onto the
//! outbound channel. Console input arrives as [`ClientCommand`]s and is
//! applied between lines.

use super::throttle::Throttle;
use crate::client::Client;
use crate::error::ConnectionError;
use crate::handlers::DISCONNECTED;
use futures_util::{SinkExt, StreamExt};
use slirc_proto::{LineCodec, Message, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, trace, warn};

const COMMAND_QUEUE: usize = 32;
const OUTBOUND_QUEUE: usize = 256;
const ERROR_QUEUE: usize = 4;

/// Requests from outside the read loop.
#[derive(Debug)]
pub enum ClientCommand {
    Join {
        channel: String,
        key: Option<String>,
    },
    Part {
        channel: String,
        message: Option<String>,
    },
    Quit(Option<String>),
    Privmsg {
        target: String,
        text: String,
    },
    Nick(String),
    Raw(String),
    /// Render the tracker for display.
    Dump(oneshot::Sender<String>),
}

/// Handle to a running connection.
pub struct Session {
    /// Feed commands into the read loop.
    pub commands: mpsc::Sender<ClientCommand>,
    /// Why the connection ended. Every session reports at most one error
    /// per loop.
    pub errors: mpsc::Receiver<ConnectionError>,
    reader: JoinHandle<Client>,
    writer: JoinHandle<()>,
}

impl Session {
    /// Start both loops over an established TCP connection.
    pub fn connect(stream: TcpStream, client: Client, throttle: Throttle) -> Self {
        let (reader, writer) = stream.into_split();
        Self::spawn(reader, writer, client, throttle)
    }

    /// Start both loops over any byte stream halves.
    ///
    /// Anything already queued on `client` (normally the login burst) is
    /// written before the first inbound line is read.
    pub fn spawn<R, W>(reader: R, writer: W, client: Client, throttle: Throttle) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (out_tx, out_rx) = mpsc::channel(OUTBOUND_QUEUE);
        let (error_tx, error_rx) = mpsc::channel(ERROR_QUEUE);

        let writer = tokio::spawn(write_loop(writer, out_rx, throttle, error_tx.clone()));
        let reader = tokio::spawn(read_loop(reader, client, command_rx, out_tx, error_tx));

        Self {
            commands: command_tx,
            errors: error_rx,
            reader,
            writer,
        }
    }

    /// Wait for the read loop to end and take the client back.
    ///
    /// The write loop is given the chance to flush what it still holds.
    pub async fn finish(self) -> Result<Client, JoinError> {
        let client = self.reader.await?;
        if let Err(e) = self.writer.await {
            warn!(error = %e, "Write loop did not exit cleanly");
        }
        Ok(client)
    }
}

async fn read_loop<R>(
    reader: R,
    mut client: Client,
    mut commands: mpsc::Receiver<ClientCommand>,
    out: mpsc::Sender<Message>,
    errors: mpsc::Sender<ConnectionError>,
) -> Client
where
    R: AsyncRead + Unpin,
{
    let mut lines = FramedRead::new(reader, LineCodec::new());

    let reason = 'session: {
        if !flush(&mut client, &out).await {
            break 'session None;
        }
        loop {
            tokio::select! {
                line = lines.next() => match line {
                    Some(Ok(Ok(line))) => {
                        // Unparseable lines are logged by the client and dropped.
                        let _ = client.handle_line(&line);
                    }
                    Some(Ok(Err(e))) | Some(Err(e)) if e.is_line_local() => {
                        warn!(error = %e, "Dropping inbound line");
                    }
                    Some(Ok(Err(e))) | Some(Err(e)) => {
                        break 'session Some(ConnectionError::from(e))
                    }
                    None => break 'session Some(ConnectionError::Closed),
                },
                Some(command) = commands.recv() => apply(&mut client, command),
            }
            if !flush(&mut client, &out).await {
                // The write loop has gone away and reported why.
                break 'session None;
            }
        }
    };

    match &reason {
        Some(e) => info!(error = %e, code = e.error_code(), "Connection lost"),
        None => info!("Connection lost: write side closed"),
    }

    let note = reason.as_ref().map(ToString::to_string).unwrap_or_default();
    client.dispatch(DISCONNECTED, &Message::new(DISCONNECTED, [note]));
    let dropped = client.take_outgoing().len();
    if dropped > 0 {
        debug!(count = dropped, "Discarding lines queued after disconnect");
    }

    if let Some(e) = reason {
        let _ = errors.send(e).await;
    }
    client
}

/// Move queued lines to the write loop. `false` once the write loop is gone.
async fn flush(client: &mut Client, out: &mpsc::Sender<Message>) -> bool {
    for msg in client.take_outgoing() {
        if out.send(msg).await.is_err() {
            return false;
        }
    }
    true
}

fn apply(client: &mut Client, command: ClientCommand) {
    debug!(?command, "Console command");
    match command {
        ClientCommand::Join { channel, key } => client.join(&channel, key.as_deref()),
        ClientCommand::Part { channel, message } => client.part(&channel, message.as_deref()),
        ClientCommand::Quit(message) => client.quit(message.as_deref()),
        ClientCommand::Privmsg { target, text } => client.privmsg(&target, &text),
        ClientCommand::Nick(nick) => client.nick(&nick),
        ClientCommand::Raw(line) => {
            if let Err(e) = client.raw(&line) {
                warn!(line = %line, error = %e, "Refusing to send raw line");
            }
        }
        ClientCommand::Dump(reply) => {
            let _ = reply.send(client.tracker().to_string());
        }
    }
}

async fn write_loop<W>(
    writer: W,
    mut outbound: mpsc::Receiver<Message>,
    throttle: Throttle,
    errors: mpsc::Sender<ConnectionError>,
) where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, LineCodec::new());

    while let Some(msg) = outbound.recv().await {
        if !throttle.try_take() {
            trace!("Flood control holding line");
            throttle.ready().await;
        }
        trace!(line = %msg, ">>");
        match sink.send(msg).await {
            Ok(()) => {}
            Err(ProtocolError::Io(e)) => {
                let _ = errors.send(ConnectionError::Io(e)).await;
                return;
            }
            // A line the codec refuses is dropped; the connection is fine.
            Err(e) => warn!(error = %e, "Dropping unencodable line"),
        }
    }

    if let Err(e) = SinkExt::<Message>::close(&mut sink).await {
        debug!(error = %e, "Error closing write half");
    }
}
