//! Scripted server side of a connection.
//!
//! Reads what the client writes and answers with raw lines, so a test can
//! play the server one line at a time.

use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, DuplexStream,
    ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::time::timeout;

type BoxRead = Box<dyn AsyncRead + Unpin + Send>;
type BoxWrite = Box<dyn AsyncWrite + Unpin + Send>;

/// The server end of a client connection.
pub struct ServerPeer {
    reader: BufReader<BoxRead>,
    writer: BufWriter<BoxWrite>,
}

#[allow(dead_code)]
impl ServerPeer {
    /// An in-memory connection. Returns the peer and the client's halves.
    pub fn duplex() -> (Self, ReadHalf<DuplexStream>, WriteHalf<DuplexStream>) {
        let (client_io, server_io) = tokio::io::duplex(8192);
        let (client_read, client_write) = tokio::io::split(client_io);
        let (server_read, server_write) = tokio::io::split(server_io);
        let peer = Self {
            reader: BufReader::new(Box::new(server_read)),
            writer: BufWriter::new(Box::new(server_write)),
        };
        (peer, client_read, client_write)
    }

    /// Wrap an accepted TCP connection.
    pub fn from_tcp(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(Box::new(read_half)),
            writer: BufWriter::new(Box::new(write_half)),
        }
    }

    /// Send a raw IRC line.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive one line from the client, without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive one line with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("client closed the connection");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive one line and check it.
    pub async fn expect(&mut self, expected: &str) -> anyhow::Result<()> {
        let line = self.recv().await?;
        anyhow::ensure!(line == expected, "expected {expected:?}, got {line:?}");
        Ok(())
    }

    /// True if the client writes nothing for `dur`.
    pub async fn is_quiet_for(&mut self, dur: Duration) -> bool {
        self.recv_timeout(dur).await.is_err()
    }
}
