//! Network module.
//!
//! Contains dialing, the per-connection [`Session`] (read and write loops),
//! and outbound flood control.

mod session;
mod throttle;

pub use session::{ClientCommand, Session};
pub use throttle::Throttle;

use crate::config::ServerConfig;
use crate::error::ConnectionError;
use tokio::net::TcpStream;
use tracing::info;

/// Open a TCP connection to the configured server, bounded by its connect
/// timeout.
pub async fn dial(config: &ServerConfig) -> Result<TcpStream, ConnectionError> {
    let addr = config.address();
    info!(addr = %addr, "Connecting");
    match tokio::time::timeout(config.connect_timeout(), TcpStream::connect(&addr)).await {
        Ok(Ok(stream)) => {
            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!(error = %e, "Could not set TCP_NODELAY");
            }
            info!(addr = %addr, "Connected");
            Ok(stream)
        }
        Ok(Err(e)) => Err(ConnectionError::Io(e)),
        Err(_) => Err(ConnectionError::Timeout(addr)),
    }
}
