//! Network transport for remote tracing
//!
//! Each record is delivered over its own TCP connection to `host:port`, one
//! newline-terminated line per connection. The socket is driven directly; no
//! shell or external command is involved, so record contents are never
//! interpreted.

use crate::core::{Result, TraceError, Transport};
use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Default connect and write timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Network transport that connects to a TCP endpoint per record
///
/// # Example
///
/// ```no_run
/// use utrace::transports::NetworkTransport;
/// use utrace::Transport;
///
/// let mut transport = NetworkTransport::new("127.0.0.1", 9000);
/// transport.write("ERROR: disk full").expect("log server unreachable");
/// ```
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    host: String,
    port: u16,
    timeout: Duration,
}

impl NetworkTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the connect and write timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `host:port` destination string
    pub fn destination(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn connect(&self) -> Result<TcpStream> {
        let destination = self.destination();
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| {
                TraceError::io_operation("resolving trace destination", destination.clone(), e)
            })?
            .collect();

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(self.timeout))?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(match last_err {
            Some(e) => TraceError::io_operation("connecting to trace destination", destination, e),
            None => TraceError::transport("tcp", destination, "host resolved to no addresses"),
        })
    }
}

impl Transport for NetworkTransport {
    fn write(&mut self, record: &str) -> Result<()> {
        let mut line = Vec::with_capacity(record.len() + 1);
        line.extend_from_slice(record.as_bytes());
        line.push(b'\n');

        let mut stream = self.connect()?;
        stream.write_all(&line).map_err(|e| {
            TraceError::io_operation("sending trace record", self.destination(), e)
        })?;
        stream.flush()?;
        // Peer may already have closed its end
        let _ = stream.shutdown(Shutdown::Write);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "tcp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_record_delivered_as_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut received = String::new();
            socket.read_to_string(&mut received).unwrap();
            received
        });

        let mut transport = NetworkTransport::new("127.0.0.1", port);
        transport.write("ERROR: hello").unwrap();

        assert_eq!(server.join().unwrap(), "ERROR: hello\n");
    }

    #[test]
    fn test_shell_metacharacters_are_plain_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut received = String::new();
            socket.read_to_string(&mut received).unwrap();
            received
        });

        let record = "INFO: '; rm -rf / #$(whoami) `id`";
        let mut transport = NetworkTransport::new("127.0.0.1", port);
        transport.write(record).unwrap();

        assert_eq!(server.join().unwrap(), format!("{}\n", record));
    }

    #[test]
    fn test_unreachable_destination_is_an_error() {
        // Bind then drop to obtain a port with no listener
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut transport =
            NetworkTransport::new("127.0.0.1", port).with_timeout(Duration::from_millis(200));
        assert!(transport.write("INFO: lost").is_err());
    }

    #[test]
    fn test_destination() {
        let transport = NetworkTransport::new("logs.example.org", 514);
        assert_eq!(transport.destination(), "logs.example.org:514");
        assert_eq!(transport.name(), "tcp");
    }
}
