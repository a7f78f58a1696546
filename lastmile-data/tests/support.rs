//! One-shot HTTP server for exercising the order store end to end.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// A server that answers exactly one request with a canned response.
pub struct OneShotServer {
    /// Base URL clients should use.
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl OneShotServer {
    /// Start serving `status` (e.g. `"200 OK"`) with a JSON `body`.
    pub fn start(status: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind test server: {err}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("test server has no address: {err}"));
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener
                .accept()
                .unwrap_or_else(|err| panic!("test server failed to accept: {err}"));
            let mut reader = BufReader::new(stream);
            let mut head = String::new();
            loop {
                let mut line = String::new();
                let read = reader
                    .read_line(&mut line)
                    .unwrap_or_else(|err| panic!("test server failed to read: {err}"));
                if read == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            reader
                .get_mut()
                .write_all(response.as_bytes())
                .unwrap_or_else(|err| panic!("test server failed to respond: {err}"));
            head
        });
        Self {
            base_url: format!("http://{address}"),
            handle,
        }
    }

    /// Wait for the request and return its request line and headers.
    pub fn request_head(self) -> String {
        self.handle
            .join()
            .unwrap_or_else(|_| panic!("test server thread panicked"))
    }
}
