use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use crate::data::registry::DataRegistry;
use crate::selection::SelectionState;

pub mod api;
pub mod routes;
pub mod static_files;

/// Shared server state: the read-only registry plus the selection.
///
/// The selection is one process-wide instance behind a mutex, which is
/// read-your-own-write correct for a single-user deployment only; serving
/// multiple users from one process would need a per-session instance.
pub struct ServerState {
    pub registry: Arc<DataRegistry>,
    pub selection: Mutex<SelectionState>,
}

impl ServerState {
    pub fn new(registry: Arc<DataRegistry>) -> Self {
        ServerState {
            registry,
            selection: Mutex::new(SelectionState::new()),
        }
    }
}

pub fn run_server(bind_addr: &str, state: &ServerState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    println!("boletim server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, state) {
                    eprintln!("request error: {err}");
                }
            }
            Err(err) => eprintln!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, state: &ServerState) -> std::io::Result<()> {
    let mut buffer = [0_u8; 16_384];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let body = request
        .split("\r\n\r\n")
        .nth(1)
        .or_else(|| request.split("\n\n").nth(1))
        .unwrap_or("");

    let response = routes::route_request(method, path, body, state).to_http_string();
    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}
