use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests. Paths containing `/fail`
/// answer 500, everything else answers 200.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || handle_client(stream));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn handle_client(mut stream: TcpStream) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut buffer = [0u8; 1024];
    let Ok(read) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(buffer.get(..read).unwrap_or_default());
    let response: &[u8] = if request.starts_with("GET /fail") {
        b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 4\r\nConnection: close\r\n\r\nnope"
    } else {
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
    };
    if stream.write_all(response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run the `surge` binary inside `workdir` with the given environment and
/// capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_surge(workdir: &Path, envs: &[(&str, String)]) -> Result<Output, String> {
    let bin = surge_bin()?;
    let mut command = Command::new(bin);
    command.current_dir(workdir).env("RUST_LOG", "error");
    for key in [
        "URL",
        "REQUESTS",
        "CONCURRENCY",
        "INTERVAL",
        "BURST",
        "MAX_RETRIES",
        "REPEAT_COUNT",
        "REPEAT_DELAY",
        "COMPRESS",
        "LOG_REQUESTS",
        "VERIFY_TLS",
        "REQUEST_TIMEOUT",
        "REPORT_DIR",
        "LOG_DIR",
        "SURGE_CONFIG",
    ] {
        command.env_remove(key);
    }
    for (key, value) in envs {
        command.env(key, value);
    }
    command
        .output()
        .map_err(|err| format!("run surge failed: {}", err))
}

fn surge_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_surge").map_or_else(
        || Err("CARGO_BIN_EXE_surge missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
