//! Logger module
//!
//! Console logging for the server:
//! - Startup banner on stdout
//! - Optional per-request access log on stdout
//! - Shutdown notices, errors and warnings on stderr

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// Where a log line goes; stdout carries only the banner and access log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

fn write(stream: Stream, message: &str) {
    match stream {
        Stream::Stdout => println!("{message}"),
        Stream::Stderr => eprintln!("{message}"),
    }
}

fn write_info(message: &str) {
    write(Stream::Stdout, message);
}

fn write_error(message: &str) {
    write(Stream::Stderr, message);
}

fn shutdown_line(signal: &str) -> (Stream, String) {
    (Stream::Stderr, format!("[INFO] {signal} received, closing listener"))
}

/// The one line printed once the listener is bound
pub fn startup_banner(addr: &SocketAddr) -> String {
    format!("Server running at http://localhost:{}", addr.port())
}

pub fn log_server_start(addr: &SocketAddr) {
    write_info(&startup_banner(addr));
}

pub fn log_shutdown(signal: &str) {
    let (stream, line) = shutdown_line(signal);
    write(stream, &line);
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    log_error(&format!("Failed to bind {addr}: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_banner() {
        let addr: SocketAddr = "0.0.0.0:8002".parse().unwrap();
        assert_eq!(startup_banner(&addr), "Server running at http://localhost:8002");

        let addr: SocketAddr = "[::]:3000".parse().unwrap();
        assert_eq!(startup_banner(&addr), "Server running at http://localhost:3000");
    }

    #[test]
    fn test_shutdown_notice_kept_off_stdout() {
        let (stream, line) = shutdown_line("SIGINT");
        assert_eq!(stream, Stream::Stderr);
        assert_eq!(line, "[INFO] SIGINT received, closing listener");
    }
}
