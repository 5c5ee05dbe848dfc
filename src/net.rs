//! Network helpers for advertising the server on the LAN.
//!
//! Display-only: nothing here decides what address the server binds to.

use std::net::TcpListener;

/// Best-effort primary local IP.
pub fn local_ip() -> String {
    match local_ip_address::local_ip() {
        Ok(ip) => ip.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine local IP, using 127.0.0.1");
            "127.0.0.1".to_string()
        }
    }
}

/// Find a free TCP port, checking up to `attempts` ports from `start`.
pub fn find_free_port(start: u16, attempts: u16) -> Option<u16> {
    (0..attempts)
        .map(|i| start.saturating_add(i))
        .find(|&port| TcpListener::bind(("0.0.0.0", port)).is_ok())
}
