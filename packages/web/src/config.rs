use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub static_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "invalid BIND_ADDR, using {DEFAULT_BIND_ADDR}");
                default_bind_addr()
            }),
            Err(_) => default_bind_addr(),
        };

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        Self {
            bind_addr,
            static_dir,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: "static".to_string(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}
