use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Parser)]
#[command(name = "server")]
#[command(about = "REST API over users, packets and categories", long_about = None)]
pub struct ServerConfig {
    // Not plain HOST: some shells export it as the machine's hostname
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0", help = "Address to bind")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = 4000, help = "Port to listen on")]
    pub port: u16,

    #[arg(
        short,
        long,
        env = "DATA_DIR",
        help = "Directory holding the JSON collections; in-memory when omitted"
    )]
    pub data_dir: Option<PathBuf>,

    #[arg(
        long,
        env = "CORS_ORIGIN",
        default_value = "http://localhost:4200",
        help = "Allowed browser origin, or * for any"
    )]
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_layer(&self) -> Result<CorsLayer> {
        if self.cors_origin == "*" {
            return Ok(CorsLayer::permissive());
        }

        let origin: HeaderValue = self
            .cors_origin
            .parse()
            .with_context(|| format!("Invalid CORS origin {}", self.cors_origin))?;

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}
