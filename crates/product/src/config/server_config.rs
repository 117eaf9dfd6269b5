use crate::config::myconfig::Config;
use anyhow::{Context, Result};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub grpc_addr: SocketAddr,
    pub metric_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_config(config: &Config) -> Result<Self> {
        let grpc_addr = format!("0.0.0.0:{}", config.product.grpc_port)
            .parse()
            .context("Invalid gRPC address")?;

        let metric_addr = format!("0.0.0.0:{}", config.product.metric_port)
            .parse()
            .context("Invalid metrics address")?;

        Ok(Self {
            database_url: config.database_url.clone(),
            grpc_addr,
            metric_addr,
        })
    }
}
