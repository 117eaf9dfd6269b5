use anyhow::{Context, Result, anyhow};

pub const DEFAULT_OTEL_ENDPOINT: &str = "http://otel-collector:4317";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub grpc_port: u16,
    pub metric_port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub product: ServiceConfig,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub otel_endpoint: String,
    pub dev_mode: bool,
    pub enable_file_log: bool,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).with_context(|| format!("Missing environment variable: {key}"))
        };

        let database_url = required("DATABASE_URL")?;

        let db_max_conn: u32 = lookup("DB_MAX_CONNECTION")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn: u32 = lookup("DB_MIN_CONNECTION")
            .unwrap_or_else(|| "1".to_string())
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONNECTION ({db_min_conn}) must not exceed DB_MAX_CONNECTION ({db_max_conn})"
            ));
        }

        // product
        let product_grpc_port = required("PRODUCT_GRPC_PORT")?
            .parse::<u16>()
            .context("PRODUCT_GRPC_PORT must be a valid u16 integer")?;

        let product_metric_port = required("PRODUCT_METRIC_PORT")?
            .parse::<u16>()
            .context("PRODUCT_METRIC_PORT must be a valid u16 integer")?;

        let otel_endpoint =
            lookup("OTEL_ENDPOINT").unwrap_or_else(|| DEFAULT_OTEL_ENDPOINT.to_string());

        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
        };

        Ok(Self {
            database_url,
            product: ServiceConfig {
                grpc_port: product_grpc_port,
                metric_port: product_metric_port,
            },
            db_max_conn,
            db_min_conn,
            otel_endpoint,
            dev_mode: flag("DEV_MODE"),
            enable_file_log: flag("ENABLE_FILE_LOG"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://product:secret@db/product"),
        ("PRODUCT_GRPC_PORT", "50052"),
        ("PRODUCT_METRIC_PORT", "8082"),
    ];

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup_from(&BASE)).unwrap();

        assert_eq!(config.product.grpc_port, 50052);
        assert_eq!(config.product.metric_port, 8082);
        assert_eq!(config.db_max_conn, 5);
        assert_eq!(config.db_min_conn, 1);
        assert_eq!(config.otel_endpoint, DEFAULT_OTEL_ENDPOINT);
        assert!(!config.dev_mode);
        assert!(!config.enable_file_log);
    }

    #[test]
    fn reads_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("DB_MAX_CONNECTION", "20"),
            ("DB_MIN_CONNECTION", "2"),
            ("DEV_MODE", "1"),
            ("ENABLE_FILE_LOG", "true"),
            ("OTEL_ENDPOINT", "http://localhost:4317"),
        ]);

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.db_max_conn, 20);
        assert_eq!(config.db_min_conn, 2);
        assert!(config.dev_mode);
        assert!(config.enable_file_log);
        assert_eq!(config.otel_endpoint, "http://localhost:4317");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_lookup(lookup_from(&BASE[1..])).unwrap_err();

        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn rejects_bad_port() {
        let mut pairs = BASE.to_vec();
        pairs[1] = ("PRODUCT_GRPC_PORT", "not-a-port");

        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();

        assert!(err.to_string().contains("PRODUCT_GRPC_PORT"));
    }
}
