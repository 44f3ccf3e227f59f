use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

use crate::category::Category;
use crate::estimation::CalorieTable;

#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    S3(S3Config),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub calorie_table: CalorieTable,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            storage: StorageConfig::Memory,
            calorie_table: CalorieTable::default(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage = match var("STORAGE_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => StorageConfig::Memory,
            "s3" | "minio" => StorageConfig::S3(S3Config {
                endpoint: require(&var, "MINIO_ENDPOINT")?,
                bucket: require(&var, "MINIO_BUCKET")?,
                access_key: require(&var, "MINIO_ACCESS_KEY")?,
                secret_key: require(&var, "MINIO_SECRET_KEY")?,
                region: var("MINIO_REGION").unwrap_or_else(|| "us-east-1".into()),
            }),
            other => anyhow::bail!("unsupported STORAGE_BACKEND {other:?}"),
        };

        let mut calorie_table = match var("CALORIE_TABLE_PATH") {
            Some(path) => load_calorie_table(&path)?,
            None => CalorieTable::default(),
        };
        for (key, category) in [
            ("DEFAULT_DISH_CALORIES", Category::Dish),
            ("DEFAULT_DRINK_CALORIES", Category::Drink),
        ] {
            if let Some(kcal) = parse_var::<u32, _>(&var, key)? {
                calorie_table
                    .set_default(category, kcal)
                    .with_context(|| format!("invalid {key}"))?;
            }
        }

        Ok(Self {
            host: var("APP_HOST").unwrap_or(defaults.host),
            port: parse_var(&var, "APP_PORT")?.unwrap_or(defaults.port),
            storage,
            calorie_table,
            max_upload_bytes: parse_var(&var, "MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Reads a JSON calorie table, e.g.
/// `{"dish": {"default_calories": 550, "rules": [{"keywords": ["pizza"], "calories": 850}]}, ...}`.
pub fn load_calorie_table(path: &str) -> anyhow::Result<CalorieTable> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read calorie table {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse calorie table {path}"))
}

fn require<F>(var: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    var(key).with_context(|| format!("{key} must be set"))
}

fn parse_var<T, F>(var: &F, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("invalid {key}"))
}
