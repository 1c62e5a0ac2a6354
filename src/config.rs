use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub models_dir: PathBuf,
    pub cors_origins: Option<String>,
    pub max_batch: usize,
    /// Predict requests allowed per minute, across all clients.
    pub predict_rate_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            models_dir: PathBuf::from("./models"),
            cors_origins: None,
            max_batch: 16,
            predict_rate_limit: 600,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = parse_var("PORT", defaults.port);

        let models_dir = std::env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.models_dir);

        let cors_origins = std::env::var("CORS_ORIGINS").ok();

        let max_batch = match parse_var("MAX_BATCH", defaults.max_batch) {
            0 => {
                warn!("[video-likes] MAX_BATCH must be positive, defaulting to {}", defaults.max_batch);
                defaults.max_batch
            }
            n => n,
        };

        let predict_rate_limit = match parse_var("PREDICT_RATE_LIMIT", defaults.predict_rate_limit) {
            0 => {
                warn!(
                    "[video-likes] PREDICT_RATE_LIMIT must be positive, defaulting to {}",
                    defaults.predict_rate_limit
                );
                defaults.predict_rate_limit
            }
            n => n,
        };

        Self {
            port,
            models_dir,
            cors_origins,
            max_batch,
            predict_rate_limit,
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("[video-likes] Invalid {} value {:?}, defaulting to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
