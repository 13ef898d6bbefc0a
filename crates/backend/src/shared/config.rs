use chrono::FixedOffset;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Адрес Coupang Open API, без завершающего слэша
    pub base_url: String,
    pub timeout_secs: u64,
    /// Пауза между последовательными запросами (недокументированный rate limit)
    pub request_delay_ms: u64,
    /// Файл для журнала запросов к шлюзу; не задан — журнал не пишется
    #[serde(default)]
    pub request_log: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PresentationConfig {
    /// Смещение часового пояса для поля "조회일시" (KST = +9)
    pub utc_offset_hours: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionsConfig {
    /// Сколько минут хранить завершенную фоновую сессию вместе с результатами
    pub retention_minutes: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            retention_minutes: 60,
        }
    }
}

impl SessionsConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Фильтр tracing по умолчанию; RUST_LOG имеет приоритет
    pub filter: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[gateway]
base_url = "https://api-gateway.coupang.com"
timeout_secs = 30
request_delay_ms = 500
request_log = "coupang_api_requests.log"

[presentation]
utc_offset_hours = 9

[sessions]
retention_minutes = 60

[logging]
filter = "info,hyper=warn,reqwest=warn"
"#;

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Путь к журналу запросов (относительный — рядом с исполняемым файлом)
    pub fn request_log_path(&self) -> Option<PathBuf> {
        self.request_log.as_deref().map(resolve_path)
    }
}

impl PresentationConfig {
    pub fn offset(&self) -> anyhow::Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                anyhow::anyhow!("utc_offset_hours out of range: {}", self.utc_offset_hours)
            })
    }
}

/// Откуда взята конфигурация. Логируется после инициализации tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded { missing: Option<PathBuf> },
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                tracing::info!("Loading config from: {}", path.display());
            }
            ConfigSource::Embedded { missing } => {
                if let Some(path) = missing {
                    tracing::warn!("config.toml not found at: {}", path.display());
                }
                tracing::info!("Using default embedded configuration");
            }
        }
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// The PORT environment variable overrides `server.port` in both cases.
pub fn load_config() -> anyhow::Result<(Config, ConfigSource)> {
    let expected = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("config.toml")));

    let (mut config, source) = match expected {
        Some(path) if path.exists() => {
            let contents = std::fs::read_to_string(&path)?;
            (parse_config(&contents)?, ConfigSource::File(path))
        }
        missing => (
            parse_config(DEFAULT_CONFIG)?,
            ConfigSource::Embedded { missing },
        ),
    };

    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid PORT value '{}': {}", port, e))?;
    }

    Ok((config, source))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    // Проверяем смещение сразу, а не при первом запросе
    config.presentation.offset()?;
    Ok(config)
}

pub fn default_config() -> anyhow::Result<Config> {
    parse_config(DEFAULT_CONFIG)
}

/// Resolves relative paths relative to the executable directory
fn resolve_path(path: &str) -> PathBuf {
    let candidate = PathBuf::from(path);
    if candidate.is_absolute() {
        return candidate;
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(candidate);
        }
    }
    candidate
}
