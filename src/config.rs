use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    MongoDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AssistantSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub data_file: PathBuf,
    pub database_url: Option<String>,
    pub jwt: JwtSettings,
    pub assistant: AssistantSettings,
    pub cors_origins: Vec<String>,
}

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parses `name`, falling back to `default` with a warning on bad input
fn parsed_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("⚠️  Invalid {}='{}', using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Reads configuration from the environment (after `dotenv`)
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("⚠️  JWT_SECRET not set, using an insecure development secret");
            "default-secret-change-me".to_string()
        });

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parsed_or("PORT", 3002),
            storage_backend: parsed_or("STORAGE_BACKEND", StorageBackend::File),
            data_file: PathBuf::from(var_or("DATA_FILE", "./data/dues-store.json")),
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            jwt: JwtSettings {
                secret: jwt_secret,
                issuer: var_or("JWT_ISSUER", "dues-service"),
                audience: var_or("JWT_AUDIENCE", "dues-api"),
                ttl_hours: parsed_or("JWT_TTL_HOURS", 24),
            },
            assistant: AssistantSettings {
                api_key: env::var("GEMINI_API_KEY").ok().filter(|v| !v.trim().is_empty()),
                model: var_or("GEMINI_MODEL", "gemini-2.5-flash"),
                base_url: var_or("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com"),
            },
            cors_origins,
        }
    }

    /// In-memory configuration for tests
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            storage_backend: StorageBackend::Memory,
            data_file: PathBuf::from("unused.json"),
            database_url: None,
            jwt: JwtSettings {
                secret: "test-secret".into(),
                issuer: "dues-service".into(),
                audience: "dues-api".into(),
                ttl_hours: 1,
            },
            assistant: AssistantSettings {
                api_key: None,
                model: "gemini-2.5-flash".into(),
                base_url: "http://127.0.0.1:9".into(),
            },
            cors_origins: vec![],
        }
    }
}
