use std::env;
use std::str::FromStr;

use crate::features::categories::models::DeletePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub category_store: CategoryStoreConfig,
    pub category_tree: CategoryTreeConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Which category store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Remote JSON CRUD service
    Http,
    /// Process-local store, for development
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(StoreBackend::Http),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "CATEGORY_STORE_BACKEND must be 'http' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Remote category store connection settings
#[derive(Debug, Clone)]
pub struct CategoryStoreConfig {
    pub backend: StoreBackend,
    /// Base URL; `/categories` is appended
    pub base_url: String,
    /// Bearer token sent with every store request (optional)
    pub api_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// JSON file of category records loaded into the memory backend at startup
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryTreeConfig {
    pub delete_policy: DeletePolicy,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            category_store: CategoryStoreConfig::from_env()?,
            category_tree: CategoryTreeConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl CategoryStoreConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let backend = env::var("CATEGORY_STORE_BACKEND")
            .unwrap_or_else(|_| "http".to_string())
            .parse::<StoreBackend>()?;

        let base_url = match backend {
            StoreBackend::Http => env::var("CATEGORY_STORE_URL").map_err(|_| {
                "CATEGORY_STORE_URL must be set when CATEGORY_STORE_BACKEND=http".to_string()
            })?,
            StoreBackend::Memory => env::var("CATEGORY_STORE_URL").unwrap_or_default(),
        };

        // Only use the token if it is non-empty
        let api_token = env::var("CATEGORY_STORE_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());

        let timeout_secs = env::var("CATEGORY_STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CATEGORY_STORE_TIMEOUT_SECS must be a valid number".to_string())?;

        let seed_path = env::var("CATEGORY_STORE_SEED")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            backend,
            base_url,
            api_token,
            timeout_secs,
            seed_path,
        })
    }
}

impl CategoryTreeConfig {
    pub fn from_env() -> Result<Self, String> {
        let delete_policy = match env::var("CATEGORY_DELETE_POLICY") {
            Ok(value) => value.parse::<DeletePolicy>()?,
            Err(_) => DeletePolicy::default(),
        };

        Ok(Self { delete_policy })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Portfolio Core API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Category tree management for the portfolio dashboard".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
