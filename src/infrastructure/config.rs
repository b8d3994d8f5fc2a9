use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_days: i64,
    pub upload_dir: PathBuf,
    pub cors_allowed_origins: Vec<String>,
    pub seed_demo: bool,
}

const DEV_JWT_SECRET: &str = "fabulis-dev-secret";

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                DEV_JWT_SECRET.to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://fabulis.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            jwt_secret,
            jwt_ttl_days: env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(7),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }

    /// In-memory configuration for tests and embedded use.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_days: 7,
            upload_dir: env::temp_dir().join("fabulis-test-uploads"),
            cors_allowed_origins: Vec::new(),
            seed_demo: false,
        }
    }
}
