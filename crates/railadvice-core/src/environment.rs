pub const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:8000";
pub const PRODUCTION_API_BASE_URL: &str = "https://my-awesome-project-production-a651.up.railway.app";

/// Deployment the client talks to, chosen from the host it runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `localhost` and `127.0.0.1` select the local backend; every other host
    /// selects production.
    pub fn from_host(host: &str) -> Self {
        match host.trim().to_lowercase().as_str() {
            "localhost" | "127.0.0.1" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Environment::Development => "Development",
            Environment::Production => "Production",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Development => DEVELOPMENT_API_BASE_URL,
            Environment::Production => PRODUCTION_API_BASE_URL,
        }
    }
}
