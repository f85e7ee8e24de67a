use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CONTACT_EMAIL: &str = "speakers@example.org";

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub bind_addr: String,
    pub data_dir: PathBuf,
    /// Address offered in the email fallback when submission fails.
    pub contact_email: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Community Meetup".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(name) = lookup("CFP_APP_NAME").filter(|v| !v.trim().is_empty()) {
            config.app_name = name;
        }
        if let Some(addr) = lookup("CFP_BIND_ADDR").filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr;
        }
        if let Some(dir) = lookup("CFP_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(email) = lookup("CFP_CONTACT_EMAIL").filter(|v| !v.trim().is_empty()) {
            config.contact_email = email;
        }
        config
    }

    pub fn submissions_dir(&self) -> PathBuf {
        self.data_dir.join("submissions")
    }
}
