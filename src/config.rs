use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_VOICE_ID: &str = "hpp4J3VqNfWAUOO0d1Us";
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct GeminiConfig {
    /// Checked per request, never at startup.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub voice_id: String,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub gemini: GeminiConfig,
    pub speech: SpeechConfig,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let max_upload_bytes = match non_empty_var("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("Invalid MAX_UPLOAD_BYTES: {}", e)))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            gemini: GeminiConfig {
                api_key: non_empty_var("GEMINI_API_KEY"),
                base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
                model: var_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            },
            speech: SpeechConfig {
                api_key: non_empty_var("ELEVENLABS_API_KEY"),
                base_url: var_or("ELEVENLABS_BASE_URL", DEFAULT_ELEVENLABS_BASE_URL),
                voice_id: var_or("ELEVENLABS_VOICE_ID", DEFAULT_VOICE_ID),
            },
            max_upload_bytes,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}
