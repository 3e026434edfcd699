use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3:latest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Display language for prompts, advisories and chart defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Korean,
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" => Ok(Self::Korean),
            "en" | "english" => Ok(Self::English),
            other => Err(format!("unsupported language {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub num_predict: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            num_predict: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub ollama_host: String,
    pub model: String,
    pub language: Language,
    pub bind_addr: SocketAddr,
    pub probe_timeout: Duration,
    pub generate_timeout: Duration,
    pub sampling: SamplingParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            language: Language::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            probe_timeout: Duration::from_secs(5),
            generate_timeout: Duration::from_secs(30),
            sampling: SamplingParams::default(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment, falling back to defaults
    /// for unset or empty variables. A `.env` file is loaded first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let ollama_host = non_empty("OLLAMA_HOST")
            .unwrap_or(defaults.ollama_host)
            .trim_end_matches('/')
            .to_owned();
        let model = non_empty("OLLAMA_MODEL").unwrap_or(defaults.model);
        let language = parse_var::<Language>("CHARTBOT_LANGUAGE")?.unwrap_or(defaults.language);
        let bind_addr = parse_var::<SocketAddr>("CHARTBOT_BIND_ADDR")?.unwrap_or(defaults.bind_addr);
        let probe_timeout = parse_var::<u64>("OLLAMA_PROBE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.probe_timeout);
        let generate_timeout = parse_var::<u64>("OLLAMA_GENERATE_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.generate_timeout);
        let sampling = SamplingParams {
            temperature: parse_var::<f32>("OLLAMA_TEMPERATURE")?
                .unwrap_or(defaults.sampling.temperature),
            num_predict: parse_var::<u32>("OLLAMA_NUM_PREDICT")?
                .unwrap_or(defaults.sampling.num_predict),
        };

        Ok(Self {
            ollama_host,
            model,
            language,
            bind_addr,
            probe_timeout,
            generate_timeout,
            sampling,
        })
    }

    pub fn with_ollama_host(mut self, host: impl Into<String>) -> Self {
        self.ollama_host = host.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    let Some(value) = non_empty(name) else {
        return Ok(None);
    };
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_common_codes() {
        assert_eq!("ko".parse::<Language>(), Ok(Language::Korean));
        assert_eq!(" EN ".parse::<Language>(), Ok(Language::English));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn host_override_trims_trailing_slash() {
        let settings = Settings::default().with_ollama_host("http://127.0.0.1:9999/");
        assert_eq!(settings.ollama_host, "http://127.0.0.1:9999");
    }

    #[test]
    fn defaults_match_local_ollama() {
        let settings = Settings::default();
        assert_eq!(settings.ollama_host, DEFAULT_OLLAMA_HOST);
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.probe_timeout, Duration::from_secs(5));
        assert_eq!(settings.generate_timeout, Duration::from_secs(30));
        assert_eq!(settings.sampling.num_predict, 100);
    }
}
