//! Configuração do cliente, construída explicitamente pelo chamador ou
//! carregada de um arquivo TOML.
//!
//! A struct [`ClientConfig`] é imutável depois de construída e é passada
//! ao [`ConformanceClient`](crate::ConformanceClient). Nenhuma variável de
//! ambiente é lida aqui; quem embute a biblioteca decide de onde vêm a URL
//! e o token.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConformanceError, Result, require};
use crate::poller::WaitOptions;

/// Configuração de nível superior do cliente.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// URL base do serviço (ex.: `https://suite.example.com`).
    pub base_url: String,

    /// Token enviado como `authorization: Bearer <token>` quando presente.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Parâmetros padrão de espera usados por [`ClientConfig::wait_options`].
    #[serde(default)]
    pub wait: WaitDefaults,
}

/// Intervalo e limite padrão para as sessões de espera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WaitDefaults {
    /// Intervalo entre consultas, em milissegundos.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Tempo máximo total de espera, em milissegundos.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

// Valor padrão do intervalo: 2s.
fn default_interval_ms() -> u64 {
    2_000
}

// Valor padrão do limite: 4min.
fn default_timeout_ms() -> u64 {
    240_000
}

impl Default for WaitDefaults {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ClientConfig {
    /// Cria uma configuração sem token, com os padrões de espera.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            wait: WaitDefaults::default(),
        }
    }

    /// Define o token bearer. Um token vazio equivale a nenhum token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_wait_defaults(mut self, wait: WaitDefaults) -> Self {
        self.wait = wait;
        self
    }

    /// Interpreta uma configuração a partir de texto TOML e a valida.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config = toml::from_str::<ClientConfig>(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Carrega a configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConformanceError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Rejeita uma URL base vazia e padrões de espera sem sentido.
    pub fn validate(&self) -> Result<()> {
        require(&self.base_url, "baseUrl")?;
        if self.wait.interval_ms == 0 {
            return Err(ConformanceError::Config(
                "wait.interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Opções de espera derivadas de [`WaitDefaults`], com os conjuntos
    /// padrão de estados e resultados.
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::default()
            .with_interval(Duration::from_millis(self.wait.interval_ms))
            .with_timeout(Duration::from_millis(self.wait.timeout_ms))
    }
}
