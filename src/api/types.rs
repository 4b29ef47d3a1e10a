//! Tipos de dados das respostas do serviço de orquestração de testes.
//!
//! Apenas [`ModuleInfo`] é tipado, porque é o único corpo que o cliente
//! interpreta. Os demais (planos, execuções, logs) são devolvidos como
//! `serde_json::Value` sem alteração.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Instantâneo do estado de um módulo, retornado por `GET /api/info/{moduleId}`.
///
/// Campos ausentes ou vazios são tratados como "não informado" pelos
/// acessores [`status`](ModuleInfo::status) e [`result`](ModuleInfo::result).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Etiqueta de ciclo de vida (ex.: "FINISHED", "INTERRUPTED").
    #[serde(default)]
    pub status: Option<String>,
    /// Etiqueta de qualidade do resultado (ex.: "PASSED", "REVIEW").
    #[serde(default)]
    pub result: Option<String>,
    /// Demais campos do corpo, preservados como vieram.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleInfo {
    /// Status não vazio, se houver.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    /// Resultado não vazio, se houver.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref().filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_info_deserialize_from_api_format() {
        let json = r#"{
            "testId": "abc123",
            "testName": "oidcc-server",
            "status": "FINISHED",
            "result": "PASSED"
        }"#;
        let info: ModuleInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.status(), Some("FINISHED"));
        assert_eq!(info.result(), Some("PASSED"));
        assert_eq!(info.extra["testId"], "abc123");
    }

    #[test]
    fn module_info_without_result() {
        let info: ModuleInfo = serde_json::from_str(r#"{"status": "RUNNING"}"#).unwrap();
        assert_eq!(info.status(), Some("RUNNING"));
        assert_eq!(info.result(), None);
    }

    #[test]
    fn module_info_null_and_empty_fields_are_absent() {
        let info: ModuleInfo =
            serde_json::from_str(r#"{"status": "", "result": null}"#).unwrap();
        assert_eq!(info.status(), None);
        assert_eq!(info.result(), None);
    }
}
