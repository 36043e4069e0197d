//! # Configuração Versionada
//!
//! Léxicos, grupos de padrões e parâmetros de pontuação formam um único valor
//! imutável, construído na inicialização (a partir do padrão embutido ou de um
//! arquivo JSON) e compartilhado por referência entre as requisições.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};
use crate::lexicon::Lexicons;
use crate::pattern::{default_pattern_groups, PatternGroup};

/// Versão da configuração embutida
pub const DEFAULT_CONFIG_VERSION: &str = "2024.1";

/// Parâmetros do pontuador e dos padrões de nome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Confiança fixa de ORG/TITLE (regras curadas)
    pub rule_confidence: f64,
    /// Nomes (PERSON/FULLNAME) abaixo deste valor são rejeitados
    pub min_person_confidence: f64,
    /// Cada token de um FULLNAME precisa ter mais que isso de caracteres
    pub fullname_min_token_len: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rule_confidence: 0.8,
            min_person_confidence: 0.5,
            fullname_min_token_len: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    pub version: String,
    #[serde(default)]
    pub lexicons: Lexicons,
    #[serde(default = "default_pattern_groups")]
    pub patterns: Vec<PatternGroup>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            lexicons: Lexicons::default(),
            patterns: default_pattern_groups(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl CardConfig {
    /// Carrega e valida uma configuração em JSON.
    ///
    /// Campos ausentes (`lexicons`, `patterns`, `scoring`) assumem os valores embutidos.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut config: CardConfig = serde_json::from_str(json)?;
        config.lexicons = config.lexicons.normalized();
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(CardError::Config("versão vazia".into()));
        }
        for (name, value) in [
            ("rule_confidence", self.scoring.rule_confidence),
            ("min_person_confidence", self.scoring.min_person_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CardError::Config(format!("{name} fora de [0, 1]: {value}")));
            }
        }
        for group in &self.patterns {
            if group.patterns.is_empty() {
                return Err(CardError::Config(format!("grupo '{}' sem padrões", group.name)));
            }
            for pattern in &group.patterns {
                if pattern.steps.is_empty() || pattern.steps.len() > 3 {
                    return Err(CardError::Config(format!(
                        "padrão '{}' deve ter de 1 a 3 passos (tem {})",
                        pattern.name,
                        pattern.steps.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.version, DEFAULT_CONFIG_VERSION);
    }

    #[test]
    fn test_default_config_survives_json() {
        let config = CardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded = CardConfig::from_json_str(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "version": "custom-1",
            "scoring": { "min_person_confidence": 0.7 }
        }"#;
        let config = CardConfig::from_json_str(json).unwrap();
        assert_eq!(config.version, "custom-1");
        assert_eq!(config.scoring.min_person_confidence, 0.7);
        assert_eq!(config.scoring.rule_confidence, 0.8);
        assert_eq!(config.patterns, default_pattern_groups());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = CardConfig::from_json_str(r#"{"version": " "}"#).unwrap_err();
        assert!(matches!(err, CardError::Config(_)));

        let err = CardConfig::from_json_str(
            r#"{"version": "x", "scoring": {"rule_confidence": 1.5}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CardError::Config(_)));

        let err = CardConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CardError::Json(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CardConfig::from_path("/nonexistent/cardner.json").unwrap_err();
        match err {
            CardError::Io { path, .. } => {
                assert!(path.ends_with("cardner.json"));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }
}
