//! # Erros do crate
//!
//! Apenas a camada de configuração e os adaptadores externos podem falhar.
//! A extração em si nunca retorna erro: qualquer texto produz uma [`Extraction`](crate::pipeline::Extraction).

use std::path::PathBuf;

/// Erro único do `cardner-core`.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    /// Configuração inválida (versão vazia, padrão sem passos, confiança fora de [0,1]...).
    #[error("Configuração inválida: {0}")]
    Config(String),

    #[error("Falha ao ler '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex inválida: {0}")]
    Regex(#[from] regex::Error),

    /// O rotulador base falhou; o pipeline degrada para "zero candidatos".
    #[error("Rotulador '{labeler}' falhou: {message}")]
    Labeler { labeler: String, message: String },
}

pub type Result<T> = std::result::Result<T, CardError>;
