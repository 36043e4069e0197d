//! # Adaptador do Rotulador Base
//!
//! O rotulador de sequência de propósito geral é um colaborador externo (caixa
//! preta): dado um texto, devolve trechos com rótulos de um conjunto aberto.
//! Este módulo define o contrato ([`BaseLabeler`]) e normaliza a saída para o
//! mesmo formato de [`Candidate`] produzido pelo motor de padrões.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::candidate::{Candidate, Source};
use crate::error::Result;
use crate::label::Label;

/// Candidato bruto devolvido pelo rotulador externo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    pub start: usize,
    pub end: usize,
    pub text: String,
    /// Rótulo do conjunto aberto do rotulador (ex: "PERSON", "GPE", "PER")
    pub label: String,
}

impl RawCandidate {
    pub fn new(start: usize, end: usize, text: &str, label: &str) -> Self {
        Self {
            start,
            end,
            text: text.to_string(),
            label: label.to_string(),
        }
    }
}

/// Contrato com o rotulador de propósito geral.
///
/// Implementações precisam ser `Send + Sync`: o pipeline é compartilhado entre threads.
pub trait BaseLabeler: Send + Sync {
    fn name(&self) -> &str;

    fn label(&self, text: &str) -> Result<Vec<RawCandidate>>;
}

/// Rotulador que não produz candidatos (apenas regras + fallback)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLabeler;

impl BaseLabeler for NoopLabeler {
    fn name(&self) -> &str {
        "noop"
    }

    fn label(&self, _text: &str) -> Result<Vec<RawCandidate>> {
        Ok(Vec::new())
    }
}

/// Devolve sempre a mesma lista de candidatos
#[derive(Debug, Clone, Default)]
pub struct StaticLabeler {
    pub candidates: Vec<RawCandidate>,
}

impl StaticLabeler {
    pub fn new(candidates: Vec<RawCandidate>) -> Self {
        Self { candidates }
    }
}

impl BaseLabeler for StaticLabeler {
    fn name(&self) -> &str {
        "static"
    }

    fn label(&self, _text: &str) -> Result<Vec<RawCandidate>> {
        Ok(self.candidates.clone())
    }
}

/// Adapta uma closure ao contrato [`BaseLabeler`]
pub struct FnLabeler<F> {
    name: String,
    func: F,
}

impl<F> FnLabeler<F>
where
    F: Fn(&str) -> Result<Vec<RawCandidate>> + Send + Sync,
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            name: name.to_string(),
            func,
        }
    }
}

impl<F> BaseLabeler for FnLabeler<F>
where
    F: Fn(&str) -> Result<Vec<RawCandidate>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self, text: &str) -> Result<Vec<RawCandidate>> {
        (self.func)(text)
    }
}

/// Converte candidatos brutos em [`Candidate`]s.
///
/// Offsets fora do texto ou fora de fronteiras de caractere são descartados;
/// o texto do candidato é sempre relido do texto original.
pub fn normalize(text: &str, raw: Vec<RawCandidate>) -> Vec<Candidate> {
    raw.into_iter()
        .filter_map(|rc| {
            let valid = rc.start < rc.end
                && rc.end <= text.len()
                && text.is_char_boundary(rc.start)
                && text.is_char_boundary(rc.end);
            if !valid {
                warn!(start = rc.start, end = rc.end, label = %rc.label, "trecho inválido do rotulador base descartado");
                return None;
            }
            Some(Candidate {
                start: rc.start,
                end: rc.end,
                text: text[rc.start..rc.end].to_string(),
                label: Label::from_external(&rc.label),
                source: Source::BaseLabeler,
                rule_name: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CardError;

    #[test]
    fn test_normalize_maps_labels_and_rereads_text() {
        let text = "Jane Carter works at Acme";
        let raw = vec![
            RawCandidate::new(0, 11, "ignored", "PER"),
            RawCandidate::new(21, 25, "Acme", "GPE"),
        ];
        let candidates = normalize(text, raw);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "Jane Carter");
        assert_eq!(candidates[0].label, Label::Person);
        assert_eq!(candidates[0].source, Source::BaseLabeler);
        assert_eq!(candidates[1].label, Label::Other);
    }

    #[test]
    fn test_normalize_drops_invalid_offsets() {
        let text = "José";
        let raw = vec![
            RawCandidate::new(0, 99, "x", "PERSON"),
            RawCandidate::new(3, 2, "x", "PERSON"),
            // 'é' ocupa os bytes 3..5
            RawCandidate::new(0, 4, "x", "PERSON"),
        ];
        assert!(normalize(text, raw).is_empty());
    }

    #[test]
    fn test_fn_labeler_propagates_error() {
        let labeler = FnLabeler::new("down", |_text: &str| {
            Err(CardError::Labeler {
                labeler: "down".into(),
                message: "indisponível".into(),
            })
        });
        assert_eq!(labeler.name(), "down");
        assert!(labeler.label("x").is_err());
        assert!(NoopLabeler.label("x").unwrap().is_empty());
    }
}
