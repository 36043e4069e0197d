//! # Candidatos e Entidades Pontuadas
//!
//! Um [`Candidate`] é um trecho proposto por uma das fontes de sinal (regras,
//! rotulador base ou fallback regex) antes do filtro. Depois de filtrado e
//! pontuado vira uma [`ScoredEntity`]; se rejeitado, vira um [`Rejected`] com o
//! código do motivo.

use serde::{Deserialize, Serialize};

use crate::label::Label;

/// Fonte que produziu o candidato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Rule,
    BaseLabeler,
    RegexFallback,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Source::Rule => "rule",
            Source::BaseLabeler => "base_labeler",
            Source::RegexFallback => "regex_fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Posição de byte inicial no texto original
    pub start: usize,
    /// Posição de byte final no texto original (exclusivo)
    pub end: usize,
    pub text: String,
    pub label: Label,
    pub source: Source,
    /// Nome do padrão que gerou o candidato (apenas para a fonte `Rule`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
}

impl Candidate {
    /// Número de palavras separadas por espaço
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Código do motivo de rejeição (usado nos diagnósticos de depuração)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    IgnoreLabel,
    UnsupportedLabel,
    TooShort,
    ContactDetail,
    ContainsDigit,
    NoVowel,
    Punctuation,
    Acronym,
    LexiconWord,
    LowConfidence,
    /// Sobrepõe um trecho marcado IGNORE
    IgnoredSpan,
    /// Contido em um trecho mais largo do mesmo rótulo
    Subsumed,
    /// FULLNAME perdedor na resolução de conflitos
    Conflict,
}

/// Entidade aceita, retornada ao chamador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntity {
    pub text: String,
    pub label: Label,
    pub confidence: f64,
    pub start: usize,
    pub end: usize,
    pub source: Source,
}

impl ScoredEntity {
    pub fn new(candidate: Candidate, confidence: f64) -> Self {
        Self {
            text: candidate.text,
            label: candidate.label,
            confidence: confidence.clamp(0.0, 1.0),
            start: candidate.start,
            end: candidate.end,
            source: candidate.source,
        }
    }

    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Candidato rejeitado, para observabilidade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejected {
    pub text: String,
    pub label: Label,
    pub score: f64,
    pub reason: RejectReason,
    pub source: Source,
}

impl Rejected {
    pub fn new(text: String, label: Label, score: f64, reason: RejectReason, source: Source) -> Self {
        Self {
            text,
            label,
            score: score.clamp(0.0, 1.0),
            reason,
            source,
        }
    }

    pub fn from_entity(entity: &ScoredEntity, reason: RejectReason) -> Self {
        Self::new(entity.text.clone(), entity.label, entity.confidence, reason, entity.source)
    }
}
