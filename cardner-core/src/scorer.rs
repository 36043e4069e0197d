//! # Pontuador Heurístico
//!
//! Função pura de (texto, rótulo, léxicos): mesma entrada, mesma pontuação.
//!
//! ORG e TITLE recebem a confiança fixa das regras curadas. Nomes (PERSON e
//! FULLNAME) somam contribuições a partir de 0.0:
//!
//! | Sinal                                         | Peso  |
//! |-----------------------------------------------|-------|
//! | 2 ou 3 tokens                                 | +0.5  |
//! | exatamente 1 token                            | −0.5  |
//! | todo token alfabético começa com maiúscula    | +0.3  |
//! | contém dígito                                 | −0.7  |
//! | contém `@` ou `http`                          | −1.0  |
//! | token no léxico de cargos                     | −0.5  |
//! | token no léxico de organizações               | −0.7  |
//! | token no léxico de endereços                  | −0.7  |
//! | texto inteiro em maiúsculas                   | −0.5  |
//! | texto aparado com menos de 3 caracteres       | −0.5  |
//!
//! O resultado é limitado a [0.0, 1.0].

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ScoringConfig;
use crate::label::Label;
use crate::lexicon::{LexiconKind, Lexicons};
use crate::tokenizer::{is_all_uppercase_word, is_alphabetic_word};

pub fn score(text: &str, label: Label, lexicons: &Lexicons, scoring: &ScoringConfig) -> f64 {
    let raw = match label {
        Label::Org | Label::Title => scoring.rule_confidence,
        Label::Person | Label::Fullname => person_score(text, lexicons),
        Label::Ignore | Label::Other => 0.0,
    };
    raw.clamp(0.0, 1.0)
}

fn person_score(text: &str, lexicons: &Lexicons) -> f64 {
    let trimmed = text.trim();
    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let lower = trimmed.to_lowercase();
    let mut score = 0.0;

    match words.len() {
        2 | 3 => score += 0.5,
        1 => score -= 0.5,
        _ => {}
    }

    let alphabetic: Vec<&&str> = words.iter().filter(|w| is_alphabetic_word(w)).collect();
    let all_capitalized = !alphabetic.is_empty()
        && alphabetic
            .iter()
            .all(|w| w.chars().next().map(char::is_uppercase).unwrap_or(false));
    if all_capitalized {
        score += 0.3;
    }

    if trimmed.chars().any(char::is_numeric) {
        score -= 0.7;
    }
    if lower.contains('@') || lower.contains("http") {
        score -= 1.0;
    }

    let hits = |kind: LexiconKind| words.iter().any(|w| lexicons.contains(kind, w));
    if hits(LexiconKind::Title) {
        score -= 0.5;
    }
    if hits(LexiconKind::OrgSuffix) {
        score -= 0.7;
    }
    if hits(LexiconKind::Address) {
        score -= 0.7;
    }

    if is_all_uppercase_word(trimmed) {
        score -= 0.5;
    }
    if trimmed.graphemes(true).count() < 3 {
        score -= 0.5;
    }

    score
}
