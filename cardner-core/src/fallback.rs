//! # Fallback Regex para Nomes
//!
//! Acionado apenas quando nenhum PERSON/FULLNAME sobreviveu ao filtro. Percorre
//! o texto linha a linha, na ordem original, e procura na primeira linha útil o
//! primeiro trecho com duas ou três palavras capitalizadas ("Jane Carter").
//!
//! A política é estritamente "primeira linha que qualifica, match mais à
//! esquerda": não existe busca global pelo melhor candidato.
//!
//! Linhas ignoradas: vazias, com `@`/`http`/`www`, ou que começam com um rótulo
//! de contato (`Tel:`, `Mobile`, `Fax`, `Email`, `E-mail`, `Website`, `Web`).

use regex::Regex;
use tracing::debug;

use crate::candidate::{Candidate, RejectReason, Source};
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::filter::structural_check;
use crate::label::Label;
use crate::lexicon::{LexiconKind, Lexicons};
use crate::scorer::score;

/// Duas ou três palavras "Xxxx" separadas por espaço/tab
const NAME_PATTERN: &str = r"\b\p{Lu}\p{Ll}+(?:[ \t]+\p{Lu}\p{Ll}+){1,2}\b";
const CONTACT_LABEL_PATTERN: &str = r"(?i)^\s*(?:e-mail|email|website|web|mobile|tel|fax)\b\s*:?";

/// Linhas com duas ou mais palavras de cargo são consideradas "só cargo"
const MAX_TITLE_WORDS: usize = 2;

#[derive(Debug, Clone)]
pub struct RegexFallback {
    name_re: Regex,
    contact_label_re: Regex,
}

impl RegexFallback {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name_re: Regex::new(NAME_PATTERN)?,
            contact_label_re: Regex::new(CONTACT_LABEL_PATTERN)?,
        })
    }

    /// Primeiro candidato aceito, rotulado PERSON com fonte `regex_fallback`.
    pub fn find(&self, text: &str, lexicons: &Lexicons, scoring: &ScoringConfig) -> Option<Candidate> {
        self.find_with_rejections(text, lexicons, scoring).0
    }

    /// Como [`find`](Self::find), devolvendo também os matches descartados no caminho.
    pub fn find_with_rejections(
        &self,
        text: &str,
        lexicons: &Lexicons,
        scoring: &ScoringConfig,
    ) -> (Option<Candidate>, Vec<(Candidate, RejectReason)>) {
        let mut rejected = Vec::new();
        let mut offset = 0;

        for raw_line in text.split('\n') {
            let line_start = offset;
            offset += raw_line.len() + 1;
            let line = raw_line.trim_end_matches('\r');

            if self.skip_line(line) {
                continue;
            }
            let Some(m) = self.name_re.find(line) else {
                continue;
            };

            let (start, end) = (line_start + m.start(), line_start + m.end());
            debug_assert!(end <= text.len() && &text[start..end] == m.as_str());
            let candidate = Candidate {
                start,
                end,
                text: m.as_str().to_string(),
                label: Label::Person,
                source: Source::RegexFallback,
                rule_name: None,
            };

            match self.rejection(&candidate, line, lexicons, scoring) {
                Some(reason) => {
                    debug!(text = %candidate.text, ?reason, "fallback descartou candidato");
                    rejected.push((candidate, reason));
                }
                None => return (Some(candidate), rejected),
            }
        }

        (None, rejected)
    }

    fn skip_line(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        line.trim().is_empty()
            || lower.contains('@')
            || lower.contains("http")
            || lower.contains("www")
            || self.contact_label_re.is_match(line)
    }

    fn rejection(
        &self,
        candidate: &Candidate,
        line: &str,
        lexicons: &Lexicons,
        scoring: &ScoringConfig,
    ) -> Option<RejectReason> {
        let title_words = line
            .split_whitespace()
            .filter(|w| lexicons.contains(LexiconKind::Title, w))
            .count();
        if title_words >= MAX_TITLE_WORDS {
            return Some(RejectReason::LexiconWord);
        }
        if let Some(reason) = structural_check(&candidate.text) {
            return Some(reason);
        }
        if score(&candidate.text, Label::Person, lexicons, scoring) < scoring.min_person_confidence {
            return Some(RejectReason::LowConfidence);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str) -> Option<Candidate> {
        let fallback = RegexFallback::new().unwrap();
        fallback.find(text, &Lexicons::default(), &ScoringConfig::default())
    }

    #[test]
    fn test_finds_capitalized_name() {
        let c = find("Jane Carter").unwrap();
        assert_eq!(c.text, "Jane Carter");
        assert_eq!(c.label, Label::Person);
        assert_eq!(c.source, Source::RegexFallback);
    }

    #[test]
    fn test_title_only_line_is_skipped() {
        assert!(find("Senior Vice President").is_none());
        let c = find("Senior Vice President\nJo Carter").unwrap();
        assert_eq!(c.text, "Jo Carter");
    }

    #[test]
    fn test_offsets_are_absolute() {
        let text = "\nTel: 02-123-4567\r\nwww.acme.com\n  Mary Ann Lee  ";
        let c = find(text).unwrap();
        assert_eq!(&text[c.start..c.end], "Mary Ann Lee");
    }

    #[test]
    fn test_contact_lines_are_skipped() {
        assert!(find("Tel: Jane Carter").is_none());
        assert!(find("E-mail Jane Carter").is_none());
        assert!(find("jane@carter.com Jane Carter").is_none());
        // "Webster" não é o rótulo "web"
        assert!(find("Webster Hall").is_some());
    }

    #[test]
    fn test_leftmost_match_only() {
        // O primeiro match da linha é "Bangkok Bank" (baixa confiança); a linha
        // seguinte ainda pode qualificar.
        let fallback = RegexFallback::new().unwrap();
        let (found, rejected) = fallback.find_with_rejections(
            "Bangkok Bank\nJo Carter",
            &Lexicons::default(),
            &ScoringConfig::default(),
        );
        assert_eq!(found.unwrap().text, "Jo Carter");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].1, RejectReason::LowConfidence);
    }

    #[test]
    fn test_no_candidate() {
        assert!(find("").is_none());
        assert!(find("acme corporation").is_none());
    }
}
