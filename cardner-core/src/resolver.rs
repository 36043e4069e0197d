//! # Resolvedor de Conflitos
//!
//! - **FULLNAME**: se sobrar mais de um, fica apenas o de maior número de tokens
//!   (empate: o primeiro na lista fundida de candidatos).
//! - **PERSON/FULLNAME**: ordenados por confiança decrescente; o primeiro vira o
//!   `top_person` ("melhor palpite").
//! - **ORG/TITLE**: nunca deduplicados; um cartão pode ter várias organizações.

use std::cmp::Ordering;

use crate::candidate::ScoredEntity;
use crate::label::Label;

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Entidades mantidas, na mesma ordem da entrada
    pub entities: Vec<ScoredEntity>,
    pub top_person: Option<ScoredEntity>,
    /// FULLNAMEs descartados pelo conflito
    pub dropped: Vec<ScoredEntity>,
}

pub fn resolve(entities: Vec<ScoredEntity>) -> Resolution {
    let best_fullname = best_fullname_index(&entities);

    let mut kept = Vec::with_capacity(entities.len());
    let mut dropped = Vec::new();
    for (i, entity) in entities.into_iter().enumerate() {
        if entity.label == Label::Fullname && Some(i) != best_fullname {
            dropped.push(entity);
        } else {
            kept.push(entity);
        }
    }

    let top_person = ranked_persons(&kept).first().map(|e| (*e).clone());
    Resolution {
        entities: kept,
        top_person,
        dropped,
    }
}

/// Nomes (PERSON e FULLNAME) por confiança decrescente; empates mantêm a ordem de entrada.
pub fn ranked_persons(entities: &[ScoredEntity]) -> Vec<&ScoredEntity> {
    let mut persons: Vec<&ScoredEntity> = entities.iter().filter(|e| e.label.is_person_like()).collect();
    persons.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));
    persons
}

fn best_fullname_index(entities: &[ScoredEntity]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, entity) in entities.iter().enumerate() {
        if entity.label != Label::Fullname {
            continue;
        }
        let count = entity.token_count();
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((i, count));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Source;

    fn entity(text: &str, label: Label, confidence: f64) -> ScoredEntity {
        ScoredEntity {
            text: text.to_string(),
            label,
            confidence,
            start: 0,
            end: text.len(),
            source: Source::Rule,
        }
    }

    #[test]
    fn test_longest_fullname_wins() {
        let resolution = resolve(vec![
            entity("Kalanyoo Ammaranon", Label::Fullname, 0.8),
            entity("Bangkok Bank", Label::Org, 0.8),
            entity("Kalanyoo Araya Ammaranon", Label::Fullname, 0.8),
        ]);
        let texts: Vec<&str> = resolution.entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Bangkok Bank", "Kalanyoo Araya Ammaranon"]);
        assert_eq!(resolution.dropped.len(), 1);
        assert_eq!(resolution.dropped[0].text, "Kalanyoo Ammaranon");
    }

    #[test]
    fn test_fullname_tie_keeps_first() {
        let resolution = resolve(vec![
            entity("Jane Carter", Label::Fullname, 0.8),
            entity("John Smith", Label::Fullname, 0.8),
        ]);
        assert_eq!(resolution.entities.len(), 1);
        assert_eq!(resolution.entities[0].text, "Jane Carter");
    }

    #[test]
    fn test_org_and_title_never_deduplicated() {
        let resolution = resolve(vec![
            entity("Bangkok Bank", Label::Org, 0.8),
            entity("Chulalongkorn University", Label::Org, 0.8),
            entity("Director", Label::Title, 0.8),
            entity("Lecturer", Label::Title, 0.8),
        ]);
        assert_eq!(resolution.entities.len(), 4);
        assert!(resolution.top_person.is_none());
    }

    #[test]
    fn test_top_person_by_confidence() {
        let resolution = resolve(vec![
            entity("Jane Director", Label::Person, 0.3),
            entity("Jane Carter", Label::Person, 0.8),
            entity("Mary Lee", Label::Person, 0.8),
        ]);
        // PERSON nunca é deduplicado
        assert_eq!(resolution.entities.len(), 3);
        assert_eq!(resolution.top_person.unwrap().text, "Jane Carter");

        let ranked = ranked_persons(&resolution.entities);
        let texts: Vec<&str> = ranked.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Jane Carter", "Mary Lee", "Jane Director"]);
    }
}
