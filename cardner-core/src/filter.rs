//! # Fusão e Filtro de Candidatos
//!
//! Une os candidatos das regras e do rotulador base e descarta os que não são
//! confiáveis. As regras são aplicadas em ordem e a primeira que rejeitar vence
//! (o motivo aparece nos diagnósticos):
//!
//! 1. rótulo IGNORE
//! 2. rótulo fora de {PERSON, FULLNAME, ORG, TITLE}
//! 3. texto com no máximo 2 caracteres
//! 4. contém `@`, `http` ou `www`
//! 5. contém dígito
//! 6. não contém vogal
//! 7. contém `,` `"` `'` ou `&`
//! 8. nomes: tudo em maiúsculas com mais de um token (sigla)
//! 9. nomes: alguma palavra pertence aos léxicos de cargo, organização ou endereço
//! 10. sobrepõe um trecho IGNORE (ex: "Tel" rotulado ORG pelo rotulador base)

use std::collections::{BTreeMap, HashMap};

use unicode_segmentation::UnicodeSegmentation;

use crate::candidate::{Candidate, RejectReason, ScoredEntity};
use crate::label::Label;
use crate::lexicon::{LexiconKind, Lexicons};
use crate::tokenizer::is_all_uppercase_word;

/// Apenas vogais ASCII: "Lê Vũ" não tem vogal por esta regra.
const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];
const FORBIDDEN_PUNCTUATION: &[char] = &[',', '"', '\'', '&'];

/// Regras estruturais 3–7, compartilhadas com o fallback regex.
pub fn structural_check(text: &str) -> Option<RejectReason> {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    if trimmed.graphemes(true).count() <= 2 {
        return Some(RejectReason::TooShort);
    }
    if lower.contains('@') || lower.contains("http") || lower.contains("www") {
        return Some(RejectReason::ContactDetail);
    }
    if trimmed.chars().any(char::is_numeric) {
        return Some(RejectReason::ContainsDigit);
    }
    if !lower.chars().any(|c| VOWELS.contains(&c)) {
        return Some(RejectReason::NoVowel);
    }
    if trimmed.chars().any(|c| FORBIDDEN_PUNCTUATION.contains(&c)) {
        return Some(RejectReason::Punctuation);
    }
    None
}

/// Aplica as regras 1–9 a um candidato; `None` significa aceito.
pub fn check(candidate: &Candidate, lexicons: &Lexicons) -> Option<RejectReason> {
    let label = candidate.label;
    if label == Label::Ignore {
        return Some(RejectReason::IgnoreLabel);
    }
    if !label.is_accepted() {
        return Some(RejectReason::UnsupportedLabel);
    }
    if let Some(reason) = structural_check(&candidate.text) {
        return Some(reason);
    }
    if label.is_person_like() {
        if is_all_uppercase_word(&candidate.text) && candidate.token_count() > 1 {
            return Some(RejectReason::Acronym);
        }
        let lexicon_hit = [LexiconKind::Title, LexiconKind::OrgSuffix, LexiconKind::Address]
            .into_iter()
            .any(|kind| lexicons.any_word_in(kind, &candidate.text));
        if lexicon_hit {
            return Some(RejectReason::LexiconWord);
        }
    }
    None
}

/// Separa os candidatos aceitos dos rejeitados, preservando a ordem de entrada.
///
/// Trechos IGNORE, de qualquer fonte, bloqueiam todo candidato que os sobreponha.
pub fn filter(
    candidates: Vec<Candidate>,
    lexicons: &Lexicons,
) -> (Vec<Candidate>, Vec<(Candidate, RejectReason)>) {
    let ignored = IgnoredSpans::collect(&candidates);
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for candidate in candidates {
        let reason = check(&candidate, lexicons)
            .or_else(|| ignored.overlaps(&candidate).then_some(RejectReason::IgnoredSpan));
        match reason {
            Some(reason) => rejected.push((candidate, reason)),
            None => accepted.push(candidate),
        }
    }
    (accepted, rejected)
}

/// Trechos IGNORE fundidos em intervalos disjuntos, ordenados por início.
struct IgnoredSpans(Vec<(usize, usize)>);

impl IgnoredSpans {
    fn collect(candidates: &[Candidate]) -> Self {
        let mut spans: Vec<(usize, usize)> = candidates
            .iter()
            .filter(|c| c.label == Label::Ignore)
            .map(|c| (c.start, c.end))
            .collect();
        spans.sort_unstable();

        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        for (start, end) in spans {
            match merged.last_mut() {
                Some(last) if start < last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        Self(merged)
    }

    fn overlaps(&self, candidate: &Candidate) -> bool {
        // Intervalos disjuntos: os finais também crescem
        let i = self.0.partition_point(|&(_, end)| end <= candidate.start);
        self.0.get(i).map_or(false, |&(start, _)| start < candidate.end)
    }
}

/// Garante que trechos do mesmo rótulo não se sobreponham.
///
/// Entre trechos sobrepostos do mesmo rótulo fica o mais largo (empate: o
/// primeiro da lista); os demais são devolvidos como subsumidos. Rótulos
/// diferentes nunca são fundidos. A ordem original dos sobreviventes é mantida.
pub fn merge_overlapping(entities: Vec<ScoredEntity>) -> (Vec<ScoredEntity>, Vec<ScoredEntity>) {
    let mut order: Vec<usize> = (0..entities.len()).collect();
    order.sort_by_key(|&i| (std::cmp::Reverse(entities[i].end - entities[i].start), i));

    // Por rótulo, trechos já mantidos (disjuntos) indexados pelo início
    let mut kept_spans: HashMap<Label, BTreeMap<usize, usize>> = HashMap::new();
    let mut keep = vec![false; entities.len()];
    for i in order {
        let entity = &entities[i];
        let spans = kept_spans.entry(entity.label).or_default();
        let clashes = spans
            .range(..entity.end)
            .next_back()
            .map_or(false, |(_, &end)| end > entity.start);
        if !clashes {
            spans.insert(entity.start, entity.end);
            keep[i] = true;
        }
    }

    let mut kept = Vec::new();
    let mut subsumed = Vec::new();
    for (entity, keep) in entities.into_iter().zip(keep) {
        if keep {
            kept.push(entity);
        } else {
            subsumed.push(entity);
        }
    }
    (kept, subsumed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Source;
    use crate::label::Label;

    fn cand(text: &str, label: Label) -> Candidate {
        Candidate {
            start: 0,
            end: text.len(),
            text: text.to_string(),
            label,
            source: Source::Rule,
            rule_name: None,
        }
    }

    fn entity(start: usize, end: usize, label: Label) -> ScoredEntity {
        ScoredEntity {
            text: "x".repeat(end - start),
            label,
            confidence: 0.8,
            start,
            end,
            source: Source::Rule,
        }
    }

    #[test]
    fn test_rules_in_order() {
        let lex = Lexicons::default();
        let cases = [
            ("Tel", Label::Ignore, Some(RejectReason::IgnoreLabel)),
            ("Bangkok", Label::Other, Some(RejectReason::UnsupportedLabel)),
            ("Al", Label::Person, Some(RejectReason::TooShort)),
            ("jane@acme.com", Label::Person, Some(RejectReason::ContactDetail)),
            ("www Acme", Label::Org, Some(RejectReason::ContactDetail)),
            ("Room 42", Label::Org, Some(RejectReason::ContainsDigit)),
            ("Brynn Lynch", Label::Person, Some(RejectReason::NoVowel)),
            ("Smith, Jane", Label::Person, Some(RejectReason::Punctuation)),
            ("AT&T Group", Label::Org, Some(RejectReason::Punctuation)),
            ("JANE CARTER", Label::Fullname, Some(RejectReason::Acronym)),
            ("Senior Director", Label::Fullname, Some(RejectReason::LexiconWord)),
            ("Kalanyoo Ammaranon", Label::Fullname, None),
            ("Bangkok Bank", Label::Org, None),
        ];
        for (text, label, expected) in cases {
            assert_eq!(check(&cand(text, label), &lex), expected, "{text} ({label})");
        }
    }

    #[test]
    fn test_acronym_rule_only_for_names() {
        let lex = Lexicons::default();
        assert_eq!(check(&cand("KASIKORN BANK", Label::Org), &lex), None);
        assert_eq!(check(&cand("CEO", Label::Title), &lex), None);
        // token único em maiúsculas não é sigla pela regra 8
        assert_eq!(check(&cand("KALANYOO", Label::Person), &lex), None);
    }

    #[test]
    fn test_filter_keeps_order() {
        let lex = Lexicons::default();
        let (accepted, rejected) = filter(
            vec![
                cand("Jane Carter", Label::Person),
                cand("Fax", Label::Ignore),
                cand("Bangkok Bank", Label::Org),
            ],
            &lex,
        );
        let texts: Vec<&str> = accepted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Jane Carter", "Bangkok Bank"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].1, RejectReason::IgnoreLabel);
    }

    fn at(start: usize, text: &str, label: Label, source: Source) -> Candidate {
        Candidate {
            start,
            end: start + text.len(),
            text: text.to_string(),
            label,
            source,
            rule_name: None,
        }
    }

    #[test]
    fn test_ignore_span_blocks_other_sources() {
        let lex = Lexicons::default();
        // "Tel: 02-123-4567 Acme Group"
        let (accepted, rejected) = filter(
            vec![
                at(0, "Tel", Label::Ignore, Source::Rule),
                at(0, "Tel", Label::Org, Source::BaseLabeler),
                at(17, "Acme Group", Label::Org, Source::BaseLabeler),
            ],
            &lex,
        );
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].text, "Acme Group");
        assert_eq!(rejected[1].0.label, Label::Org);
        assert_eq!(rejected[1].1, RejectReason::IgnoredSpan);
    }

    #[test]
    fn test_ignore_span_partial_overlap() {
        let lex = Lexicons::default();
        // "Mobile Jane Carter": só bloqueia o que sobrepõe [0,6); começar em 6 não sobrepõe
        let (accepted, rejected) = filter(
            vec![
                at(0, "Mobile", Label::Ignore, Source::Rule),
                at(0, "Mobile Jane Carter", Label::Fullname, Source::Rule),
                at(7, "Jane Carter", Label::Fullname, Source::Rule),
                at(6, " Jane", Label::Person, Source::BaseLabeler),
            ],
            &lex,
        );
        let texts: Vec<&str> = accepted.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Jane Carter", " Jane"]);
        assert_eq!(rejected[1].1, RejectReason::IgnoredSpan);
    }

    #[test]
    fn test_vowels_are_ascii_only() {
        assert_eq!(structural_check("Lê Vũ"), Some(RejectReason::NoVowel));
        assert_eq!(structural_check("José Lê"), None);
        assert_eq!(structural_check("Lynn Wynn"), Some(RejectReason::NoVowel));
    }

    #[test]
    fn test_merge_keeps_widest_per_label() {
        let entities = vec![
            entity(0, 21, Label::Title),
            entity(7, 21, Label::Title),
            entity(12, 21, Label::Title),
            entity(0, 21, Label::Fullname),
        ];
        let (kept, subsumed) = merge_overlapping(entities);
        assert_eq!(kept.len(), 2);
        assert_eq!((kept[0].start, kept[0].label), (0, Label::Title));
        assert_eq!(kept[1].label, Label::Fullname);
        assert_eq!(subsumed.len(), 2);
    }

    #[test]
    fn test_merge_tie_keeps_first() {
        let (kept, subsumed) = merge_overlapping(vec![entity(0, 5, Label::Org), entity(3, 8, Label::Org)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start, 0);
        assert_eq!(subsumed[0].start, 3);
    }

    #[test]
    fn test_merge_chain_of_overlaps() {
        // Mesmo comprimento: vence a ordem de entrada; [3,7) encosta em [0,4)
        let (kept, subsumed) = merge_overlapping(vec![
            entity(0, 4, Label::Title),
            entity(3, 7, Label::Title),
            entity(6, 10, Label::Title),
            entity(2, 9, Label::Org),
            entity(9, 12, Label::Org),
        ]);
        let spans: Vec<(usize, usize)> = kept.iter().map(|e| (e.start, e.end)).collect();
        assert_eq!(spans, vec![(0, 4), (6, 10), (2, 9), (9, 12)]);
        assert_eq!(subsumed.len(), 1);
        assert_eq!(subsumed[0].start, 3);
    }

    #[test]
    fn test_merge_many_entities() {
        // Cargos de um token em sequência nunca se sobrepõem
        let entities: Vec<ScoredEntity> = (0..50_000).map(|i| entity(i * 9, i * 9 + 8, Label::Title)).collect();
        let (kept, subsumed) = merge_overlapping(entities);
        assert_eq!(kept.len(), 50_000);
        assert!(subsumed.is_empty());
    }
}
