//! # Motor de Padrões: Regras sobre Sequências de Tokens
//!
//! Cada [`Pattern`] é uma sequência de 1 a 3 predicados de token. Padrões são
//! agrupados em [`PatternGroup`]s (cargo, organização, nome completo, ruído): em
//! cada posição inicial o primeiro padrão do grupo que casar vence, e grupos
//! diferentes podem emitir trechos sobrepostos. Fora a sequência máxima dos
//! padrões com repetição, nada é deduplicado aqui; o filtro e o resolvedor de
//! conflitos são os pontos de deduplicação.
//!
//! ## Famílias padrão
//!
//! - **title**: compostos literais ("senior vice president") e depois uma palavra do léxico de cargos.
//! - **org**: uma ou mais palavras alfabéticas seguidas de um sufixo de organização ("Bangkok Bank").
//! - **fullname**: três e depois duas palavras capitalizadas ("Kalanyoo Ammaranon").
//! - **ignore**: abreviações de contato ("Tel", "Fax").

use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, Source};
use crate::config::CardConfig;
use crate::error::{CardError, Result};
use crate::label::Label;
use crate::lexicon::{normalize_word, LexiconKind, Lexicons};
use crate::tokenizer::Token;

/// Predicado aplicado a um único token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPredicate {
    /// Igualdade em minúsculas
    Exact(String),
    InLexicon(LexiconKind),
    Alphabetic,
    /// Alfabético, primeira letra maiúscula e mais longo que `fullname_min_token_len`
    CapitalizedAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    #[default]
    One,
    /// Guloso, com backtracking para que o passo seguinte ainda possa casar
    OneOrMore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub predicate: TokenPredicate,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Step {
    pub fn one(predicate: TokenPredicate) -> Self {
        Self { predicate, repeat: Repeat::One }
    }

    pub fn one_or_more(predicate: TokenPredicate) -> Self {
        Self { predicate, repeat: Repeat::OneOrMore }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Pattern {
    pub fn new(name: &str, steps: Vec<Step>) -> Self {
        Self { name: name.to_string(), steps }
    }

    /// Sequência literal de palavras (ex: "chief representative")
    pub fn literal(name: &str, phrase: &str) -> Self {
        let steps = phrase
            .split_whitespace()
            .map(|w| Step::one(TokenPredicate::Exact(w.to_lowercase())))
            .collect();
        Self::new(name, steps)
    }

    pub fn is_unbounded(&self) -> bool {
        self.steps.iter().any(|s| s.repeat == Repeat::OneOrMore)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternGroup {
    pub name: String,
    pub label: Label,
    pub patterns: Vec<Pattern>,
}

/// Compostos de cargo, do mais longo para o mais curto
const TITLE_COMPOUNDS: &[&str] = &[
    "chief executive officer",
    "chief operating officer",
    "chief financial officer",
    "chief technology officer",
    "executive vice president",
    "senior vice president",
    "assistant vice president",
    "vice president",
    "chief representative",
    "managing director",
    "general manager",
    "assistant professor",
    "associate professor",
];

/// Grupos de padrões da configuração embutida
pub fn default_pattern_groups() -> Vec<PatternGroup> {
    let mut title: Vec<Pattern> = TITLE_COMPOUNDS
        .iter()
        .map(|phrase| Pattern::literal(&format!("title_compound:{phrase}"), phrase))
        .collect();
    title.push(Pattern::new(
        "title_word",
        vec![Step::one(TokenPredicate::InLexicon(LexiconKind::Title))],
    ));

    vec![
        PatternGroup {
            name: "title".into(),
            label: Label::Title,
            patterns: title,
        },
        PatternGroup {
            name: "org".into(),
            label: Label::Org,
            patterns: vec![Pattern::new(
                "org_suffix",
                vec![
                    Step::one_or_more(TokenPredicate::Alphabetic),
                    Step::one(TokenPredicate::InLexicon(LexiconKind::OrgSuffix)),
                ],
            )],
        },
        PatternGroup {
            name: "fullname".into(),
            label: Label::Fullname,
            patterns: vec![
                Pattern::new("fullname_3", vec![Step::one(TokenPredicate::CapitalizedAlpha); 3]),
                Pattern::new("fullname_2", vec![Step::one(TokenPredicate::CapitalizedAlpha); 2]),
            ],
        },
        PatternGroup {
            name: "ignore".into(),
            label: Label::Ignore,
            patterns: vec![Pattern::new(
                "contact_noise",
                vec![Step::one(TokenPredicate::InLexicon(LexiconKind::Noise))],
            )],
        },
    ]
}

/// Conjunto de padrões compilado, somente leitura depois de construído.
#[derive(Debug, Clone)]
pub struct PatternSet {
    groups: Vec<PatternGroup>,
    min_token_len: usize,
}

impl PatternSet {
    pub fn compile(config: &CardConfig) -> Result<Self> {
        let mut groups = config.patterns.clone();
        for group in &mut groups {
            for pattern in &mut group.patterns {
                if pattern.steps.is_empty() || pattern.steps.len() > 3 {
                    return Err(CardError::Config(format!(
                        "padrão '{}' deve ter de 1 a 3 passos",
                        pattern.name
                    )));
                }
                for step in &mut pattern.steps {
                    if let TokenPredicate::Exact(word) = &mut step.predicate {
                        *word = word.to_lowercase();
                    }
                }
            }
        }
        Ok(Self {
            groups,
            min_token_len: config.scoring.fullname_min_token_len,
        })
    }

    pub fn groups(&self) -> &[PatternGroup] {
        &self.groups
    }

    /// Varre os tokens da esquerda para a direita e emite todos os candidatos.
    ///
    /// Em cada posição inicial cada grupo contribui com no máximo um candidato
    /// (o primeiro padrão do grupo que casar). Um trecho nunca atravessa linhas.
    /// Um padrão com passo `OneOrMore` emite só a sequência máxima: os sufixos
    /// dela, que terminariam no mesmo token, não são repetidos.
    ///
    /// Custo linear no número de tokens: cada padrão é resolvido por uma tabela
    /// preenchida da direita para a esquerda.
    pub fn scan(&self, text: &str, tokens: &[Token], lexicons: &Lexicons) -> Vec<Candidate> {
        let forms: Vec<TokenForms> = tokens.iter().map(TokenForms::new).collect();
        let same_line: Vec<bool> = (0..tokens.len())
            .map(|i| tokens.get(i + 1).map_or(false, |next| next.line == tokens[i].line))
            .collect();
        let tables: Vec<Vec<Vec<Option<usize>>>> = self
            .groups
            .iter()
            .map(|group| {
                group
                    .patterns
                    .iter()
                    .map(|pattern| self.match_table(&pattern.steps, tokens, &forms, &same_line, lexicons))
                    .collect()
            })
            .collect();

        let mut candidates = Vec::new();
        // Por grupo: fim da última sequência máxima emitida
        let mut last_unbounded_end: Vec<Option<usize>> = vec![None; self.groups.len()];

        for i in 0..tokens.len() {
            for (g, group) in self.groups.iter().enumerate() {
                let hit = group
                    .patterns
                    .iter()
                    .zip(&tables[g])
                    .find_map(|(pattern, table)| table[i].map(|end| (pattern, end)));
                let Some((pattern, end)) = hit else {
                    continue;
                };
                if pattern.is_unbounded() {
                    if last_unbounded_end[g] == Some(end) {
                        continue;
                    }
                    last_unbounded_end[g] = Some(end);
                }

                let (start_byte, end_byte) = (tokens[i].start, tokens[end - 1].end);
                debug_assert!(start_byte < end_byte && end_byte <= text.len());
                candidates.push(Candidate {
                    start: start_byte,
                    end: end_byte,
                    text: text[start_byte..end_byte].to_string(),
                    label: group.label,
                    source: Source::Rule,
                    rule_name: Some(pattern.name.clone()),
                });
            }
        }

        candidates
    }

    /// `table[pos]` = fim (exclusivo) do casamento de `steps` começando em `pos`.
    ///
    /// `OneOrMore` é guloso: fica com a maior repetição que ainda deixa o resto casar.
    fn match_table(
        &self,
        steps: &[Step],
        tokens: &[Token],
        forms: &[TokenForms],
        same_line: &[bool],
        lexicons: &Lexicons,
    ) -> Vec<Option<usize>> {
        let n = tokens.len();
        // Sem passos restantes o casamento termina onde está
        let mut next: Vec<Option<usize>> = (0..=n).map(Some).collect();

        for (k, step) in steps.iter().enumerate().rev() {
            let last = k + 1 == steps.len();
            let mut table = vec![None; n + 1];
            for pos in (0..n).rev() {
                if !self.test(&step.predicate, &tokens[pos], &forms[pos], lexicons) {
                    continue;
                }
                let rest = if last {
                    Some(pos + 1)
                } else if same_line[pos] {
                    next[pos + 1]
                } else {
                    None
                };
                table[pos] = match step.repeat {
                    Repeat::One => rest,
                    Repeat::OneOrMore => {
                        let longer = if same_line[pos] { table[pos + 1] } else { None };
                        longer.or(rest)
                    }
                };
            }
            next = table;
        }
        next
    }

    fn test(&self, predicate: &TokenPredicate, token: &Token, forms: &TokenForms, lexicons: &Lexicons) -> bool {
        match predicate {
            TokenPredicate::Exact(word) => forms.lower == *word,
            TokenPredicate::InLexicon(kind) => lexicons.contains_normalized(*kind, &forms.normalized),
            TokenPredicate::Alphabetic => token.is_alphabetic(),
            TokenPredicate::CapitalizedAlpha => {
                token.is_alphabetic() && token.is_capitalized() && token.char_len() > self.min_token_len
            }
        }
    }
}

/// Formas do token calculadas uma vez por varredura
struct TokenForms {
    lower: String,
    normalized: String,
}

impl TokenForms {
    fn new(token: &Token) -> Self {
        Self {
            lower: token.lower(),
            normalized: normalize_word(&token.text),
        }
    }
}
