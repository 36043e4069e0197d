//! # Léxicos: Listas de Palavras Estáticas
//!
//! Listas usadas por todos os estágios: palavras de cargo, sufixos de organização,
//! palavras de endereço/localidade e ruído de contato.
//! Todas as entradas ficam em minúsculas; a consulta é case-insensitive.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Palavras que compõem cargos
const TITLE_WORDS: &[&str] = &[
    "head", "senior", "junior", "vice", "president", "chief", "executive", "officer",
    "manager", "director", "engineer", "consultant", "founder", "cofounder", "co-founder",
    "coordinator", "lecturer", "professor", "assistant", "associate", "deputy", "partner",
    "analyst", "specialist", "representative", "secretary", "chairman", "chairwoman",
    "supervisor", "administrator", "architect", "developer", "designer", "advisor",
    "adviser", "accountant", "lead", "principal", "managing", "general", "ceo", "cto",
    "cfo", "coo", "cio", "vp", "evp", "svp", "avp", "dean", "researcher", "scientist",
    "intern", "treasurer", "owner", "sales", "marketing",
];

/// Sufixos que ancoram o fim de um nome de organização
const ORG_SUFFIXES: &[&str] = &[
    "bank", "university", "department", "faculty", "division", "institute", "college",
    "school", "company", "co", "corporation", "corp", "inc", "ltd", "limited", "llc",
    "plc", "group", "holdings", "foundation", "association", "agency", "ministry",
    "hospital", "center", "centre", "laboratory", "laboratories", "partners", "bhd",
    "pte", "gmbh", "consulting", "solutions", "technologies", "systems", "services",
];

/// Palavras de endereço e localidade
const ADDRESS_WORDS: &[&str] = &[
    "road", "rd", "street", "st", "avenue", "ave", "lane", "soi", "floor", "building",
    "tower", "suite", "room", "district", "subdistrict", "province", "city", "state",
    "country", "postal", "zip", "box", "bangkok", "thailand", "singapore", "london",
    "new", "york", "tokyo", "plaza", "park", "square", "north", "south", "east", "west",
];

/// Abreviações de rótulos de contato
const NOISE_WORDS: &[&str] = &[
    "te", "ee", "tel", "mobile", "mob", "fax", "email", "e-mail", "web", "website", "phone",
    "ph", "www", "ext", "line", "hotline",
];

/// Identifica um léxico por nome (usado pelos predicados de padrão).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexiconKind {
    Title,
    OrgSuffix,
    Address,
    Noise,
}

/// Conjunto de léxicos versionável, carregado uma única vez.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicons {
    pub title: BTreeSet<String>,
    pub org_suffix: BTreeSet<String>,
    pub address: BTreeSet<String>,
    pub noise: BTreeSet<String>,
}

impl Lexicons {
    pub fn get(&self, kind: LexiconKind) -> &BTreeSet<String> {
        match kind {
            LexiconKind::Title => &self.title,
            LexiconKind::OrgSuffix => &self.org_suffix,
            LexiconKind::Address => &self.address,
            LexiconKind::Noise => &self.noise,
        }
    }

    /// Pertinência case-insensitive; um ponto final é ignorado ("Co." == "co").
    pub fn contains(&self, kind: LexiconKind, word: &str) -> bool {
        self.get(kind).contains(&normalize_word(word))
    }

    /// Como [`contains`](Self::contains), para uma palavra já passada por [`normalize_word`].
    pub fn contains_normalized(&self, kind: LexiconKind, word: &str) -> bool {
        self.get(kind).contains(word)
    }

    /// Verifica se alguma palavra (separada por espaço) do texto pertence ao léxico.
    pub fn any_word_in(&self, kind: LexiconKind, text: &str) -> bool {
        text.split_whitespace().any(|w| self.contains(kind, w))
    }

    /// Minúsculas + trim em todas as entradas (aplicado ao carregar de JSON).
    pub fn normalized(self) -> Self {
        let norm = |set: BTreeSet<String>| -> BTreeSet<String> {
            set.into_iter()
                .map(|w| normalize_word(&w))
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            title: norm(self.title),
            org_suffix: norm(self.org_suffix),
            address: norm(self.address),
            noise: norm(self.noise),
        }
    }
}

impl Default for Lexicons {
    fn default() -> Self {
        let set = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            title: set(TITLE_WORDS),
            org_suffix: set(ORG_SUFFIXES),
            address: set(ADDRESS_WORDS),
            noise: set(NOISE_WORDS),
        }
    }
}

/// Forma canônica de uma palavra para consulta: minúsculas, sem pontuação nas bordas
/// (hífens e apóstrofos internos são mantidos).
pub fn normalize_word(word: &str) -> String {
    word.trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let lex = Lexicons::default();
        assert!(lex.contains(LexiconKind::Title, "President"));
        assert!(lex.contains(LexiconKind::OrgSuffix, "Co."));
        assert!(lex.contains(LexiconKind::Noise, "E-mail:"));
        assert!(!lex.contains(LexiconKind::Title, "Kalanyoo"));
    }

    #[test]
    fn test_any_word_in() {
        let lex = Lexicons::default();
        assert!(lex.any_word_in(LexiconKind::Address, "Silom Road"));
        assert!(!lex.any_word_in(LexiconKind::Address, "Jane Carter"));
    }

    #[test]
    fn test_normalized_lowercases_entries() {
        let mut lex = Lexicons::default();
        lex.title.insert("  Chancellor ".to_string());
        let lex = lex.normalized();
        assert!(lex.title.contains("chancellor"));
        assert!(!lex.title.iter().any(|w| w.chars().any(char::is_uppercase)));
    }
}
