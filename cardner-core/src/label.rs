//! # Rótulos Grossos (Coarse Labels)
//!
//! Conjunto fechado de categorias que um trecho de texto pode receber.
//!
//! | Rótulo   | Significado                                   | Exemplo                 |
//! |----------|-----------------------------------------------|-------------------------|
//! | PERSON   | Nome de pessoa vindo do rotulador base/regex   | "Jane Carter"           |
//! | FULLNAME | Nome completo detectado pela regra estrutural  | "Kalanyoo Ammaranon"    |
//! | ORG      | Organização                                    | "Bangkok Bank"          |
//! | TITLE    | Cargo                                          | "Senior Vice President" |
//! | IGNORE   | Ruído de contato (Tel, Fax, ...)              | "Tel"                   |
//! | OTHER    | Qualquer rótulo externo desconhecido           | "GPE"                   |
//!
//! PERSON e FULLNAME representam o mesmo conceito ("nome de pessoa"); a diferença
//! é a procedência. Ambos são pontuados da mesma forma e concorrem ao `top_person`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Person,
    Fullname,
    Org,
    Title,
    Ignore,
    Other,
}

impl Label {
    /// Nome do rótulo como string (para serialização e logs)
    pub fn name(&self) -> &'static str {
        match self {
            Label::Person => "PERSON",
            Label::Fullname => "FULLNAME",
            Label::Org => "ORG",
            Label::Title => "TITLE",
            Label::Ignore => "IGNORE",
            Label::Other => "OTHER",
        }
    }

    /// Traduz um rótulo do conjunto aberto do rotulador base para o conjunto fechado.
    ///
    /// Rótulos desconhecidos viram [`Label::Other`] e são descartados pelo filtro.
    pub fn from_external(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "PERSON" | "PER" => Label::Person,
            "FULLNAME" => Label::Fullname,
            "ORG" | "ORGANIZATION" => Label::Org,
            "TITLE" => Label::Title,
            "IGNORE" => Label::Ignore,
            _ => Label::Other,
        }
    }

    /// PERSON ou FULLNAME
    pub fn is_person_like(&self) -> bool {
        matches!(self, Label::Person | Label::Fullname)
    }

    /// Rótulos que podem chegar ao resultado final
    pub fn is_accepted(&self) -> bool {
        matches!(self, Label::Person | Label::Fullname | Label::Org | Label::Title)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
