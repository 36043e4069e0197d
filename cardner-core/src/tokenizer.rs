//! # Tokenizador para Cartões de Visita
//!
//! Divide o texto bruto em tokens (palavras e pontuações) preservando os offsets
//! originais e a linha em que cada token aparece. Em um cartão de visita cada
//! linha costuma ser um campo independente (nome, cargo, empresa, telefone),
//! por isso os padrões de múltiplos tokens nunca atravessam uma quebra de linha.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use cardner_core::tokenizer::tokenize;
//!
//! let tokens = tokenize("Jean-Paul O'Neil\nTel: 02-123");
//! // "Jean-Paul", "O'Neil", "Tel", ":", "02-123"
//! assert_eq!(tokens.len(), 5);
//! assert_eq!(tokens[2].line, 1);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// Imutável depois de produzido: os predicados de forma são derivados do texto.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Kalanyoo", ":", "Bank").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
    /// Linha do texto original (começando em 0).
    pub line: usize,
}

impl Token {
    /// Todas as letras são alfabéticas (hífen e apóstrofo internos são tolerados).
    pub fn is_alphabetic(&self) -> bool {
        is_alphabetic_word(&self.text)
    }

    /// Primeira letra maiúscula
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().map(char::is_uppercase).unwrap_or(false)
    }

    pub fn is_all_uppercase(&self) -> bool {
        is_all_uppercase_word(&self.text)
    }

    /// Comprimento em grafemas (acentos combinados contam como um caractere).
    pub fn char_len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Abreviações cujo ponto final faz parte do token (ex: "Co.", "Dr.")
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Mr", "Mrs", "Ms", "Prof", "Co", "Ltd", "Inc", "Corp", "Bhd", "Pte", "St", "Jr", "Sr",
];

/// Palavra feita só de letras, com `-`, `'` ou `’` tolerados ("O'Neil").
pub fn is_alphabetic_word(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && word.chars().all(|c| c.is_alphabetic() || is_inner_joiner(c))
}

/// Tem letras e todas estão em maiúsculas (dígitos e pontuação são ignorados).
pub fn is_all_uppercase_word(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && text.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
}

fn is_inner_joiner(c: char) -> bool {
    c == '-' || c == '\'' || c == '\u{2019}'
}

/// Tokeniza um texto.
///
/// Regras:
/// - Sequências alfanuméricas formam um token; `-`, `'` e `’` entre dois
///   caracteres alfanuméricos continuam o token ("Jean-Paul", "O'Neil").
/// - Um ponto após uma abreviação conhecida é anexado ao token ("Co.").
/// - Qualquer outro caractere não-branco vira um token isolado.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_start = 0;
    let mut current_text = String::new();
    let mut line = 0;
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(byte_pos, ch)) in chars.iter().enumerate() {
        let next_is_alnum = chars
            .get(i + 1)
            .map(|(_, c)| c.is_alphanumeric())
            .unwrap_or(false);

        if ch.is_alphanumeric() {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if is_inner_joiner(ch) && !current_text.is_empty() && next_is_alnum {
            current_text.push(ch);
        } else if ch == '.' && ABBREVIATIONS.contains(&current_text.as_str()) {
            current_text.push('.');
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos, line);
            if ch == '\n' {
                line += 1;
            }
        } else {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos, line);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8(), line);
        }
    }
    flush_token(&mut tokens, &mut current_text, current_start, text.len(), line);

    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize, line: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            text: std::mem::take(text),
            start,
            end,
            index: 0, // será atribuído depois
            line,
        });
    }
}

/// Adiciona um token de pontuação diretamente
fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize, line: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0,
        line,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_card_lines() {
        let tokens = tokenize("Kalanyoo Ammaranon\nTel: 02-123-4567");
        assert_eq!(texts(&tokens), vec!["Kalanyoo", "Ammaranon", "Tel", ":", "02-123-4567"]);
        assert_eq!(tokens[1].line, 0);
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[4].index, 4);
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "  Siam  Commercial Bank ";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_joiners_and_abbreviations() {
        let tokens = tokenize("Jean-Paul O'Neil, Acme Co. - end");
        assert_eq!(
            texts(&tokens),
            vec!["Jean-Paul", "O'Neil", ",", "Acme", "Co.", "-", "end"]
        );
    }

    #[test]
    fn test_shape_predicates() {
        let tokens = tokenize("José IBM x2 Smith-Jones");
        assert!(tokens[0].is_capitalized() && tokens[0].is_alphabetic());
        assert_eq!(tokens[0].char_len(), 4);
        assert!(tokens[1].is_all_uppercase());
        assert!(!tokens[2].is_alphabetic());
        assert!(tokens[3].is_alphabetic());
        assert!(is_alphabetic_word("O\u{2019}Neil"));
        assert!(!is_alphabetic_word("-"));
        assert!(is_all_uppercase_word("ACME 123"));
        assert!(!is_all_uppercase_word("123"));
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }
}
