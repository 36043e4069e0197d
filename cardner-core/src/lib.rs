//! # cardner-core: Extração de Entidades em Cartões de Visita
//!
//! Este crate extrai nomes de pessoas, cargos e organizações de texto livre de
//! cartões de visita (tipicamente a saída de um OCR), separando-os do ruído de
//! contato (telefone, e-mail, site). Não há modelo treinado: é um pequeno motor
//! de classificação explicável, feito de heurísticas componíveis.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: Texto bruto (String).
//! 2.  **Tokenização** ([`tokenizer`]): tokens com offsets e número da linha.
//! 3.  **Fontes de sinal**:
//!     *   **Padrões** ([`pattern`]): cargos, organizações, nomes completos e ruído, sobre os [`lexicon`]s.
//!     *   **Rotulador base** ([`labeler`]): colaborador externo, normalizado para o mesmo formato.
//! 4.  **Filtro** ([`filter`]): descarta IGNORE e trechos estruturalmente inválidos.
//! 5.  **Pontuação** ([`scorer`]): confiança em [0, 1] por heurísticas de forma e conteúdo.
//! 6.  **Fallback** ([`fallback`]): regex linha a linha quando nenhum nome sobreviveu.
//! 7.  **Resolução** ([`resolver`]): um único FULLNAME, ranking de nomes e `top_person`.
//! 8.  **Saída**: [`Extraction`] com entidades, melhor palpite e diagnósticos opcionais.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use cardner_core::{CardPipeline, Label};
//!
//! // 1. Compila a configuração embutida (léxicos + padrões)
//! let pipeline = CardPipeline::with_defaults().unwrap();
//!
//! // 2. Texto do cartão
//! let text = "Kalanyoo Ammaranon\nSenior Vice President\nBangkok Bank\nTel: 02-123-4567";
//!
//! // 3. Extrai as entidades
//! let extraction = pipeline.extract(text);
//!
//! for entity in &extraction.entities {
//!     println!("Entidade: {} ({}) - Confiança: {:.2}", entity.text, entity.label, entity.confidence);
//! }
//! assert_eq!(extraction.entities.len(), 3);
//! assert_eq!(extraction.top_person.unwrap().label, Label::Fullname);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador principal que conecta todos os estágios.
//! - [`config`]: Configuração versionada, carregável de JSON.
//! - [`candidate`]: Tipos de candidatos, entidades e motivos de rejeição.

pub mod candidate;
pub mod config;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod label;
pub mod labeler;
pub mod lexicon;
pub mod pattern;
pub mod pipeline;
pub mod resolver;
pub mod scorer;
pub mod tokenizer;

pub use candidate::{Candidate, RejectReason, Rejected, ScoredEntity, Source};
pub use config::{CardConfig, ScoringConfig};
pub use error::{CardError, Result};
pub use label::Label;
pub use labeler::{BaseLabeler, FnLabeler, NoopLabeler, RawCandidate, StaticLabeler};
pub use pipeline::{CardPipeline, ExtractOptions, Extraction, PipelineEvent};
pub use tokenizer::{tokenize, Token};
