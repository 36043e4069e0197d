//! # Pipeline de Extração: Orquestrador com Eventos Observáveis
//!
//! Texto → tokenização → {padrões, rotulador base} → filtro → pontuação →
//! (fallback regex, se necessário) → resolução de conflitos → resultado.
//!
//! Cada passo emite um [`PipelineEvent`] por um canal `mpsc`, permitindo que o
//! servidor WebSocket transmita o "raciocínio" do pipeline em tempo real.
//! A configuração e os padrões compilados são somente leitura: o mesmo
//! [`CardPipeline`] atende requisições concorrentes sem travas.

use std::sync::{mpsc, Arc};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::candidate::{Candidate, RejectReason, Rejected, ScoredEntity, Source};
use crate::config::CardConfig;
use crate::error::Result;
use crate::fallback::RegexFallback;
use crate::filter::{filter, merge_overlapping};
use crate::labeler::{normalize, BaseLabeler, NoopLabeler};
use crate::pattern::PatternSet;
use crate::resolver::{ranked_persons, resolve};
use crate::scorer::score;
use crate::tokenizer::{tokenize, Token};

/// Opções por requisição
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Inclui os candidatos rejeitados em [`Extraction::debug`]
    pub debug: bool,
    /// Inclui a lista de nomes ordenada por confiança em [`Extraction::persons`]
    pub rank_persons: bool,
}

/// Resultado de uma extração.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Entidades aceitas, na ordem em que aparecem no texto
    pub entities: Vec<ScoredEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_person: Option<ScoredEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persons: Option<Vec<ScoredEntity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<Rejected>>,
}

/// Eventos emitidos pelo pipeline durante o processamento.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: Tokenização concluída.
    TokenizationDone { tokens: Vec<Token>, total: usize },
    /// **Passo 2**: Uma fonte de sinal propôs candidatos.
    CandidatesProposed { source: Source, count: usize },
    /// O rotulador base falhou; a requisição continua sem os candidatos dele.
    LabelerFailed { labeler: String, message: String },
    /// **Passo 3**: Candidato descartado pelo filtro, pela pontuação ou pelo resolvedor.
    CandidateRejected { rejected: Rejected },
    /// **Passo 4**: Candidato aceito e pontuado.
    EntityScored { entity: ScoredEntity },
    /// **Passo 5 (opcional)**: O fallback regex encontrou um nome.
    FallbackUsed { entity: ScoredEntity },
    /// **Conclusão**
    Done { extraction: Extraction, processing_ms: u64 },
}

/// O pipeline principal.
///
/// # Modos de Uso
/// - **Sync**: [`extract`](Self::extract) / [`extract_with`](Self::extract_with).
/// - **Lote**: [`extract_batch`](Self::extract_batch), paralelo via rayon.
/// - **Streaming**: [`extract_streaming`](Self::extract_streaming) para UIs reativas (WebSocket).
pub struct CardPipeline {
    config: Arc<CardConfig>,
    patterns: PatternSet,
    fallback: RegexFallback,
    labeler: Box<dyn BaseLabeler>,
}

impl CardPipeline {
    /// Compila padrões e regexes da configuração. Sem rotulador base.
    pub fn new(config: CardConfig) -> Result<Self> {
        config.validate()?;
        let patterns = PatternSet::compile(&config)?;
        Ok(Self {
            config: Arc::new(config),
            patterns,
            fallback: RegexFallback::new()?,
            labeler: Box::new(NoopLabeler),
        })
    }

    /// Pipeline com a configuração embutida
    pub fn with_defaults() -> Result<Self> {
        Self::new(CardConfig::default())
    }

    pub fn with_labeler(mut self, labeler: Box<dyn BaseLabeler>) -> Self {
        self.labeler = labeler;
        self
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn labeler_name(&self) -> &str {
        self.labeler.name()
    }

    pub fn extract(&self, text: &str) -> Extraction {
        self.extract_with(text, ExtractOptions::default())
    }

    /// Processa o texto de forma síncrona e retorna o resultado final.
    pub fn extract_with(&self, text: &str, options: ExtractOptions) -> Extraction {
        let (tx, rx) = mpsc::channel();
        self.extract_streaming(text, options, tx);

        // Consome todos os eventos até o fim
        let mut extraction = Extraction::default();
        while let Ok(event) = rx.recv() {
            if let PipelineEvent::Done { extraction: done, .. } = event {
                extraction = done;
            }
        }
        extraction
    }

    /// Extrai vários textos em paralelo, preservando a ordem de entrada.
    pub fn extract_batch(&self, texts: &[String], options: ExtractOptions) -> Vec<Extraction> {
        texts.par_iter().map(|text| self.extract_with(text, options)).collect()
    }

    /// Executa o pipeline enviando eventos de progresso pelo canal `tx`.
    ///
    /// O último evento é sempre `Done`. Erros de envio (receptor descartado) são ignorados.
    pub fn extract_streaming(&self, text: &str, options: ExtractOptions, tx: mpsc::Sender<PipelineEvent>) {
        let start = std::time::Instant::now();
        let lexicons = &self.config.lexicons;
        let scoring = &self.config.scoring;

        // === Passo 1: Tokenização ===
        let tokens = tokenize(text);
        let _ = tx.send(PipelineEvent::TokenizationDone {
            total: tokens.len(),
            tokens: tokens.clone(),
        });

        if text.trim().is_empty() {
            let _ = tx.send(PipelineEvent::Done {
                extraction: Extraction::default(),
                processing_ms: start.elapsed().as_millis() as u64,
            });
            return;
        }

        let mut rejected: Vec<Rejected> = Vec::new();
        let reject = |rejected: &mut Vec<Rejected>, r: Rejected| {
            let _ = tx.send(PipelineEvent::CandidateRejected { rejected: r.clone() });
            rejected.push(r);
        };

        // === Passo 2: Fontes de sinal ===
        let mut candidates = self.patterns.scan(text, &tokens, lexicons);
        debug!(source = Source::Rule.name(), count = candidates.len(), "candidatos propostos");
        let _ = tx.send(PipelineEvent::CandidatesProposed {
            source: Source::Rule,
            count: candidates.len(),
        });

        let base = match self.labeler.label(text) {
            Ok(raw) => normalize(text, raw),
            Err(err) => {
                warn!(labeler = self.labeler.name(), error = %err, "rotulador base indisponível, seguindo sem ele");
                let _ = tx.send(PipelineEvent::LabelerFailed {
                    labeler: self.labeler.name().to_string(),
                    message: err.to_string(),
                });
                Vec::new()
            }
        };
        debug!(source = Source::BaseLabeler.name(), count = base.len(), "candidatos propostos");
        let _ = tx.send(PipelineEvent::CandidatesProposed {
            source: Source::BaseLabeler,
            count: base.len(),
        });
        candidates.extend(base);

        // === Passo 3: Filtro ===
        let (accepted, filtered_out) = filter(candidates, lexicons);
        for (candidate, reason) in filtered_out {
            let s = score(&candidate.text, candidate.label, lexicons, scoring);
            reject(&mut rejected, rejected_from(candidate, s, reason));
        }

        // === Passo 4: Pontuação ===
        let mut scored = Vec::with_capacity(accepted.len());
        for candidate in accepted {
            let confidence = score(&candidate.text, candidate.label, lexicons, scoring);
            if candidate.label.is_person_like() && confidence < scoring.min_person_confidence {
                reject(&mut rejected, rejected_from(candidate, confidence, RejectReason::LowConfidence));
                continue;
            }
            let entity = ScoredEntity::new(candidate, confidence);
            let _ = tx.send(PipelineEvent::EntityScored { entity: entity.clone() });
            scored.push(entity);
        }

        let (mut entities, subsumed) = merge_overlapping(scored);
        for entity in &subsumed {
            reject(&mut rejected, Rejected::from_entity(entity, RejectReason::Subsumed));
        }

        // === Passo 5: Fallback regex ===
        if !entities.iter().any(|e| e.label.is_person_like()) {
            let (found, fallback_rejected) = self.fallback.find_with_rejections(text, lexicons, scoring);
            for (candidate, reason) in fallback_rejected {
                let s = score(&candidate.text, candidate.label, lexicons, scoring);
                reject(&mut rejected, rejected_from(candidate, s, reason));
            }
            if let Some(candidate) = found {
                let confidence = score(&candidate.text, candidate.label, lexicons, scoring);
                let entity = ScoredEntity::new(candidate, confidence);
                let _ = tx.send(PipelineEvent::FallbackUsed { entity: entity.clone() });
                entities.push(entity);
            }
        }

        // === Passo 6: Resolução de conflitos ===
        let resolution = resolve(entities);
        for entity in &resolution.dropped {
            reject(&mut rejected, Rejected::from_entity(entity, RejectReason::Conflict));
        }

        let mut entities = resolution.entities;
        entities.sort_by_key(|e| e.start);
        debug!(
            tokens = tokens.len(),
            entities = entities.len(),
            rejected = rejected.len(),
            "extração concluída"
        );

        let persons = options
            .rank_persons
            .then(|| ranked_persons(&entities).into_iter().cloned().collect());
        let extraction = Extraction {
            top_person: resolution.top_person,
            persons,
            debug: options.debug.then_some(rejected),
            entities,
        };

        let _ = tx.send(PipelineEvent::Done {
            extraction,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}

fn rejected_from(candidate: Candidate, score: f64, reason: RejectReason) -> Rejected {
    Rejected::new(candidate.text, candidate.label, score, reason, candidate.source)
}
