//! Utterance-to-intent extraction.
//!
//! Each segmented utterance goes through one schema-constrained extraction
//! call. Calls for a batch run concurrently; each utterance resolves to its
//! own outcome so a malformed response or upstream hiccup on one never
//! cancels its siblings.

use futures::future::join_all;

use crate::error::{MurmurError, Result};
use crate::llm::{prompts, LlmProvider};
use crate::models::{RawSwapExtraction, RawTransferExtraction, SwapIntent, TransferIntent};

/// An extraction error attributed to a single utterance.
#[derive(Debug)]
pub struct ExtractionFailure {
    pub transcript: String,
    pub error: MurmurError,
}

/// Result of one extraction batch: validated intents, the count of
/// utterances the model could not turn into a complete intent (dropped, by
/// contract, without error), and per-utterance failures.
#[derive(Debug)]
pub struct ExtractionOutcome<T> {
    pub intents: Vec<T>,
    pub dropped: usize,
    pub failures: Vec<ExtractionFailure>,
}

#[derive(Clone)]
pub struct IntentExtractor {
    llm: LlmProvider,
}

impl IntentExtractor {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }

    pub async fn extract_transfers(
        &self,
        utterances: &[String],
        known_usernames: &[String],
    ) -> ExtractionOutcome<TransferIntent> {
        let instruction = prompts::transfer_extraction_prompt(known_usernames);

        let calls = utterances.iter().map(|utterance| {
            let instruction = instruction.clone();
            async move {
                let raw: Result<RawTransferExtraction> =
                    self.llm.complete_structured(&instruction, utterance).await;
                raw.map(|r| r.validate(utterance))
            }
        });

        Self::collect(utterances, join_all(calls).await)
    }

    pub async fn extract_swaps(&self, utterances: &[String]) -> ExtractionOutcome<SwapIntent> {
        let instruction = prompts::swap_extraction_prompt();

        let calls = utterances.iter().map(|utterance| {
            let instruction = instruction.clone();
            async move {
                let raw: Result<RawSwapExtraction> =
                    self.llm.complete_structured(&instruction, utterance).await;
                raw.map(|r| r.validate(utterance))
            }
        });

        Self::collect(utterances, join_all(calls).await)
    }

    fn collect<T>(utterances: &[String], results: Vec<Result<Option<T>>>) -> ExtractionOutcome<T> {
        let mut outcome = ExtractionOutcome {
            intents: Vec::new(),
            dropped: 0,
            failures: Vec::new(),
        };

        for (utterance, result) in utterances.iter().zip(results) {
            match result {
                Ok(Some(intent)) => outcome.intents.push(intent),
                Ok(None) => {
                    tracing::debug!(utterance = %utterance, "incomplete extraction dropped");
                    outcome.dropped += 1;
                }
                Err(error) => {
                    tracing::warn!(utterance = %utterance, error = %error, "extraction failed");
                    outcome.failures.push(ExtractionFailure {
                        transcript: utterance.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }
}
