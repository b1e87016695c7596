//! Autoregressive decoding loop, independent of the model architecture.

use candle_core::Tensor;
use candle_transformers::generation::LogitsProcessor;
use tracing::debug;

use crate::{GenerationError, SamplingConfig};

/// A causal LM that can be stepped with a KV cache.
pub trait StepModel {
    /// Clears any cached state before a new sequence.
    fn reset(&mut self) -> Result<(), GenerationError>;

    /// Feeds `tokens` starting at absolute position `pos` and returns the 1-D f32 logits for the
    /// next token.
    fn step(&mut self, tokens: &[u32], pos: usize) -> Result<Tensor, GenerationError>;
}

/// Generates until a stop token is sampled or the sequence reaches `max_length` tokens.
///
/// Returns the whole sequence (prompt followed by generated tokens, stop token included).
/// A prompt that is empty or already `max_length` long is rejected as invalid input.
pub fn generate_tokens(
    model: &mut dyn StepModel,
    prompt_ids: &[u32],
    max_length: usize,
    stop_ids: &[u32],
    sampling: &SamplingConfig,
) -> Result<Vec<u32>, GenerationError> {
    if prompt_ids.is_empty() {
        return Err(GenerationError::InvalidInput(
            "Input produced no tokens".to_string(),
        ));
    }
    if prompt_ids.len() >= max_length {
        return Err(GenerationError::InvalidInput(format!(
            "Input length of input_ids is {}, but max_length is set to {}",
            prompt_ids.len(),
            max_length
        )));
    }

    let mut processor =
        LogitsProcessor::new(sampling.seed, sampling.effective_temperature(), None);
    let mut tokens = prompt_ids.to_vec();
    let mut pos = 0;

    model.reset()?;
    while tokens.len() < max_length {
        let logits = model.step(&tokens[pos..], pos)?;
        pos = tokens.len();
        let next = processor.sample(&logits)?;
        tokens.push(next);
        if stop_ids.contains(&next) {
            debug!(token = next, len = tokens.len(), "Stop token sampled");
            break;
        }
    }

    Ok(tokens)
}

/// Drops the final token when it is a stop token; a length-capped sequence is returned whole.
pub fn trim_stop_token<'a>(tokens: &'a [u32], stop_ids: &[u32]) -> &'a [u32] {
    match tokens.split_last() {
        Some((last, rest)) if stop_ids.contains(last) => rest,
        _ => tokens,
    }
}
