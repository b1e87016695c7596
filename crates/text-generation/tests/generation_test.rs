//! Tests for the public generation surface: decoding loop with a fake model and echo removal.
//!
//! External interactions: none (fake StepModel on CPU tensors).

use candle_core::{Device, Tensor};
use text_generation::{
    generate_tokens, strip_echo, trim_stop_token, GenerationError, SamplingConfig, StepModel,
};

/// Echoes the last input token + 1 (mod vocab) as the most likely next token.
struct Counter {
    vocab: usize,
}

impl StepModel for Counter {
    fn reset(&mut self) -> Result<(), GenerationError> {
        Ok(())
    }

    fn step(&mut self, tokens: &[u32], _pos: usize) -> Result<Tensor, GenerationError> {
        let last = *tokens.last().unwrap() as usize;
        let mut logits = vec![-5f32; self.vocab];
        logits[(last + 1) % self.vocab] = 5.0;
        Ok(Tensor::new(logits.as_slice(), &Device::Cpu)?)
    }
}

fn greedy() -> SamplingConfig {
    SamplingConfig {
        do_sample: false,
        ..SamplingConfig::default()
    }
}

/// **Test: the cap counts prompt tokens too (total length), not only new tokens.**
#[test]
fn max_length_caps_prompt_plus_generated() {
    let mut model = Counter { vocab: 100 };
    let out = generate_tokens(&mut model, &[10, 11, 12], 6, &[], &greedy()).unwrap();
    assert_eq!(out, vec![10, 11, 12, 13, 14, 15]);
}

/// **Test: only a trailing stop token is dropped; a capped sequence keeps its last token.**
#[test]
fn final_token_dropped_only_when_stop() {
    let mut model = Counter { vocab: 100 };
    let stopped = generate_tokens(&mut model, &[10], 50, &[13], &greedy()).unwrap();
    assert_eq!(stopped, vec![10, 11, 12, 13]);
    assert_eq!(trim_stop_token(&stopped, &[13]), &[10, 11, 12]);

    let capped = generate_tokens(&mut model, &[10], 3, &[13], &greedy()).unwrap();
    assert_eq!(trim_stop_token(&capped, &[13]), &[10, 11, 12]);
}

/// **Test: a prompt longer than the cap is a value-validation failure, not a model error.**
#[test]
fn overlong_prompt_is_invalid_input() {
    let mut model = Counter { vocab: 100 };
    let prompt: Vec<u32> = (0..200).collect();
    let err = generate_tokens(&mut model, &prompt, 128, &[], &greedy()).unwrap_err();
    assert!(matches!(err, GenerationError::InvalidInput(_)));
}

/// **Test: same seed gives the same sampled sequence.**
#[test]
fn sampling_is_reproducible_for_a_seed() {
    let sampling = SamplingConfig::default();
    let a = generate_tokens(&mut Counter { vocab: 4 }, &[0], 20, &[], &sampling).unwrap();
    let b = generate_tokens(&mut Counter { vocab: 4 }, &[0], 20, &[], &sampling).unwrap();
    assert_eq!(a, b);
}

/// **Test: output never starts with the prompt after echo removal.**
#[test]
fn stripped_output_never_starts_with_prompt() {
    let prompt = "<|im_start|>user\nhi<|im_end|>\n<|im_start|>assistant\n";
    for generated in ["hello", "", "hi there", prompt] {
        let text = format!("{}{}", prompt, generated);
        let out = strip_echo(&text, prompt);
        assert!(!out.starts_with(prompt), "output {:?}", out);
    }
    assert_eq!(strip_echo(&format!("{}hello", prompt), prompt), "hello");
}
