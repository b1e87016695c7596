//! [`TextGenerator`] backed by candle: a Llama or Qwen2 causal LM loaded from safetensors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::{llama, qwen2};
use prompt::ChatTemplate;
use serde::Deserialize;
use tokenizers::Tokenizer;
use tracing::{debug, info, instrument, warn};

use crate::{
    generate_tokens, trim_stop_token, Completion, GenerationError, GenerationRequest,
    ModelConfig, ModelFiles, SamplingConfig, StepModel, TextGenerator,
};

/// Architectures this generator can load, keyed by `model_type` in config.json.
enum CausalLm {
    Llama {
        model: llama::Llama,
        cache: llama::Cache,
        config: llama::Config,
        dtype: DType,
        device: Device,
    },
    Qwen2 {
        model: qwen2::ModelForCausalLM,
        device: Device,
    },
}

impl CausalLm {
    fn device(&self) -> &Device {
        match self {
            CausalLm::Llama { device, .. } | CausalLm::Qwen2 { device, .. } => device,
        }
    }
}

impl StepModel for CausalLm {
    fn reset(&mut self) -> Result<(), GenerationError> {
        match self {
            CausalLm::Llama {
                cache,
                config,
                dtype,
                device,
                ..
            } => *cache = llama::Cache::new(true, *dtype, config, device)?,
            CausalLm::Qwen2 { model, .. } => model.clear_kv_cache(),
        }
        Ok(())
    }

    fn step(&mut self, tokens: &[u32], pos: usize) -> Result<Tensor, GenerationError> {
        let input = Tensor::new(tokens, self.device())?.unsqueeze(0)?;
        let logits = match self {
            // (batch, vocab)
            CausalLm::Llama { model, cache, .. } => model.forward(&input, pos, cache)?.squeeze(0)?,
            // (batch, 1, vocab)
            CausalLm::Qwen2 { model, .. } => model.forward(&input, pos)?.squeeze(0)?.squeeze(0)?,
        };
        Ok(logits.to_dtype(DType::F32)?)
    }
}

#[derive(Deserialize)]
struct Architecture {
    model_type: Option<String>,
}

struct Inner {
    model: Mutex<CausalLm>,
    tokenizer: Tokenizer,
    template: ChatTemplate,
    stop_ids: Vec<u32>,
    sampling: SamplingConfig,
    requests: AtomicU64,
}

/// Local causal LM. Cheap to clone; clones share the model, one inference runs at a time.
#[derive(Clone)]
pub struct CandleGenerator {
    inner: Arc<Inner>,
}

impl CandleGenerator {
    /// Loads tokenizer, config and weights from `config.model_path`. Blocking; call at startup.
    #[instrument(skip(config), fields(model_path = %config.model_path.display()))]
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let files = ModelFiles::discover(&config.model_path)?;
        let device = Device::cuda_if_available(0)?;
        let dtype = config.dtype.as_dtype();

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", files.tokenizer.display(), e))?;
        let template = config
            .template
            .unwrap_or_else(|| ChatTemplate::detect(|t| tokenizer.token_to_id(t).is_some()));
        let stop_ids: Vec<u32> = template
            .stop_tokens()
            .iter()
            .filter_map(|t| tokenizer.token_to_id(t))
            .collect();
        if stop_ids.is_empty() {
            warn!(template = %template, "No stop token in vocabulary; replies run to the length cap");
        }

        let raw = std::fs::read(&files.config)
            .with_context(|| format!("Failed to read {}", files.config.display()))?;
        let arch: Architecture = serde_json::from_slice(&raw)
            .with_context(|| format!("Failed to parse {}", files.config.display()))?;
        let model_type = arch.model_type.unwrap_or_else(|| "llama".to_string());

        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&files.weights, dtype, &device)? };
        let model = match model_type.as_str() {
            "llama" => {
                let llama_config: llama::LlamaConfig = serde_json::from_slice(&raw)
                    .context("config.json is not a Llama config")?;
                let llama_config = llama_config.into_config(false);
                let model = llama::Llama::load(vb, &llama_config)?;
                let cache = llama::Cache::new(true, dtype, &llama_config, &device)?;
                CausalLm::Llama {
                    model,
                    cache,
                    config: llama_config,
                    dtype,
                    device: device.clone(),
                }
            }
            "qwen2" => {
                let qwen_config: qwen2::Config =
                    serde_json::from_slice(&raw).context("config.json is not a Qwen2 config")?;
                CausalLm::Qwen2 {
                    model: qwen2::ModelForCausalLM::new(&qwen_config, vb)?,
                    device: device.clone(),
                }
            }
            other => anyhow::bail!("Unsupported model_type '{}' (expected llama or qwen2)", other),
        };

        info!(
            model_type = %model_type,
            template = %template,
            dtype = %config.dtype,
            device = ?device,
            stop_ids = ?stop_ids,
            "Model loaded"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                model: Mutex::new(model),
                tokenizer,
                template,
                stop_ids,
                sampling: config.sampling,
                requests: AtomicU64::new(0),
            }),
        })
    }
}

impl Inner {
    fn run(&self, request: &GenerationRequest) -> Result<Completion, GenerationError> {
        // Distinct seed per request.
        let n = self.requests.fetch_add(1, Ordering::Relaxed);
        let sampling = SamplingConfig {
            seed: self.sampling.seed.wrapping_add(n),
            ..self.sampling
        };

        let mut model = self
            .model
            .lock()
            .map_err(|_| GenerationError::Worker("model lock poisoned".to_string()))?;
        complete(
            &self.tokenizer,
            self.template,
            &mut *model,
            &self.stop_ids,
            request,
            &sampling,
        )
    }
}

/// Renders `request` with `template`, generates with `model` and decodes prompt and sequence.
pub(crate) fn complete(
    tokenizer: &Tokenizer,
    template: ChatTemplate,
    model: &mut dyn StepModel,
    stop_ids: &[u32],
    request: &GenerationRequest,
    sampling: &SamplingConfig,
) -> Result<Completion, GenerationError> {
    let rendered = template.render(&request.messages());
    let add_special = !template.includes_bos();
    let prompt_ids = tokenizer
        .encode(rendered.as_str(), add_special)?
        .get_ids()
        .to_vec();
    // Tokens the tokenizer put in front of the text (e.g. BOS) are not part of the echo.
    let skip = if add_special {
        let plain = tokenizer.encode(rendered.as_str(), false)?;
        added_prefix_len(&prompt_ids, plain.get_ids())
    } else {
        0
    };

    let tokens = generate_tokens(model, &prompt_ids, request.max_tokens, stop_ids, sampling)?;
    let kept = trim_stop_token(&tokens, stop_ids);
    debug!(
        prompt_tokens = prompt_ids.len(),
        generated = kept.len() - prompt_ids.len(),
        "Generation finished"
    );

    // The prompt is decoded the same way as the sequence so the echo matches byte for byte.
    let prompt = tokenizer.decode(&prompt_ids[skip..], false)?;
    let text = tokenizer.decode(&kept[skip..], false)?;
    Ok(Completion { prompt, text })
}

/// Length of the prefix `full` has in front of `plain`, or 0 when `full` does not end with it.
fn added_prefix_len(full: &[u32], plain: &[u32]) -> usize {
    if full.ends_with(plain) {
        full.len() - plain.len()
    } else {
        0
    }
}

#[async_trait]
impl TextGenerator for CandleGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Completion, GenerationError> {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || inner.run(&request))
            .await
            .map_err(|e| GenerationError::Worker(e.to_string()))?
    }
}
