//! Model config: where the weights live and how to sample.
//! Loaded from env: MODEL_PATH (required), MODEL_DTYPE, CHAT_TEMPLATE, TEMPERATURE, SEED.

use anyhow::{Context, Result};
use candle_core::DType;
use prompt::ChatTemplate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{SamplingConfig, DEFAULT_SEED, DEFAULT_TEMPERATURE};

/// Weight dtype the model is loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelDType {
    #[default]
    F32,
    F16,
    BF16,
}

impl ModelDType {
    pub fn as_dtype(&self) -> DType {
        match self {
            ModelDType::F32 => DType::F32,
            ModelDType::F16 => DType::F16,
            ModelDType::BF16 => DType::BF16,
        }
    }
}

impl fmt::Display for ModelDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelDType::F32 => "f32",
            ModelDType::F16 => "f16",
            ModelDType::BF16 => "bf16",
        })
    }
}

impl FromStr for ModelDType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f32" | "float32" => Ok(ModelDType::F32),
            "f16" | "float16" => Ok(ModelDType::F16),
            "bf16" | "bfloat16" => Ok(ModelDType::BF16),
            other => anyhow::bail!("Unknown MODEL_DTYPE '{}' (expected f32, f16 or bf16)", other),
        }
    }
}

/// Generator config. `template = None` means detect from the tokenizer vocabulary.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_path: PathBuf,
    pub dtype: ModelDType,
    pub template: Option<ChatTemplate>,
    pub sampling: SamplingConfig,
}

impl ModelConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            dtype: ModelDType::default(),
            template: None,
            sampling: SamplingConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let model_path = env::var("MODEL_PATH").context("MODEL_PATH not set")?;
        if model_path.trim().is_empty() {
            anyhow::bail!("MODEL_PATH is empty");
        }

        let dtype = match non_empty_var("MODEL_DTYPE") {
            Some(v) => v.parse()?,
            None => ModelDType::default(),
        };
        let template = non_empty_var("CHAT_TEMPLATE")
            .map(|v| v.parse::<ChatTemplate>())
            .transpose()?;
        let temperature = match non_empty_var("TEMPERATURE") {
            Some(v) => v
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid TEMPERATURE: {}", v))?,
            None => DEFAULT_TEMPERATURE,
        };
        let seed = match non_empty_var("SEED") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid SEED: {}", v))?,
            None => DEFAULT_SEED,
        };

        Ok(Self {
            model_path: PathBuf::from(model_path),
            dtype,
            template,
            sampling: SamplingConfig {
                temperature,
                do_sample: true,
                seed,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

#[derive(Deserialize)]
struct WeightIndex {
    weight_map: std::collections::HashMap<String, String>,
}

/// Files of a Hugging Face style model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: Vec<PathBuf>,
}

impl ModelFiles {
    /// Locates `config.json`, `tokenizer.json` and the safetensors weights under `dir`.
    ///
    /// Sharded weights are read from `model.safetensors.index.json`; otherwise a single
    /// `model.safetensors` is expected.
    pub fn discover(dir: &Path) -> Result<Self> {
        let config = require(dir, "config.json")?;
        let tokenizer = require(dir, "tokenizer.json")?;

        let index_path = dir.join("model.safetensors.index.json");
        let weights = if index_path.is_file() {
            let raw = std::fs::read_to_string(&index_path)
                .with_context(|| format!("Failed to read {}", index_path.display()))?;
            let index: WeightIndex = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", index_path.display()))?;
            let shards: BTreeSet<String> = index.weight_map.into_values().collect();
            if shards.is_empty() {
                anyhow::bail!("{} lists no weight files", index_path.display());
            }
            shards
                .into_iter()
                .map(|name| require(dir, &name))
                .collect::<Result<Vec<_>>>()?
        } else {
            vec![require(dir, "model.safetensors")?]
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }
}

fn require(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if !path.is_file() {
        anyhow::bail!("Model file not found: {}", path.display());
    }
    Ok(path)
}
