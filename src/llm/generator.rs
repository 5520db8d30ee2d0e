//! Text generation behind the `Generator` capability, with a local FLAN-T5
//! implementation on Candle

use crate::error::{AssistantError, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use candle_transformers::models::t5;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Produces text for a prompt. Decoding is deterministic; `max_length`
/// bounds the generated sequence in tokens.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str, max_length: usize) -> Result<String>;

    fn model_name(&self) -> &str;
}

const DEVICE_ENV: &str = "JOB_ASSISTANT_DEVICE";

/// Best available device (GPU when compiled in, CPU fallback)
pub fn get_best_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Using CUDA GPU for generation");
            return device;
        }
    }

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal GPU for generation");
                return device;
            }
            Err(e) => warn!("Metal GPU initialization failed: {}", e),
        }
    }

    info!("Using CPU for generation");
    Device::Cpu
}

/// Device honouring the `JOB_ASSISTANT_DEVICE` override
pub fn get_device_with_override() -> Result<Device> {
    let Ok(preference) = std::env::var(DEVICE_ENV) else {
        return Ok(get_best_device());
    };

    match preference.to_lowercase().as_str() {
        "cpu" => Ok(Device::Cpu),
        "cuda" => {
            #[cfg(feature = "cuda")]
            {
                Device::new_cuda(0).map_err(|e| {
                    AssistantError::ModelLoading(format!("Failed to initialize CUDA: {}", e))
                })
            }
            #[cfg(not(feature = "cuda"))]
            {
                Err(AssistantError::ModelLoading(
                    "CUDA support not compiled in".to_string(),
                ))
            }
        }
        "metal" => {
            #[cfg(feature = "metal")]
            {
                Device::new_metal(0).map_err(|e| {
                    AssistantError::ModelLoading(format!("Failed to initialize Metal: {}", e))
                })
            }
            #[cfg(not(feature = "metal"))]
            {
                Err(AssistantError::ModelLoading(
                    "Metal support not compiled in".to_string(),
                ))
            }
        }
        other => {
            warn!("Unknown device '{}', falling back to auto-detection", other);
            Ok(get_best_device())
        }
    }
}

struct LoadedT5 {
    model: t5::T5ForConditionalGeneration,
    tokenizer: Tokenizer,
    config: t5::Config,
    device: Device,
}

impl LoadedT5 {
    fn load(model_dir: &Path) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading T5 model from: {}", model_dir.display());

        let device = get_device_with_override()?;

        let tokenizer = Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(|e| {
            AssistantError::ModelLoading(format!("Failed to load tokenizer: {}", e))
        })?;

        let config_content = std::fs::read_to_string(model_dir.join("config.json"))
            .map_err(|e| AssistantError::ModelLoading(format!("Failed to read model config: {}", e)))?;
        let config: t5::Config = serde_json::from_str(&config_content).map_err(|e| {
            AssistantError::ModelLoading(format!("Failed to parse T5 config: {}", e))
        })?;

        let weights = model_dir.join("model.safetensors");
        // Safety: the weights file is not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device) }
            .map_err(|e| AssistantError::ModelLoading(format!("Failed to map weights: {}", e)))?;
        let model = t5::T5ForConditionalGeneration::load(vb, &config)
            .map_err(|e| AssistantError::ModelLoading(format!("Failed to build T5 model: {}", e)))?;

        info!("T5 model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            tokenizer,
            config,
            device,
        })
    }

    /// Greedy decoding until EOS or `max_length` decoder positions
    fn generate(&mut self, prompt: &str, max_length: usize) -> Result<String> {
        let start_time = Instant::now();
        self.model.clear_kv_cache();

        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| AssistantError::Generation(format!("Failed to tokenize prompt: {}", e)))?;
        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let encoder_output = self.model.encode(&input_ids)?;

        let start_token = self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32;
        let mut output_ids = vec![start_token];

        for index in 0..max_length.saturating_sub(1) {
            let decoder_ids = if index == 0 || !self.config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = self.model.decode(&decoder_ids, &encoder_output)?.squeeze(0)?;
            let next_token = logits.argmax(D::Minus1)?.to_scalar::<u32>()?;

            if next_token as usize == self.config.eos_token_id {
                break;
            }
            output_ids.push(next_token);
        }

        let text = self
            .tokenizer
            .decode(&output_ids[1..], true)
            .map_err(|e| AssistantError::Generation(format!("Failed to decode output: {}", e)))?;

        debug!(
            "Generated {} tokens from {} prompt tokens in {}ms",
            output_ids.len() - 1,
            encoding.get_ids().len(),
            start_time.elapsed().as_millis()
        );

        Ok(text.trim().to_string())
    }
}

/// FLAN-T5 text2text generator. Weights load on first use and are reused
/// for the rest of the process.
pub struct T5Generator {
    model_dir: PathBuf,
    model_name: String,
    state: Mutex<Option<LoadedT5>>,
}

impl T5Generator {
    pub fn new(model_dir: PathBuf, model_name: impl Into<String>) -> Self {
        Self {
            model_dir,
            model_name: model_name.into(),
            state: Mutex::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl Generator for T5Generator {
    fn generate(&self, prompt: &str, max_length: usize) -> Result<String> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| AssistantError::Generation("generator lock poisoned".to_string()))?;

        if state.is_none() {
            *state = Some(LoadedT5::load(&self.model_dir)?);
        }

        match state.as_mut() {
            Some(loaded) => loaded.generate(prompt, max_length),
            None => Err(AssistantError::ModelLoading(format!(
                "Model '{}' is not loaded",
                self.model_name
            ))),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
