//! Chat template rendering for the model families the generator can load.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{ChatMessage, MessageRole};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown chat template '{0}' (expected chatml, llama3, llama2 or zephyr)")]
    Unknown(String),
}

/// Chat formats. Each renders a message list and appends the assistant generation prompt,
/// so the model continues with the assistant's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTemplate {
    /// `<|im_start|>role\n...<|im_end|>` (Qwen and other ChatML models).
    ChatMl,
    /// `<|start_header_id|>role<|end_header_id|>\n\n...<|eot_id|>` (Llama 3).
    Llama3,
    /// `[INST] <<SYS>>...<</SYS>> ... [/INST]` (Llama 2 chat).
    Llama2,
    /// `<|role|>\n...</s>` (Zephyr, TinyLlama chat).
    Zephyr,
}

impl ChatTemplate {
    /// Picks the template from the tokenizer vocabulary: `has_token(s)` must return true when `s`
    /// is a single token. Falls back to [`ChatTemplate::Zephyr`], whose markers are plain text.
    pub fn detect(has_token: impl Fn(&str) -> bool) -> Self {
        if has_token("<|start_header_id|>") && has_token("<|eot_id|>") {
            ChatTemplate::Llama3
        } else if has_token("<|im_start|>") && has_token("<|im_end|>") {
            ChatTemplate::ChatMl
        } else {
            ChatTemplate::Zephyr
        }
    }

    /// Renders `messages` and appends the assistant generation prompt.
    pub fn render(&self, messages: &[ChatMessage]) -> String {
        match self {
            ChatTemplate::ChatMl => render_chatml(messages),
            ChatTemplate::Llama3 => render_llama3(messages),
            ChatTemplate::Llama2 => render_llama2(messages),
            ChatTemplate::Zephyr => render_zephyr(messages),
        }
    }

    /// Token strings that end the assistant turn.
    pub fn stop_tokens(&self) -> &'static [&'static str] {
        match self {
            ChatTemplate::ChatMl => &["<|im_end|>", "<|endoftext|>"],
            ChatTemplate::Llama3 => &["<|eot_id|>", "<|end_of_text|>"],
            ChatTemplate::Llama2 | ChatTemplate::Zephyr => &["</s>"],
        }
    }

    /// True when the rendered text already starts with the BOS token, so the tokenizer must not add another.
    pub fn includes_bos(&self) -> bool {
        matches!(self, ChatTemplate::Llama3 | ChatTemplate::Llama2)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChatTemplate::ChatMl => "chatml",
            ChatTemplate::Llama3 => "llama3",
            ChatTemplate::Llama2 => "llama2",
            ChatTemplate::Zephyr => "zephyr",
        }
    }
}

impl fmt::Display for ChatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChatTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chatml" | "qwen" | "im" => Ok(ChatTemplate::ChatMl),
            "llama3" => Ok(ChatTemplate::Llama3),
            "llama2" => Ok(ChatTemplate::Llama2),
            "zephyr" | "tinyllama" => Ok(ChatTemplate::Zephyr),
            other => Err(TemplateError::Unknown(other.to_string())),
        }
    }
}

fn render_chatml(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for m in messages {
        out.push_str("<|im_start|>");
        out.push_str(m.role.as_str());
        out.push('\n');
        out.push_str(&m.content);
        out.push_str("<|im_end|>\n");
    }
    out.push_str("<|im_start|>assistant\n");
    out
}

fn render_llama3(messages: &[ChatMessage]) -> String {
    let mut out = String::from("<|begin_of_text|>");
    for m in messages {
        out.push_str("<|start_header_id|>");
        out.push_str(m.role.as_str());
        out.push_str("<|end_header_id|>\n\n");
        out.push_str(m.content.trim());
        out.push_str("<|eot_id|>");
    }
    out.push_str("<|start_header_id|>assistant<|end_header_id|>\n\n");
    out
}

/// System text is folded into the first user turn, as Llama 2 chat expects.
fn render_llama2(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    let mut pending_system: Option<&str> = None;
    for m in messages {
        match m.role {
            MessageRole::System => pending_system = Some(m.content.as_str()),
            MessageRole::User => {
                out.push_str("<s>[INST] ");
                if let Some(system) = pending_system.take() {
                    out.push_str("<<SYS>>\n");
                    out.push_str(system);
                    out.push_str("\n<</SYS>>\n\n");
                }
                out.push_str(m.content.trim());
                out.push_str(" [/INST]");
            }
            MessageRole::Assistant => {
                out.push(' ');
                out.push_str(m.content.trim());
                out.push_str(" </s>");
            }
        }
    }
    out
}

fn render_zephyr(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for m in messages {
        out.push_str("<|");
        out.push_str(m.role.as_str());
        out.push_str("|>\n");
        out.push_str(&m.content);
        out.push_str("</s>\n");
    }
    out.push_str("<|assistant|>\n");
    out
}
