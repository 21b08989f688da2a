//! LLM Client Module
//!
//! Thin client layer over the remote generation endpoint:
//! - `types`: chat messages, requests, responses, and the error enum
//! - `provider`: the `LlmProvider` trait and the Google implementation
//! - `retry`: bounded retry with exponential backoff
//! - `refiner`: the wizard-facing facade (questions + final prompt)

pub mod provider;
pub mod refiner;
pub mod retry;
pub mod types;

pub use provider::{GoogleProvider, LlmProvider};
pub use refiner::PromptRefiner;
pub use retry::RetryPolicy;
pub use types::{ChatMessage, ChatRequest, ChatResponse, LlmError, MessageRole, Result};
