//! Text Generator Adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `AnthropicTextGenerator` - Anthropic Claude models via the Messages API
//! - `OfflineTextGenerator` - Deterministic persona templates, no network
//! - `MockTextGenerator` - Configurable mock for testing

mod anthropic_generator;
mod mock_generator;
mod offline_generator;

pub use anthropic_generator::{AnthropicConfig, AnthropicTextGenerator};
pub use mock_generator::MockTextGenerator;
pub use offline_generator::OfflineTextGenerator;
