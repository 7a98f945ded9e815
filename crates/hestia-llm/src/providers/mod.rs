/// Anthropic provider
pub mod anthropic;
/// Ollama local provider
pub mod ollama;
/// OpenAI provider
pub mod openai;
