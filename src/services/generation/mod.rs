/// Outfit-text generator abstraction
///
/// The recommendation pipeline only needs "prompt in, raw text out"; which
/// model answers, and over which API, stays behind this trait. Test suites
/// substitute scripted replies without any network.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiClient;

/// Trait for generation backends
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Sends a prompt, optionally with an image the generator should look
    /// at, and returns the reply text verbatim.
    ///
    /// Network, quota, or protocol trouble surfaces as
    /// `GenerationUnavailable`; interpreting the reply is the parser's job.
    async fn generate(&self, prompt: &str, image_url: Option<&str>) -> AppResult<String>;
}
