pub mod catalog;
pub mod generation;
pub mod parser;
pub mod prompt;
pub mod recommendation;
pub mod rotation;
pub mod scheduler;
pub mod weather;

pub use catalog::ItemCatalog;
pub use generation::{GenerationClient, OpenAiClient};
pub use recommendation::RecommendationService;
pub use rotation::RotationScheduler;
pub use scheduler::{DeferredScheduler, RestorationJob, RestorationTask, TokioScheduler};
pub use weather::{WeatherService, WeatherSnapshot};
