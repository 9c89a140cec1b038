pub mod templates;
pub mod generation;
pub mod retrieval;
pub mod pipeline;
pub mod orchestrator;

pub use generation::{generator_from_config, OllamaGenerator, TextGenerator, UnconfiguredGenerator};
pub use retrieval::{KnowledgeBase, Retriever};
pub use pipeline::{ChainOutcome, FallbackChain};
pub use orchestrator::ChatOrchestrator;
