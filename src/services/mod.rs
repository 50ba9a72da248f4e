pub mod image;
pub mod llm;
pub mod outline;
pub mod prompts;
pub mod slides;
