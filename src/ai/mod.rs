pub mod openai;
mod summarizer;

pub use openai::OpenAiClient;
pub use summarizer::generate_weekly_summary;
