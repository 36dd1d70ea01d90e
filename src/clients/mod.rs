pub mod guide_retriever;
pub mod llm_client;

pub use guide_retriever::{GuideDocument, GuideRetriever};
pub use llm_client::{OpenAiGenerator, TextGenerator};
