pub mod extractor;
pub mod fit;
pub mod handlers;
pub mod vocabulary;
