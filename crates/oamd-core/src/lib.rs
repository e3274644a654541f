pub mod assemble;
pub mod error;
pub mod example;
pub mod extract;
pub mod locale;
pub mod model;
pub mod parse;
pub mod resolve;

/// A generated document with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for renderers that produce a document from an assembled specification.
pub trait DocGenerator {
    type Error: std::error::Error;
    fn generate(
        &self,
        spec: &model::Specification,
        messages: &locale::Messages,
    ) -> Result<GeneratedFile, Self::Error>;
}
