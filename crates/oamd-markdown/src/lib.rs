pub mod render;

pub use render::RenderError;

use oamd_core::locale::Messages;
use oamd_core::model::Specification;
use oamd_core::{DocGenerator, GeneratedFile};

/// Fixed name of the produced Markdown artifact.
pub const OUTPUT_FILE_NAME: &str = "api-documentation.md";

/// Renders an assembled specification into one Markdown reference document.
pub struct MarkdownGenerator;

impl DocGenerator for MarkdownGenerator {
    type Error = RenderError;

    fn generate(
        &self,
        spec: &Specification,
        messages: &Messages,
    ) -> Result<GeneratedFile, RenderError> {
        let content = render::render(spec, messages)?;
        Ok(GeneratedFile {
            path: OUTPUT_FILE_NAME.to_string(),
            content,
        })
    }
}
