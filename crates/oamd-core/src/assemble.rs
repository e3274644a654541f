use crate::error::AssembleError;
use crate::example::ExampleSynthesizer;
use crate::extract;
use crate::locale::{Locale, Messages};
use crate::model::Specification;
use crate::parse::spec::OpenApiDocument;
use crate::resolve::SchemaResolver;

/// Per-invocation assembly options. The schema cache and the random source
/// live inside one `assemble` call; concurrent conversions get their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    pub locale: Locale,
    /// Seed for the example random source; reproducible output when set.
    pub seed: Option<u64>,
}

/// Build the renderer-ready `Specification` from a parsed document:
/// resolve every named schema once, extract endpoints, group tags.
pub fn assemble(
    doc: &OpenApiDocument,
    options: &AssembleOptions,
) -> Result<Specification, AssembleError> {
    let messages = Messages::for_locale(options.locale);
    let synthesizer = match options.seed {
        Some(seed) => ExampleSynthesizer::with_seed(seed),
        None => ExampleSynthesizer::new(),
    };

    let catalog = doc.components.as_ref().map(|c| &c.schemas);
    let mut resolver = SchemaResolver::new(catalog, synthesizer, messages);

    let schemas = resolver.resolve_catalog()?;
    let endpoints = extract::extract_endpoints(doc, &mut resolver)?;
    let tags = extract::extract_tags(doc, &endpoints);

    Ok(Specification {
        title: doc.info.title.clone(),
        description: doc.info.description.clone(),
        tags,
        endpoints,
        schemas,
    })
}
