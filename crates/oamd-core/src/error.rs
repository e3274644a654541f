use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unsupported schema type: {0}")]
    UnsupportedSchema(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error(transparent)]
    Example(#[from] ExampleError),
}

#[derive(Debug, Error)]
pub enum ExampleError {
    #[error("unexpected integer format: {0}")]
    UnsupportedIntegerFormat(String),

    #[error("unexpected number format: {0}")]
    UnsupportedNumberFormat(String),

    #[error("example synthesis is not supported for {0} schemas")]
    NotSupported(&'static str),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("invalid response status code: {0}")]
    InvalidStatusCode(String),

    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),
}

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),
}
