use log::debug;
use minijinja::{Environment, Value, context};
use thiserror::Error;

use oamd_core::locale::Messages;
use oamd_core::model::{
    Endpoint, EndpointParameter, ExchangeContent, SchemaProperty, SpecTag, Specification,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("failed to serialize example: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Render the whole reference document. Read-only over the specification.
pub fn render(spec: &Specification, messages: &Messages) -> Result<String, RenderError> {
    debug!(
        "rendering {} endpoints across {} tags",
        spec.endpoints.len(),
        spec.tags.len()
    );

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("reference.md.j2", include_str!("../templates/reference.md.j2"))?;
    let tmpl = env.get_template("reference.md.j2")?;

    let toc: Vec<Value> = spec.tags.iter().map(|tag| toc_tag_ctx(spec, tag)).collect();
    let sections: Vec<Value> = spec
        .tags
        .iter()
        .map(|tag| section_ctx(spec, tag, messages))
        .collect::<Result<_, _>>()?;

    let labels = context! {
        parameters_header => messages.parameters_header,
        request_header => messages.request_header,
        response_header => messages.response_header,
        request_example_header => messages.request_example_header,
        response_example_header => messages.response_example_header,
    };

    Ok(tmpl.render(context! {
        title => spec.title.clone(),
        description => spec.description.clone(),
        toc => toc,
        sections => sections,
        labels => labels,
    })?)
}

/// Anchor slug: spaces and slashes become dashes, lowercased.
fn slugify(text: &str) -> String {
    text.replace(' ', "-").replace('/', "-").to_lowercase()
}

fn toc_tag_ctx(spec: &Specification, tag: &SpecTag) -> Value {
    let operations: Vec<Value> = tag
        .operations
        .iter()
        .filter_map(|op| spec.endpoint(op.method, &op.path))
        .map(|endpoint| {
            let summary = endpoint.summary_or_path();
            let slug = slugify(&summary);
            context! { summary => summary, slug => slug }
        })
        .collect();

    context! {
        name => tag.name.clone(),
        slug => slugify(&tag.name),
        operations => operations,
    }
}

fn section_ctx(
    spec: &Specification,
    tag: &SpecTag,
    messages: &Messages,
) -> Result<Value, RenderError> {
    let operations: Vec<Value> = tag
        .operations
        .iter()
        .filter_map(|op| spec.endpoint(op.method, &op.path))
        .map(|endpoint| endpoint_ctx(endpoint, messages))
        .collect::<Result<_, _>>()?;

    Ok(context! {
        name => tag.name.clone(),
        operations => operations,
    })
}

fn endpoint_ctx(endpoint: &Endpoint, messages: &Messages) -> Result<Value, RenderError> {
    let summary = endpoint.summary_or_path();

    let parameters_table = if endpoint.parameters.is_empty() {
        None
    } else {
        Some(parameters_table(&endpoint.parameters, messages))
    };

    let request = match &endpoint.request {
        Some(content) if !content.is_empty() => Some(content_variants(content, messages)?),
        _ => None,
    };

    let responses: Vec<Value> = endpoint
        .responses
        .iter()
        .map(|(status, content)| {
            Ok(context! {
                status => *status,
                variants => content_variants(content, messages)?,
            })
        })
        .collect::<Result<_, RenderError>>()?;

    Ok(context! {
        summary => summary,
        method => endpoint.method.as_str(),
        path => endpoint.path.clone(),
        operation_id => endpoint.operation_id.clone(),
        description => endpoint.description.clone(),
        parameters_table => parameters_table,
        request => request,
        responses => responses,
    })
}

fn content_variants(
    content: &ExchangeContent,
    messages: &Messages,
) -> Result<Vec<Value>, RenderError> {
    content
        .content
        .iter()
        .map(|(mime_type, node)| {
            let fence = fence_language(mime_type)?;
            let example = serde_json::to_string_pretty(&node.example)?;
            Ok(context! {
                mime => mime_type.clone(),
                table => properties_table(&node.properties, messages),
                fence => fence,
                example => example,
            })
        })
        .collect()
}

/// Only JSON examples can be rendered; any other declared media type is an
/// unsupported operation at this point.
fn fence_language(mime_type: &str) -> Result<&'static str, RenderError> {
    match mime_type {
        "application/json" => Ok("json"),
        other => Err(RenderError::UnsupportedMediaType(other.to_string())),
    }
}

fn markdown_table(messages: &Messages, rows: &[[String; 4]]) -> String {
    let mut table = format!(
        "| {} | {} | {} | {} |\n|----|----|----|----|\n",
        messages.th_type, messages.th_name, messages.th_description, messages.th_required
    );
    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row[0], row[1], row[2], row[3]
        ));
    }
    table
}

fn properties_table(properties: &[SchemaProperty], messages: &Messages) -> String {
    let rows: Vec<[String; 4]> = properties
        .iter()
        .map(|property| {
            let item_label = property
                .schema
                .item_schema
                .as_ref()
                .and_then(|item| item.display_name().map(str::to_string));
            [
                messages.property_type(property.type_name, item_label.as_deref()),
                property.name.clone(),
                property
                    .description
                    .clone()
                    .unwrap_or_else(|| "—".to_string()),
                required_mark(property.required),
            ]
        })
        .collect();
    markdown_table(messages, &rows)
}

fn parameters_table(parameters: &[EndpointParameter], messages: &Messages) -> String {
    let rows: Vec<[String; 4]> = parameters
        .iter()
        .map(|parameter| {
            [
                messages.parameter_location(parameter.location).to_string(),
                parameter.name.clone(),
                parameter.description.clone().unwrap_or_default(),
                required_mark(parameter.required),
            ]
        })
        .collect();
    markdown_table(messages, &rows)
}

fn required_mark(required: bool) -> String {
    if required { "+" } else { "-" }.to_string()
}
