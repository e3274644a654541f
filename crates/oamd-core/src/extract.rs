use indexmap::IndexMap;

use crate::error::ExtractError;
use crate::model::{
    Endpoint, EndpointParameter, ExchangeContent, HttpMethod, OperationRef, ParameterLocation,
    SpecTag,
};
use crate::parse::components::Components;
use crate::parse::media_type::MediaType;
use crate::parse::operation::Operation;
use crate::parse::parameter::{Parameter, ParameterLocation as ParsedLocation, ParameterOrRef};
use crate::parse::request_body::{RequestBody, RequestBodyOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::spec::OpenApiDocument;
use crate::resolve::SchemaResolver;

/// Walk every (path, method) pair and build the flat endpoint list.
/// Undeclared methods on a path are skipped.
pub fn extract_endpoints(
    doc: &OpenApiDocument,
    resolver: &mut SchemaResolver<'_>,
) -> Result<Vec<Endpoint>, ExtractError> {
    let components = doc.components.as_ref();
    let mut endpoints = Vec::new();

    for (path, item) in &doc.paths {
        let path_params = extract_parameters(&item.parameters, components)?;

        macro_rules! add_op {
            ($method:expr, $op:expr) => {
                if let Some(ref op) = $op {
                    endpoints.push(build_endpoint(
                        $method,
                        path,
                        op,
                        &path_params,
                        components,
                        resolver,
                    )?);
                }
            };
        }

        add_op!(HttpMethod::Get, item.get);
        add_op!(HttpMethod::Post, item.post);
        add_op!(HttpMethod::Put, item.put);
        add_op!(HttpMethod::Delete, item.delete);
        add_op!(HttpMethod::Patch, item.patch);
        add_op!(HttpMethod::Options, item.options);
        add_op!(HttpMethod::Head, item.head);
        add_op!(HttpMethod::Trace, item.trace);
    }

    Ok(endpoints)
}

/// Group operations under their declared tags. Document-declared tags come
/// first in declaration order; tags that only appear on operations follow in
/// first-appearance order. Untagged operations stay out of every grouping.
pub fn extract_tags(doc: &OpenApiDocument, endpoints: &[Endpoint]) -> Vec<SpecTag> {
    let mut by_tag: IndexMap<String, Vec<OperationRef>> = IndexMap::new();
    for endpoint in endpoints {
        for tag in &endpoint.tags {
            by_tag.entry(tag.clone()).or_default().push(OperationRef {
                method: endpoint.method,
                path: endpoint.path.clone(),
            });
        }
    }

    let mut tags = Vec::new();
    for tag in &doc.tags {
        let operations = by_tag.shift_remove(&tag.name).unwrap_or_default();
        tags.push(SpecTag {
            name: tag.name.clone(),
            description: tag.description.clone(),
            operations,
        });
    }
    for (name, operations) in by_tag {
        tags.push(SpecTag {
            name,
            description: None,
            operations,
        });
    }
    tags
}

fn build_endpoint(
    method: HttpMethod,
    path: &str,
    op: &Operation,
    path_params: &[EndpointParameter],
    components: Option<&Components>,
    resolver: &mut SchemaResolver<'_>,
) -> Result<Endpoint, ExtractError> {
    let mut parameters = path_params.to_vec();
    parameters.extend(extract_parameters(&op.parameters, components)?);

    let request = match &op.request_body {
        Some(body) => {
            let body = deref_request_body(body, components)?;
            Some(extract_content(&body.content, resolver)?)
        }
        None => None,
    };

    let mut responses = IndexMap::new();
    for (status, response) in &op.responses {
        let code: u16 = status
            .parse()
            .map_err(|_| ExtractError::InvalidStatusCode(status.clone()))?;
        let response = deref_response(response, components)?;
        responses.insert(code, extract_content(&response.content, resolver)?);
    }

    Ok(Endpoint {
        operation_id: op.operation_id.clone(),
        method,
        path: path.to_string(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        tags: op.tags.clone(),
        parameters,
        request,
        responses,
    })
}

/// Resolve every declared media type's schema, keys in declaration order.
/// Media types without a schema are carried no further.
fn extract_content(
    content: &IndexMap<String, MediaType>,
    resolver: &mut SchemaResolver<'_>,
) -> Result<ExchangeContent, ExtractError> {
    let mut resolved = IndexMap::new();
    for (mime_type, media_type) in content {
        if let Some(ref schema) = media_type.schema {
            resolved.insert(mime_type.clone(), resolver.resolve(schema)?);
        }
    }
    Ok(ExchangeContent { content: resolved })
}

fn extract_parameters(
    params: &[ParameterOrRef],
    components: Option<&Components>,
) -> Result<Vec<EndpointParameter>, ExtractError> {
    params
        .iter()
        .map(|p| {
            let param = deref_parameter(p, components)?;
            Ok(EndpointParameter {
                location: map_location(param.location),
                name: param.name.clone(),
                description: param.description.clone(),
                required: param.required,
            })
        })
        .collect()
}

fn map_location(location: ParsedLocation) -> ParameterLocation {
    match location {
        ParsedLocation::Query => ParameterLocation::Query,
        ParsedLocation::Path => ParameterLocation::Path,
        ParsedLocation::Header => ParameterLocation::Header,
        ParsedLocation::Cookie => ParameterLocation::Cookie,
    }
}

fn deref_parameter<'s>(
    param: &'s ParameterOrRef,
    components: Option<&'s Components>,
) -> Result<&'s Parameter, ExtractError> {
    match param {
        ParameterOrRef::Parameter(p) => Ok(p),
        ParameterOrRef::Ref { ref_path } => {
            let name = strip_component_ref(ref_path, "parameters")?;
            match components.and_then(|c| c.parameters.get(name)) {
                Some(ParameterOrRef::Parameter(p)) => Ok(p),
                _ => Err(ExtractError::UnresolvedRef(ref_path.clone())),
            }
        }
    }
}

fn deref_request_body<'s>(
    body: &'s RequestBodyOrRef,
    components: Option<&'s Components>,
) -> Result<&'s RequestBody, ExtractError> {
    match body {
        RequestBodyOrRef::RequestBody(rb) => Ok(rb),
        RequestBodyOrRef::Ref { ref_path } => {
            let name = strip_component_ref(ref_path, "requestBodies")?;
            match components.and_then(|c| c.request_bodies.get(name)) {
                Some(RequestBodyOrRef::RequestBody(rb)) => Ok(rb),
                _ => Err(ExtractError::UnresolvedRef(ref_path.clone())),
            }
        }
    }
}

fn deref_response<'s>(
    response: &'s ResponseOrRef,
    components: Option<&'s Components>,
) -> Result<&'s Response, ExtractError> {
    match response {
        ResponseOrRef::Response(r) => Ok(r),
        ResponseOrRef::Ref { ref_path } => {
            let name = strip_component_ref(ref_path, "responses")?;
            match components.and_then(|c| c.responses.get(name)) {
                Some(ResponseOrRef::Response(r)) => Ok(r),
                _ => Err(ExtractError::UnresolvedRef(ref_path.clone())),
            }
        }
    }
}

fn strip_component_ref<'s>(
    ref_path: &'s str,
    section: &str,
) -> Result<&'s str, ExtractError> {
    ref_path
        .strip_prefix("#/components/")
        .and_then(|rest| rest.strip_prefix(section))
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| ExtractError::UnresolvedRef(ref_path.to_string()))
}
