use otlite_core::error::Result;
use otlite_core::model::common::{ResourceDecl, ScopeDecl};

use crate::otlp::extract::{JsonObject, array_field, canonical_attrs, object_field, string_field};

/// Decode the resource declaration of one resource group. A missing resource
/// object resolves to the canonical empty declaration so no stored row ever
/// dangles.
///
/// `schemaUrl` sits on the enclosing group in OTLP/JSON; some emitters put it
/// on the resource object itself, so both spots are honored.
pub(crate) fn decode_resource(group: &JsonObject) -> Result<ResourceDecl> {
    let mut schema_url = string_field(group, "schemaUrl")?;
    let attrs_json = match object_field(group, "resource")? {
        Some(resource) => {
            if schema_url.is_empty() {
                schema_url = string_field(resource, "schemaUrl")?;
            }
            canonical_attrs(array_field(resource, "attributes")?, "resource.attributes")?
        }
        None => "{}".to_string(),
    };
    Ok(ResourceDecl {
        attrs_json,
        schema_url,
    })
}

/// Decode the scope declaration of one scope group, defaulting to the
/// canonical empty scope when the payload omits it.
pub(crate) fn decode_scope(group: &JsonObject) -> Result<ScopeDecl> {
    let mut schema_url = string_field(group, "schemaUrl")?;
    match object_field(group, "scope")? {
        Some(scope) => {
            if schema_url.is_empty() {
                schema_url = string_field(scope, "schemaUrl")?;
            }
            Ok(ScopeDecl {
                name: string_field(scope, "name")?,
                version: string_field(scope, "version")?,
                attrs_json: canonical_attrs(array_field(scope, "attributes")?, "scope.attributes")?,
                schema_url,
            })
        }
        None => Ok(ScopeDecl {
            schema_url,
            ..ScopeDecl::default()
        }),
    }
}
