//! Methods of a Discovery Document, one rpc like operation each.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::discovery_schema::{RawSchema, SchemaId};
use crate::error::ConversionError;
use crate::name::{identifier_fragments, Name};

static EXPANSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\+([^}]+)\}").unwrap());
static SUB_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Index of a method in the arena owned by the [`crate::discovery_document::Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub(crate) usize);

#[derive(Clone, Debug)]
pub struct Method {
    /// Dotted id, like `compute.instances.get`.
    pub id: String,
    /// Dotted key path of the resource the method is declared in.
    pub resource: String,
    pub description: String,
    pub http_method: String,
    pub path: String,
    /// The flat path with a `{+var}` expansion turned into a `{var=...}` pattern, or the path when
    /// the document doesn't have a flat path.
    pub flat_path: String,
    pub parameters: BTreeMap<String, SchemaId>,
    pub path_params: BTreeMap<String, SchemaId>,
    pub query_params: BTreeMap<String, SchemaId>,
    pub parameter_order: Vec<String>,
    pub required_param_names: Vec<String>,
    pub request: Option<SchemaId>,
    pub response: Option<SchemaId>,
    pub scopes: Vec<String>,
    pub api_version: String,
}

impl Method {
    /// Plural methods page through collections, they're the ones taking a `maxResults`.
    pub fn is_plural_method(&self) -> bool {
        self.parameters.contains_key("maxResults")
    }

    /// The last segment of the id, like `get`.
    pub fn verb(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }

    /// The second to last segment of the id, the collection the method works on.
    pub fn collection(&self) -> &str {
        let mut segments = self.id.rsplit('.');
        segments.next();
        segments
            .next()
            .or_else(|| self.resource.rsplit('.').next())
            .unwrap_or_default()
    }

    /// True when the path has a `{+var}` expansion, the var matches multiple segments.
    pub fn has_expansion(&self) -> bool {
        EXPANSION.is_match(&self.path)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawMethod {
    pub id: Option<String>,
    pub path: Option<String>,
    pub flat_path: Option<String>,
    pub http_method: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<BTreeMap<String, RawSchema>>,
    pub parameter_order: Option<Vec<String>>,
    pub request: Option<RawSchema>,
    pub response: Option<RawSchema>,
    pub scopes: Option<Vec<String>>,
    pub api_version: Option<String>,
}

/// Derives the structured flat path from a path with a single `{+var}` expansion. The literal parts
/// around the expansion must be found back in the flat path, what is in between becomes the
/// pattern of the var with each `{..}` replaced by `*`.
/// ```
/// use discovery_proto_converter::discovery_method::normalize_path;
///
/// let normalized = normalize_path(
///     "v1/{+name}:cancel",
///     "v1/projects/{projectsId}/operations/{operationsId}:cancel",
/// );
/// assert_eq!(
///     normalized.unwrap(),
///     "v1/{name=projects/*/operations/*}:cancel"
/// );
/// ```
pub fn normalize_path(path: &str, flat_path: &str) -> Result<String, ConversionError> {
    let markers: Vec<_> = EXPANSION.captures_iter(path).collect();
    let marker = match markers.as_slice() {
        [] => return Ok(flat_path.to_owned()),
        [marker] => marker,
        _ => {
            return Err(ConversionError::format(&format!(
                "Unsupported path '{}', only a single expansion is supported",
                path
            )))
        }
    };
    let (whole, token) = match (marker.get(0), marker.get(1)) {
        (Some(w), Some(t)) => (w, t.as_str()),
        _ => return Err(ConversionError::format(&format!("Invalid path '{}'", path))),
    };
    let prefix = &path[..whole.start()];
    let suffix = &path[whole.end()..];
    if !flat_path.starts_with(prefix)
        || !flat_path.ends_with(suffix)
        || flat_path.len() < prefix.len() + suffix.len()
    {
        return Err(ConversionError::format(&format!(
            "Flat path '{}' doesn't match path '{}'",
            flat_path, path
        )));
    }
    let subresource = &flat_path[prefix.len()..flat_path.len() - suffix.len()];
    let modified = SUB_TOKEN.replace_all(subresource, "*");
    let token = Name::any_camel(&identifier_fragments(token))?.to_lower_underscore();
    Ok(format!("{}{{{}={}}}{}", prefix, token, modified, suffix))
}

#[cfg(test)]
mod tests {
    use crate::discovery_method::normalize_path;
    use crate::error::ErrorKind;

    #[test]
    fn literal_subresource_is_kept() {
        assert_eq!(
            normalize_path("projects/{+project}/zones", "projects/my-project/zones").unwrap(),
            "projects/{project=my-project}/zones"
        );
    }

    #[test]
    fn sub_tokens_collapse() {
        assert_eq!(
            normalize_path("prefix/{+name}/suffix", "prefix/a{b}c{d}e/suffix").unwrap(),
            "prefix/{name=a*c*e}/suffix"
        );
    }

    #[test]
    fn token_is_lower_underscored() {
        assert_eq!(
            normalize_path("v1/{+resourceName}", "v1/projects/{projectsId}").unwrap(),
            "v1/{resource_name=projects/*}"
        );
    }

    #[test]
    fn without_expansion_flat_path_is_returned() {
        assert_eq!(
            normalize_path("projects/{project}", "projects/{project}/x").unwrap(),
            "projects/{project}/x"
        );
    }

    #[test]
    fn two_expansions_are_rejected() {
        let err = normalize_path("projects/{+project}/zones/{+zone}", "anything").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }

    #[test]
    fn mismatching_flat_path_is_rejected() {
        let err = normalize_path("v1/{+name}/suffix", "v2/projects/x/suffix").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
        let err = normalize_path("ab/{+name}/ba", "ab/ba").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Format);
    }
}
