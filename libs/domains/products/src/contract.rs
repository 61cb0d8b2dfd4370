//! Declared documentation contract of the products resource.
//!
//! Routes, verbs, parameters and responses of the product operations live here
//! as plain data, apart from the handlers that serve them. The contract renders
//! to a Swagger 2.0 fragment that a documentation server merges into an
//! externally assembled document.
//!
//! Schemas behind an [`ExternalRef`] are owned by that external document and
//! are only ever referenced from here.

use serde_json::{json, Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::models::product_definition;

pub const PRODUCTS_TAG: &str = "Products";

pub const PRODUCTS_PATH: &str = "/products";
pub const PRODUCT_PATH: &str = "/products/{product_id}";
pub const PRODUCT_ID_PARAM: &str = "product_id";

/// Key of the product schema under `definitions`.
pub const PRODUCT_DEFINITION: &str = "product";

pub const GET_PRODUCT: &str = "getProduct";
pub const UPDATE_PRODUCT: &str = "updateProduct";
pub const ADD_PRODUCT: &str = "addProduct";

/// Response key used by every product operation.
pub const DEFAULT_RESPONSE: &str = "default";

pub const PRODUCT_STATUS: ExternalRef = ExternalRef::new("#/definitions/product_status");
pub const PRODUCT_ID_IN_PATH_REQUIRED: ExternalRef =
    ExternalRef::new("#/parameters/product_id_in_path_required");
pub const PRODUCT_IN_BODY: ExternalRef = ExternalRef::new("#/parameters/product_in_body");
pub const PRODUCT_RESPONSE: ExternalRef = ExternalRef::new("#/responses/product");

/// A local `$ref` pointer (`#/<section>/<name>`) into the assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExternalRef(&'static str);

impl ExternalRef {
    pub const fn new(pointer: &'static str) -> Self {
        Self(pointer)
    }

    pub fn pointer(&self) -> &'static str {
        self.0
    }

    /// Top-level section of the target, e.g. `parameters`.
    pub fn section(&self) -> Option<&'static str> {
        self.segments().map(|(section, _)| section)
    }

    /// Name of the target inside its section, e.g. `product_in_body`.
    pub fn name(&self) -> Option<&'static str> {
        self.segments().map(|(_, name)| name)
    }

    fn segments(&self) -> Option<(&'static str, &'static str)> {
        self.0.strip_prefix("#/")?.split_once('/')
    }

    pub fn to_json(&self) -> Value {
        json!({ "$ref": self.0 })
    }
}

impl fmt::Display for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
}

impl HttpVerb {
    /// Lower-case key used in a Swagger path item.
    pub fn swagger_key(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpVerb::Get => f.write_str("GET"),
            HttpVerb::Post => f.write_str("POST"),
        }
    }
}

/// A declared parameter. Path parameters are always required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDoc {
    Path {
        name: &'static str,
        reference: ExternalRef,
    },
    Body {
        reference: ExternalRef,
    },
}

impl ParameterDoc {
    pub fn reference(&self) -> ExternalRef {
        match self {
            ParameterDoc::Path { reference, .. } | ParameterDoc::Body { reference } => *reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDoc {
    pub operation_id: &'static str,
    pub verb: HttpVerb,
    pub tags: &'static [&'static str],
    pub parameters: &'static [ParameterDoc],
    pub default_response: ExternalRef,
}

/// A path template with its shared parameters and the operations bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathItemDoc {
    pub path: &'static str,
    pub parameters: &'static [ParameterDoc],
    pub operations: &'static [OperationDoc],
}

const PRODUCT_ID_PATH_PARAM: ParameterDoc = ParameterDoc::Path {
    name: PRODUCT_ID_PARAM,
    reference: PRODUCT_ID_IN_PATH_REQUIRED,
};

const PRODUCT_BODY_PARAM: ParameterDoc = ParameterDoc::Body {
    reference: PRODUCT_IN_BODY,
};

static PRODUCT_PATHS: [PathItemDoc; 2] = [
    PathItemDoc {
        path: PRODUCT_PATH,
        parameters: &[PRODUCT_ID_PATH_PARAM],
        operations: &[
            OperationDoc {
                operation_id: GET_PRODUCT,
                verb: HttpVerb::Get,
                tags: &[PRODUCTS_TAG],
                parameters: &[],
                default_response: PRODUCT_RESPONSE,
            },
            OperationDoc {
                operation_id: UPDATE_PRODUCT,
                verb: HttpVerb::Post,
                tags: &[PRODUCTS_TAG],
                parameters: &[PRODUCT_BODY_PARAM],
                default_response: PRODUCT_RESPONSE,
            },
        ],
    },
    PathItemDoc {
        path: PRODUCTS_PATH,
        parameters: &[],
        operations: &[OperationDoc {
            operation_id: ADD_PRODUCT,
            verb: HttpVerb::Post,
            tags: &[PRODUCTS_TAG],
            parameters: &[PRODUCT_BODY_PARAM],
            default_response: PRODUCT_RESPONSE,
        }],
    },
];

/// Every documented path item of the products resource.
pub fn product_paths() -> &'static [PathItemDoc] {
    &PRODUCT_PATHS
}

/// An operation together with the path item it is declared on.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredOperation {
    pub path_item: &'static PathItemDoc,
    pub operation: &'static OperationDoc,
}

impl DeclaredOperation {
    pub fn path(&self) -> &'static str {
        self.path_item.path
    }

    pub fn verb(&self) -> HttpVerb {
        self.operation.verb
    }

    pub fn operation_id(&self) -> &'static str {
        self.operation.operation_id
    }

    /// Path-level parameters followed by the operation's own.
    pub fn parameters(&self) -> impl Iterator<Item = &'static ParameterDoc> {
        self.path_item
            .parameters
            .iter()
            .chain(self.operation.parameters.iter())
    }

    /// True when `name` is both in the path template and declared as a path parameter.
    pub fn requires_path_param(&self, name: &str) -> bool {
        let placeholder = format!("{{{}}}", name);
        self.path().contains(&placeholder)
            && self
                .parameters()
                .any(|p| matches!(p, ParameterDoc::Path { name: n, .. } if *n == name))
    }

    pub fn body_reference(&self) -> Option<ExternalRef> {
        self.parameters().find_map(|p| match p {
            ParameterDoc::Body { reference } => Some(*reference),
            ParameterDoc::Path { .. } => None,
        })
    }
}

/// All declared operations in declaration order.
pub fn product_operations() -> Vec<DeclaredOperation> {
    product_paths()
        .iter()
        .flat_map(|path_item| {
            path_item
                .operations
                .iter()
                .map(move |operation| DeclaredOperation {
                    path_item,
                    operation,
                })
        })
        .collect()
}

/// Looks up a declared operation by its operation id.
pub fn find_operation(operation_id: &str) -> Option<DeclaredOperation> {
    product_operations()
        .into_iter()
        .find(|op| op.operation_id() == operation_id)
}

fn parameters_json(parameters: &[ParameterDoc]) -> Value {
    Value::Array(parameters.iter().map(|p| p.reference().to_json()).collect())
}

fn operation_json(operation: &OperationDoc) -> Value {
    let mut object = Map::new();
    object.insert("tags".into(), json!(operation.tags));
    object.insert("operationId".into(), json!(operation.operation_id));
    if !operation.parameters.is_empty() {
        object.insert("parameters".into(), parameters_json(operation.parameters));
    }
    object.insert(
        "responses".into(),
        json!({ DEFAULT_RESPONSE: operation.default_response.to_json() }),
    );
    Value::Object(object)
}

fn path_item_json(path_item: &PathItemDoc) -> Value {
    let mut object = Map::new();
    if !path_item.parameters.is_empty() {
        object.insert("parameters".into(), parameters_json(path_item.parameters));
    }
    for operation in path_item.operations {
        object.insert(operation.verb.swagger_key().into(), operation_json(operation));
    }
    Value::Object(object)
}

/// Swagger 2.0 fragment with the products `paths` and the `product` definition.
pub fn swagger_fragment() -> Result<Value, ContractError> {
    let paths: Map<String, Value> = product_paths()
        .iter()
        .map(|item| (item.path.to_string(), path_item_json(item)))
        .collect();

    Ok(json!({
        "paths": paths,
        "definitions": { PRODUCT_DEFINITION: product_definition()? },
    }))
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("'{0}' in the API document must be a JSON object")]
    NotAnObject(&'static str),

    #[error("failed to render product schema: {0}")]
    Schema(#[from] serde_json::Error),
}

fn object_entry<'a>(
    parent: &'a mut Map<String, Value>,
    key: &'static str,
) -> Result<&'a mut Map<String, Value>, ContractError> {
    parent
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or(ContractError::NotAnObject(key))
}

/// Writes the fragment's paths and definitions into `document`.
///
/// Entries declared by the contract replace same-named entries in the document;
/// everything else is left as it was.
pub fn merge_into(document: &mut Value) -> Result<(), ContractError> {
    let fragment = swagger_fragment()?;
    let root = document
        .as_object_mut()
        .ok_or(ContractError::NotAnObject("$"))?;

    for section in ["paths", "definitions"] {
        let target = object_entry(root, section)?;
        if let Some(Value::Object(entries)) = fragment.get(section) {
            for (key, value) in entries {
                target.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(())
}

fn collect_refs(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get("$ref") {
                out.insert(pointer.clone());
            }
            map.values().for_each(|v| collect_refs(v, out));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_refs(v, out)),
        _ => {}
    }
}

/// Every `$ref` the contract emits, sorted and deduplicated.
pub fn referenced_refs() -> Result<Vec<String>, ContractError> {
    let mut refs = BTreeSet::new();
    collect_refs(&swagger_fragment()?, &mut refs);
    Ok(refs.into_iter().collect())
}

/// Local `$ref`s anywhere in `document` whose target does not exist in it.
///
/// Remote references (anything not starting with `#/`) are ignored.
pub fn unresolved_refs(document: &Value) -> Vec<String> {
    let mut refs = BTreeSet::new();
    collect_refs(document, &mut refs);
    refs.into_iter()
        .filter(|pointer| match pointer.strip_prefix('#') {
            Some(path) if path.starts_with('/') => document.pointer(path).is_none(),
            _ => false,
        })
        .collect()
}
