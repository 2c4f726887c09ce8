//! Render a GraphQL introspection result as SDL-style text.
//!
//! Only object types are rendered, and only one level of `NON_NULL` / `LIST`
//! wrapping is resolved around a field's type. A field declared as
//! `[String!]!` therefore renders as `LIST!`: the inner wrapper has no name, so
//! its kind is printed in its place.

use std::fmt::Write as _;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ToolError;

/// The introspection document sent to a subgraph.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    types {
      name
      kind
      fields {
        name
        type {
          name
          kind
          ofType {
            name
            kind
          }
        }
      }
    }
  }
}
"#;

/// The `__schema` part of an introspection response
#[derive(Debug, Deserialize)]
pub struct IntrospectionSchema {
    pub types: Vec<IntrospectionType>,
}

#[derive(Debug, Deserialize)]
pub struct IntrospectionType {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
}

#[derive(Debug, Deserialize)]
pub struct IntrospectionField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub name: Option<String>,
    pub kind: TypeKind,
    #[serde(default)]
    pub of_type: Option<InnerTypeRef>,
}

/// The single unwrapped level of a [`TypeRef`]
#[derive(Debug, Deserialize)]
pub struct InnerTypeRef {
    pub name: Option<String>,
    pub kind: TypeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    #[serde(other)]
    Unknown,
}

impl TypeKind {
    fn as_str(self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Interface => "INTERFACE",
            TypeKind::Union => "UNION",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
            TypeKind::Unknown => "UNKNOWN",
        }
    }
}

impl IntrospectionSchema {
    /// Parse the raw `__schema` JSON value
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        serde_json::from_value(value)
            .map_err(|e| ToolError::Shape(format!("unexpected introspection shape: {e}")))
    }

    /// Render every non-reserved object type, preserving upstream order.
    pub fn to_text(&self) -> Result<String, ToolError> {
        let mut text = String::new();

        for object in self
            .types
            .iter()
            .filter(|t| t.kind == TypeKind::Object && !t.name.starts_with("__"))
        {
            let _ = writeln!(text, "type {} {{", object.name);
            for field in object.fields.iter().flatten() {
                let _ = writeln!(
                    text,
                    "  {}: {}",
                    field.name,
                    field.field_type.display_name(&field.name)?
                );
            }
            text.push_str("}\n\n");
        }

        Ok(text.trim_end().to_string())
    }
}

impl TypeRef {
    fn display_name(&self, field_name: &str) -> Result<String, ToolError> {
        match self.kind {
            TypeKind::NonNull => Ok(format!("{}!", self.inner_name(field_name)?)),
            TypeKind::List => Ok(format!("[{}]", self.inner_name(field_name)?)),
            _ => Ok(self
                .name
                .clone()
                .unwrap_or_else(|| self.kind.as_str().to_string())),
        }
    }

    fn inner_name(&self, field_name: &str) -> Result<&str, ToolError> {
        let inner = self.of_type.as_ref().ok_or_else(|| {
            ToolError::Shape(format!(
                "field `{field_name}` is {} but has no ofType",
                self.kind.as_str()
            ))
        })?;
        // Only one wrapper level is unwrapped. A nameless inner type is itself a
        // wrapper, so its kind stands in for the name (`[String!]!` prints `LIST!`).
        Ok(inner.name.as_deref().unwrap_or(inner.kind.as_str()))
    }
}
