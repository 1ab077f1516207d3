//! Records accepted by the code graph.
//!
//! These are the explicit shapes handed to the store by the parser, the
//! indexer or a remote client. Each record validates itself so a malformed
//! input is rejected before any write happens.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declaration kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
        };
        write!(f, "{}", s)
    }
}

/// A structural relationship between two types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Type A extends type B.
    Inheritance,
    /// Type A implements interface B.
    Implementation,
    /// Type A mentions type B in a signature.
    Usage,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inheritance => "inheritance",
            Self::Implementation => "implementation",
            Self::Usage => "usage",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class, interface or enum reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Simple name (e.g., "UserService").
    pub name: String,

    /// Package the type lives in. Empty for the default package.
    #[serde(default, alias = "package")]
    pub namespace: String,

    #[serde(default)]
    pub kind: TypeKind,

    #[serde(default)]
    pub modifiers: Vec<String>,

    /// Simple name of the extended class, if any.
    #[serde(default)]
    pub supertype: Option<String>,

    /// Implemented interfaces. For an interface declaration these are the
    /// interfaces it extends.
    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub file_path: String,

    /// 1-based line of the declaration.
    #[serde(default)]
    pub line: u32,

    #[serde(default)]
    pub documentation: Option<String>,
}

impl TypeRecord {
    /// Creates a class record with no attributes beyond its identity.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind: TypeKind::Class,
            modifiers: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            file_path: String::new(),
            line: 0,
            documentation: None,
        }
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<String>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<String>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn with_location(mut self, file_path: impl Into<String>, line: u32) -> Self {
        self.file_path = file_path.into();
        self.line = line;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Checks that the identity fields are usable as graph keys.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name, "type", "name")?;
        check_namespace(&self.namespace, "type", "namespace")
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    /// Simple name of the declared type.
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            modifiers: Vec::new(),
        }
    }
}

/// A method reported by the parser, owned by exactly one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,

    /// Simple name of the owning type.
    pub owner: String,

    /// Namespace of the owning type; used only to locate the owner.
    #[serde(default, alias = "package")]
    pub namespace: String,

    #[serde(default = "default_return_type")]
    pub return_type: String,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    #[serde(default)]
    pub modifiers: Vec<String>,

    #[serde(default)]
    pub documentation: Option<String>,

    /// Source text of the body, absent for abstract methods.
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub line: u32,
}

fn default_return_type() -> String {
    "void".to_string()
}

impl MemberRecord {
    /// Creates a `void` method with no parameters.
    pub fn new(
        owner: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            namespace: namespace.into(),
            return_type: default_return_type(),
            parameters: Vec::new(),
            modifiers: Vec::new(),
            documentation: None,
            body: None,
            line: 0,
        }
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Vec<String>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name, "member", "name")?;
        check_name(&self.owner, "member", "owner")?;
        check_namespace(&self.namespace, "member", "namespace")
    }
}

/// A dependency between two types, as derived from source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipFact {
    pub from: String,
    pub to: String,
    pub kind: RelationKind,

    #[serde(default, alias = "package_from")]
    pub from_namespace: String,

    #[serde(default, alias = "package_to")]
    pub to_namespace: String,
}

impl RelationshipFact {
    /// Creates a fact between two types of the default package.
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            from_namespace: String::new(),
            to_namespace: String::new(),
        }
    }

    pub fn with_namespaces(
        mut self,
        from_namespace: impl Into<String>,
        to_namespace: impl Into<String>,
    ) -> Self {
        self.from_namespace = from_namespace.into();
        self.to_namespace = to_namespace.into();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.from, "relationship", "from")?;
        check_name(&self.to, "relationship", "to")?;
        check_namespace(&self.from_namespace, "relationship", "from_namespace")?;
        check_namespace(&self.to_namespace, "relationship", "to_namespace")
    }
}

// Simple names end up inside identity keys, where '.' and ':' are separators.
fn check_name(
    value: &str,
    record: &'static str,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(record, field, "must not be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(record, field, "must not contain whitespace"));
    }
    if value.contains(['.', ':']) {
        return Err(ValidationError::new(record, field, "must be a simple name"));
    }
    Ok(())
}

fn check_namespace(
    value: &str,
    record: &'static str,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(record, field, "must not contain whitespace"));
    }
    if value.contains(':') {
        return Err(ValidationError::new(record, field, "must not contain ':'"));
    }
    Ok(())
}
