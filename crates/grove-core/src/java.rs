//! Java source extraction.
//!
//! Walks the tree-sitter AST of a `.java` file and produces the records the
//! graph store understands: one [`TypeRecord`] per class, interface or enum
//! (nested declarations included) and one [`MemberRecord`] per method.
//! Constructors and fields are not members in this model.

use crate::error::{ParseError, Result};
use crate::record::{MemberRecord, Parameter, TypeKind, TypeRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tree_sitter::{Node, Parser};

/// A type declaration together with the methods it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedType {
    pub record: TypeRecord,
    pub members: Vec<MemberRecord>,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    /// Declared package, empty for the default package.
    pub package: String,
    /// Import paths as written; wildcard imports end in `.*`.
    pub imports: Vec<String>,
    pub types: Vec<ParsedType>,
}

/// Tree-sitter backed Java parser.
///
/// Holds one configured parser so it can be reused across many files.
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    /// Creates a parser configured for Java.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .map_err(|e| ParseError::ParserError(format!("Failed to set language: {}", e)))?;
        Ok(Self { parser })
    }

    /// File extensions this parser accepts.
    pub fn extensions() -> &'static [&'static str] {
        &["java"]
    }

    /// Reads and parses a file from disk.
    ///
    /// # Errors
    ///
    /// Fails when the extension is not `.java`, the file cannot be read or
    /// is empty. Syntax errors are tolerated: whatever parsed cleanly is
    /// still returned.
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| Self::extensions().contains(&ext));
        if !supported {
            return Err(ParseError::UnsupportedLanguage(path.to_path_buf()));
        }

        let source = fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
        self.parse_source(&source, &path.to_string_lossy())
    }

    /// Parses Java source text. `file_path` is recorded on every type.
    pub fn parse_source(&mut self, source: &str, file_path: &str) -> Result<ParsedFile> {
        if source.trim().is_empty() {
            return Err(ParseError::EmptyFile(PathBuf::from(file_path)));
        }

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::ParserError("Tree-sitter returned no tree".into()))?;
        let root = tree.root_node();

        if root.has_error() {
            debug!("Syntax errors in {}, extracting what parsed", file_path);
        }

        let mut file = ParsedFile {
            path: file_path.to_string(),
            ..ParsedFile::default()
        };

        for i in 0..root.child_count() {
            if let Some(child) = root.child(i) {
                match child.kind() {
                    "package_declaration" => {
                        if let Some(package) = extract_package(&child, source) {
                            file.package = package;
                        }
                    }
                    "import_declaration" => {
                        if let Some(import) = extract_import(&child, source) {
                            file.imports.push(import);
                        }
                    }
                    _ => {}
                }
            }
        }

        let package = file.package.clone();
        collect_types(&root, source, file_path, &package, &mut file.types);

        Ok(file)
    }
}

/// Recursively collects type declarations, nested ones included.
fn collect_types(
    node: &Node,
    source: &str,
    file_path: &str,
    package: &str,
    types: &mut Vec<ParsedType>,
) {
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else {
            continue;
        };

        let kind = match child.kind() {
            "class_declaration" => TypeKind::Class,
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            _ => {
                collect_types(&child, source, file_path, package, types);
                continue;
            }
        };

        if let Some(parsed) = extract_type(&child, kind, source, file_path, package) {
            types.push(parsed);
        }
        if let Some(body) = child.child_by_field_name("body") {
            collect_types(&body, source, file_path, package, types);
        }
    }
}

/// Extracts a class, interface or enum and its methods.
fn extract_type(
    node: &Node,
    kind: TypeKind,
    source: &str,
    file_path: &str,
    package: &str,
) -> Option<ParsedType> {
    let name_node = node.child_by_field_name("name")?;
    let name = get_text(&name_node, source);

    let mut record = TypeRecord::new(name.as_str(), package)
        .with_kind(kind)
        .with_modifiers(extract_modifiers(node, source))
        .with_location(file_path, node.start_position().row as u32 + 1);

    if let Some(doc) = extract_javadoc(node, source) {
        record = record.with_documentation(doc);
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            match child.kind() {
                "superclass" => {
                    record.supertype = first_type_name(&child, source);
                }
                "super_interfaces" | "extends_interfaces" => {
                    record.interfaces.extend(type_list_names(&child, source));
                }
                _ => {}
            }
        }
    }

    let members = node
        .child_by_field_name("body")
        .map(|body| extract_methods(&body, source, &name, package))
        .unwrap_or_default();

    Some(ParsedType { record, members })
}

/// Extracts the methods declared directly in a type body.
fn extract_methods(body: &Node, source: &str, owner: &str, package: &str) -> Vec<MemberRecord> {
    let mut members = Vec::new();

    for i in 0..body.child_count() {
        if let Some(child) = body.child(i) {
            match child.kind() {
                "method_declaration" => {
                    if let Some(member) = extract_method(&child, source, owner, package) {
                        members.push(member);
                    }
                }
                // Enum methods live one level down.
                "enum_body_declarations" => {
                    members.extend(extract_methods(&child, source, owner, package));
                }
                _ => {}
            }
        }
    }

    members
}

/// Extracts a method declaration.
fn extract_method(node: &Node, source: &str, owner: &str, package: &str) -> Option<MemberRecord> {
    let name_node = node.child_by_field_name("name")?;
    let name = get_text(&name_node, source);

    let return_type = node
        .child_by_field_name("type")
        .and_then(|n| simple_type_name(&n, source))
        .unwrap_or_else(|| "void".to_string());

    let parameters = node
        .child_by_field_name("parameters")
        .map(|n| extract_parameters(&n, source))
        .unwrap_or_default();

    let mut member = MemberRecord::new(owner, package, name)
        .with_return_type(return_type)
        .with_parameters(parameters)
        .with_modifiers(extract_modifiers(node, source))
        .with_line(node.start_position().row as u32 + 1);

    if let Some(body) = node.child_by_field_name("body") {
        member = member.with_body(get_text(&body, source));
    }
    if let Some(doc) = extract_javadoc(node, source) {
        member = member.with_documentation(doc);
    }

    Some(member)
}

/// Extracts formal parameters, varargs included.
fn extract_parameters(node: &Node, source: &str) -> Vec<Parameter> {
    let mut params = Vec::new();

    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else {
            continue;
        };

        let (name, type_name) = match child.kind() {
            "formal_parameter" => {
                let name = child.child_by_field_name("name").map(|n| get_text(&n, source));
                let type_name = child
                    .child_by_field_name("type")
                    .and_then(|n| simple_type_name(&n, source));
                (name, type_name)
            }
            "spread_parameter" => {
                let mut name = None;
                let mut type_name = None;
                for j in 0..child.named_child_count() {
                    if let Some(part) = child.named_child(j) {
                        if part.kind() == "variable_declarator" {
                            name = part.child_by_field_name("name").map(|n| get_text(&n, source));
                        } else if type_name.is_none() {
                            type_name = simple_type_name(&part, source);
                        }
                    }
                }
                (name, type_name)
            }
            _ => continue,
        };

        if let (Some(name), Some(type_name)) = (name, type_name) {
            let mut param = Parameter::new(name, type_name);
            param.modifiers = extract_modifiers(&child, source);
            params.push(param);
        }
    }

    params
}

/// Extracts package declaration.
fn extract_package(node: &Node, source: &str) -> Option<String> {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == "scoped_identifier" || child.kind() == "identifier" {
                return Some(get_text(&child, source));
            }
        }
    }
    None
}

/// Extracts an import path, keeping the `.*` of wildcard imports.
fn extract_import(node: &Node, source: &str) -> Option<String> {
    let mut path = None;
    let mut wildcard = false;

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            match child.kind() {
                "scoped_identifier" | "identifier" => path = Some(get_text(&child, source)),
                "asterisk" => wildcard = true,
                _ => {}
            }
        }
    }

    path.map(|p| if wildcard { format!("{}.*", p) } else { p })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Gets text content of a node.
fn get_text(node: &Node, source: &str) -> String {
    source[node.byte_range()].to_string()
}

/// Collects modifier keywords, skipping annotations.
fn extract_modifiers(node: &Node, source: &str) -> Vec<String> {
    let mut modifiers = Vec::new();

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            if child.kind() == "modifiers" {
                for j in 0..child.child_count() {
                    if let Some(modifier) = child.child(j) {
                        if !modifier.is_named() {
                            modifiers.push(get_text(&modifier, source));
                        }
                    }
                }
            }
        }
    }

    modifiers
}

/// Reduces a type node to the simple name used for graph lookups.
///
/// `List<Order>` → `List`, `java.util.Map` → `Map`, `Order[]` → `Order`.
fn simple_type_name(node: &Node, source: &str) -> Option<String> {
    match node.kind() {
        "type_identifier" | "integral_type" | "floating_point_type" | "boolean_type"
        | "void_type" => Some(get_text(node, source)),
        "generic_type" => node
            .named_child(0)
            .and_then(|inner| simple_type_name(&inner, source)),
        "scoped_type_identifier" | "annotated_type" => node
            .named_child(node.named_child_count().checked_sub(1)?)
            .and_then(|inner| simple_type_name(&inner, source)),
        "array_type" => node
            .child_by_field_name("element")
            .and_then(|inner| simple_type_name(&inner, source)),
        _ => None,
    }
}

/// First type named under a `superclass` clause.
fn first_type_name(node: &Node, source: &str) -> Option<String> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .find_map(|child| simple_type_name(&child, source))
}

/// Type names listed in an `implements` / `extends` clause.
fn type_list_names(node: &Node, source: &str) -> Vec<String> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .filter(|child| child.kind() == "type_list")
        .flat_map(|list| {
            (0..list.named_child_count())
                .filter_map(|i| list.named_child(i))
                .filter_map(|ty| simple_type_name(&ty, source))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Returns the Javadoc comment directly preceding a declaration.
fn extract_javadoc(node: &Node, source: &str) -> Option<String> {
    let prev = node.prev_sibling()?;
    if !prev.kind().ends_with("comment") {
        return None;
    }

    let text = get_text(&prev, source);
    let inner = text.strip_prefix("/**")?.strip_suffix("*/")?;

    let lines: Vec<&str> = inner
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim).unwrap_or(line)
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ORDER_SERVICE: &str = r#"package com.example.shop;

import java.util.List;
import com.example.billing.*;

/**
 * Handles orders.
 */
public class OrderService extends BaseService implements Auditable, Closeable {

    /** Finds an order. */
    public Order find(long id, Customer customer) {
        return null;
    }

    private static List<Order> recent(int limit) {
        return null;
    }

    public OrderService() {}

    interface Listener {
        void onOrder(Order order);
    }
}
"#;

    fn parse(source: &str) -> ParsedFile {
        let mut parser = JavaParser::new().unwrap();
        parser.parse_source(source, "OrderService.java").unwrap()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(ORDER_SERVICE);

        assert_eq!(file.package, "com.example.shop");
        assert_eq!(file.imports, vec!["java.util.List", "com.example.billing.*"]);
        assert_eq!(file.path, "OrderService.java");
    }

    #[test]
    fn test_parse_class() {
        let file = parse(ORDER_SERVICE);
        let service = &file.types[0].record;

        assert_eq!(service.name, "OrderService");
        assert_eq!(service.namespace, "com.example.shop");
        assert_eq!(service.kind, TypeKind::Class);
        assert_eq!(service.modifiers, vec!["public"]);
        assert_eq!(service.supertype.as_deref(), Some("BaseService"));
        assert_eq!(service.interfaces, vec!["Auditable", "Closeable"]);
        assert_eq!(service.line, 9);
        assert_eq!(service.file_path, "OrderService.java");
        assert_eq!(service.documentation.as_deref(), Some("Handles orders."));
    }

    #[test]
    fn test_parse_methods_skip_constructors() {
        let file = parse(ORDER_SERVICE);
        let members = &file.types[0].members;

        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["find", "recent"]);

        let find = &members[0];
        assert_eq!(find.owner, "OrderService");
        assert_eq!(find.namespace, "com.example.shop");
        assert_eq!(find.return_type, "Order");
        assert_eq!(find.parameters.len(), 2);
        assert_eq!(find.parameters[0], Parameter::new("id", "long"));
        assert_eq!(find.parameters[1], Parameter::new("customer", "Customer"));
        assert_eq!(find.documentation.as_deref(), Some("Finds an order."));
        assert!(find.body.as_deref().unwrap().contains("return null;"));

        let recent = &members[1];
        assert_eq!(recent.return_type, "List");
        assert_eq!(recent.modifiers, vec!["private", "static"]);
        assert!(recent.documentation.is_none());
    }

    #[test]
    fn test_nested_interface() {
        let file = parse(ORDER_SERVICE);
        assert_eq!(file.types.len(), 2);

        let listener = &file.types[1];
        assert_eq!(listener.record.name, "Listener");
        assert_eq!(listener.record.kind, TypeKind::Interface);
        assert_eq!(listener.members.len(), 1);
        assert_eq!(listener.members[0].name, "onOrder");
        assert_eq!(listener.members[0].return_type, "void");
        assert!(listener.members[0].body.is_none());
    }

    #[test]
    fn test_parse_enum_and_interface_extends() {
        let source = r#"
public enum Color implements Labeled {
    RED, GREEN;

    public String label() { return name(); }
}

interface Shape extends Comparable<Shape>, Drawable {
    double area(Point[] corners, String... tags);
}
"#;
        let file = parse(source);
        assert_eq!(file.package, "");
        assert_eq!(file.types.len(), 2);

        let color = &file.types[0];
        assert_eq!(color.record.kind, TypeKind::Enum);
        assert_eq!(color.record.interfaces, vec!["Labeled"]);
        assert_eq!(color.members.len(), 1);
        assert_eq!(color.members[0].return_type, "String");

        let shape = &file.types[1];
        assert_eq!(shape.record.kind, TypeKind::Interface);
        assert_eq!(shape.record.interfaces, vec!["Comparable", "Drawable"]);

        let area = &shape.members[0];
        assert_eq!(area.return_type, "double");
        assert_eq!(area.parameters[0], Parameter::new("corners", "Point"));
        assert_eq!(area.parameters[1].name, "tags");
        assert_eq!(area.parameters[1].type_name, "String");
    }

    #[test]
    fn test_empty_source() {
        let mut parser = JavaParser::new().unwrap();
        let err = parser.parse_source("   \n", "Empty.java").unwrap_err();
        assert!(matches!(err, ParseError::EmptyFile(_)));
    }

    #[test]
    fn test_parse_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("OrderService.java");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(ORDER_SERVICE.as_bytes()).unwrap();

        let mut parser = JavaParser::new().unwrap();
        let parsed = parser.parse_file(&path).unwrap();
        assert_eq!(parsed.types.len(), 2);
        assert!(parsed.path.ends_with("OrderService.java"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Main.kt");
        fs::write(&path, "fun main() {}").unwrap();

        let mut parser = JavaParser::new().unwrap();
        let err = parser.parse_file(&path).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedLanguage(_)));
    }
}
