//! Dependency facts derived from a parsed type.
//!
//! A type depends on its supertype, on the interfaces it implements and on
//! every non-builtin type that appears in one of its method signatures.

use crate::java::ParsedType;
use crate::record::{RelationKind, RelationshipFact, TypeKind};

/// Value types that never produce a usage dependency.
pub const BUILTIN_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void", "String",
];

/// Returns true for primitives and the handful of built-ins we never track.
pub fn is_builtin_type(type_name: &str) -> bool {
    BUILTIN_TYPES.contains(&type_name)
}

/// Derives the dependency facts for one parsed type.
///
/// Target namespaces are left empty; the caller resolves them against the
/// types it knows about. Repeated usages are kept as repeated facts.
pub fn derive_dependencies(parsed: &ParsedType) -> Vec<RelationshipFact> {
    let record = &parsed.record;
    let fact = |to: &str, kind: RelationKind| {
        RelationshipFact::new(record.name.as_str(), to, kind)
            .with_namespaces(record.namespace.as_str(), "")
    };

    let mut facts = Vec::new();

    if let Some(supertype) = &record.supertype {
        facts.push(fact(supertype.as_str(), RelationKind::Inheritance));
    }

    // An interface "extends" its super-interfaces.
    let interface_kind = match record.kind {
        TypeKind::Interface => RelationKind::Inheritance,
        TypeKind::Class | TypeKind::Enum => RelationKind::Implementation,
    };
    for interface in &record.interfaces {
        facts.push(fact(interface.as_str(), interface_kind));
    }

    for member in &parsed.members {
        if !member.return_type.is_empty() && !is_builtin_type(&member.return_type) {
            facts.push(fact(member.return_type.as_str(), RelationKind::Usage));
        }

        for param in &member.parameters {
            if !param.type_name.is_empty() && !is_builtin_type(&param.type_name) {
                facts.push(fact(param.type_name.as_str(), RelationKind::Usage));
            }
        }
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{MemberRecord, Parameter, TypeRecord};

    fn parsed(record: TypeRecord, members: Vec<MemberRecord>) -> ParsedType {
        ParsedType { record, members }
    }

    #[test]
    fn test_inheritance_and_implementation() {
        let record = TypeRecord::new("ArrayStack", "util")
            .with_supertype("AbstractStack")
            .with_interfaces(vec!["Stack".into(), "Iterable".into()]);

        let facts = derive_dependencies(&parsed(record, vec![]));

        assert_eq!(facts.len(), 3);
        assert_eq!(facts[0].to, "AbstractStack");
        assert_eq!(facts[0].kind, RelationKind::Inheritance);
        assert_eq!(facts[1].kind, RelationKind::Implementation);
        assert_eq!(facts[2].to, "Iterable");
        assert!(facts
            .iter()
            .all(|f| f.from == "ArrayStack" && f.from_namespace == "util" && f.to_namespace.is_empty()));
    }

    #[test]
    fn test_interface_extends_is_inheritance() {
        let record = TypeRecord::new("Deque", "util")
            .with_kind(TypeKind::Interface)
            .with_interfaces(vec!["Queue".into()]);

        let facts = derive_dependencies(&parsed(record, vec![]));

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].kind, RelationKind::Inheritance);
    }

    #[test]
    fn test_usage_skips_builtins() {
        let record = TypeRecord::new("OrderService", "shop");
        let members = vec![
            MemberRecord::new("OrderService", "shop", "find")
                .with_return_type("Order")
                .with_parameters(vec![
                    Parameter::new("id", "long"),
                    Parameter::new("customer", "Customer"),
                ]),
            MemberRecord::new("OrderService", "shop", "describe")
                .with_return_type("String")
                .with_parameters(vec![Parameter::new("order", "Order")]),
            MemberRecord::new("OrderService", "shop", "reset"),
        ];

        let facts = derive_dependencies(&parsed(record, members));
        let targets: Vec<&str> = facts.iter().map(|f| f.to.as_str()).collect();

        assert_eq!(targets, vec!["Order", "Customer", "Order"]);
        assert!(facts.iter().all(|f| f.kind == RelationKind::Usage));
    }

    #[test]
    fn test_builtin_list() {
        assert!(is_builtin_type("int"));
        assert!(is_builtin_type("String"));
        assert!(!is_builtin_type("Integer"));
        assert!(!is_builtin_type("List"));
    }
}
