//! Grove Graph - In-memory code knowledge graph
//!
//! Types and their methods are nodes; inheritance, implementation, usage
//! and ownership are edges. The store answers two questions quickly: which
//! types sit near a given type, and which methods a type owns.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Identity lookups (`class::pkg.Name`, `method::Owner::name`)
//! - Exact `(namespace, name)` lookups of types
//! - Bare-name lookups that span namespaces
//!
//! Shared access goes through [`GraphStore`], a cloneable handle holding the
//! graph behind a single read-write lock.
//!
//! # Example
//!
//! ```no_run
//! use grove_core::{MemberRecord, RelationKind, RelationshipFact, TypeRecord};
//! use grove_graph::GraphStore;
//!
//! let store = GraphStore::new();
//! store.upsert_type(TypeRecord::new("Order", "shop")).unwrap();
//! store.upsert_type(TypeRecord::new("Invoice", "shop")).unwrap();
//! store.upsert_member(MemberRecord::new("Order", "shop", "total")).unwrap();
//!
//! let fact = RelationshipFact::new("Invoice", "Order", RelationKind::Usage)
//!     .with_namespaces("shop", "shop");
//! store.add_relationship(&fact).unwrap();
//!
//! let related = store.find_related("Order", 2);
//! let members = store.list_members("Order", "shop");
//! ```

mod compat;
mod edge;
mod error;
mod graph;
mod identity;
mod index;
mod node;
mod store;
mod traversal;

pub use compat::{GraphCounts, LegacyRequest};
pub use edge::{Edge, EdgeKind, GraphEdge};
pub use error::{GraphError, Result};
pub use graph::{CodeGraph, ExportNode, GraphExport, GraphStats, NodeId};
pub use identity::{member_key, type_key};
pub use node::GraphNode;
pub use store::GraphStore;
pub use traversal::{RelatedType, TypeContext};
