// Document tree: node payloads, append-only arena, rendering
pub mod ast;
pub mod render;
pub mod scan;
pub mod tree;

pub use ast::{
    AttributeSpec, BaseTypeRef, CallArg, CallExpr, ClassDecl, CtorDecl, FieldDecl, MethodDecl,
    NamespaceDecl, NodeKind, ParamDecl, PropertyDecl, RawMember, Statement, StmtKind,
    UsingDirective,
};
pub use render::render;
pub use tree::{NodeId, SyntaxTree};
