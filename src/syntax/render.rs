//! Tree to source text.
//!
//! Statements and raw regions carry their original text, so untouched code
//! comes back unchanged. Declaration layout (modifier spacing, brace
//! placement, blank lines between members) follows standard conventions.

use super::ast::*;
use super::tree::{NodeId, SyntaxTree};

const INDENT: &str = "    ";

pub fn render(tree: &SyntaxTree) -> String {
    let mut r = Renderer {
        tree,
        out: String::new(),
    };
    let root = tree.root();
    for line in tree.leading(root) {
        r.out.push_str(line);
        r.out.push('\n');
    }
    if !tree.leading(root).is_empty() {
        r.out.push('\n');
    }
    r.render_children(tree.children(root), 0);
    // single trailing newline
    while r.out.ends_with("\n\n") {
        r.out.pop();
    }
    if !r.out.is_empty() && !r.out.ends_with('\n') {
        r.out.push('\n');
    }
    r.out
}

struct Renderer<'a> {
    tree: &'a SyntaxTree,
    out: String,
}

impl<'a> Renderer<'a> {
    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn line(&mut self, level: usize, text: &str) {
        self.indent(level);
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn leading(&mut self, id: NodeId, level: usize) {
        for line in self.tree.leading(id) {
            self.line(level, line);
        }
    }

    fn render_children(&mut self, ids: &[NodeId], level: usize) {
        let mut prev_using = false;
        for (i, &id) in ids.iter().enumerate() {
            let is_using = matches!(self.tree.kind(id), NodeKind::Using(_));
            if i > 0 && !(prev_using && is_using) {
                self.out.push('\n');
            }
            self.render_item(id, level);
            prev_using = is_using;
        }
    }

    fn render_item(&mut self, id: NodeId, level: usize) {
        match self.tree.kind(id) {
            NodeKind::Document => {}
            NodeKind::Using(u) => self.render_using(u, level),
            NodeKind::Namespace(n) => self.render_namespace(id, n.clone(), level),
            NodeKind::Class(c) => self.render_class(id, c.clone(), level),
            NodeKind::Field(f) => self.render_field(id, f.clone(), level),
            NodeKind::Property(p) => self.render_property(id, p.clone(), level),
            NodeKind::Constructor(c) => self.render_ctor(id, c.clone(), level),
            NodeKind::Method(m) => self.render_method(id, m.clone(), level),
            NodeKind::Statement(s) => self.render_statement(s),
            NodeKind::RawMember(r) => {
                let text = r.text.clone();
                self.leading(id, level);
                self.render_attributes(id, level);
                self.line(level, &text);
            }
            // attributes, base types and parameters are rendered by their
            // parent declarations
            NodeKind::Attribute(_) | NodeKind::BaseType(_) | NodeKind::Parameter(_) => {}
        }
    }

    fn render_using(&mut self, u: &UsingDirective, level: usize) {
        let text = if u.is_static {
            format!("using static {};", u.path)
        } else {
            format!("using {};", u.path)
        };
        self.line(level, &text);
    }

    fn render_namespace(&mut self, id: NodeId, n: NamespaceDecl, level: usize) {
        self.leading(id, level);
        if n.file_scoped {
            self.line(level, &format!("namespace {};", n.path));
            self.out.push('\n');
            self.render_children(&self.tree.children(id).to_vec(), level);
        } else {
            self.line(level, &format!("namespace {}", n.path));
            self.line(level, "{");
            self.render_children(&self.tree.children(id).to_vec(), level + 1);
            self.line(level, "}");
        }
    }

    fn render_attributes(&mut self, owner: NodeId, level: usize) {
        for attr_id in self.tree.attributes_of(owner) {
            self.leading(attr_id, level);
            if let Some(a) = self.tree.attribute(attr_id) {
                let code = a.code();
                self.line(level, &code);
            }
        }
    }

    fn render_class(&mut self, id: NodeId, c: ClassDecl, level: usize) {
        self.leading(id, level);
        self.render_attributes(id, level);
        let mut header = String::new();
        for m in &c.modifiers {
            header.push_str(m);
            header.push(' ');
        }
        header.push_str("class ");
        header.push_str(&c.name);
        if let Some(tp) = &c.type_params {
            header.push_str(tp);
        }
        let bases: Vec<String> = self
            .tree
            .base_types_of(id)
            .iter()
            .filter_map(|&b| self.tree.base_type(b).map(|bt| bt.text.clone()))
            .collect();
        if !bases.is_empty() {
            header.push_str(" : ");
            header.push_str(&bases.join(", "));
        }
        if let Some(w) = &c.where_clause {
            header.push(' ');
            header.push_str(w);
        }
        self.line(level, &header);
        self.line(level, "{");
        let members: Vec<NodeId> = self
            .tree
            .children(id)
            .iter()
            .copied()
            .filter(|&m| {
                !matches!(
                    self.tree.kind(m),
                    NodeKind::Attribute(_) | NodeKind::BaseType(_)
                )
            })
            .collect();
        self.render_children(&members, level + 1);
        self.line(level, "}");
    }

    fn render_field(&mut self, id: NodeId, f: FieldDecl, level: usize) {
        self.leading(id, level);
        self.render_attributes(id, level);
        let mut text = String::new();
        for m in &f.modifiers {
            text.push_str(m);
            text.push(' ');
        }
        text.push_str(&f.ty);
        text.push(' ');
        text.push_str(&f.name);
        if let Some(init) = &f.initializer {
            text.push_str(" = ");
            text.push_str(init);
        }
        text.push(';');
        self.line(level, &text);
    }

    fn render_property(&mut self, id: NodeId, p: PropertyDecl, level: usize) {
        self.leading(id, level);
        self.render_attributes(id, level);
        let mut text = String::new();
        for m in &p.modifiers {
            text.push_str(m);
            text.push(' ');
        }
        text.push_str(&p.ty);
        text.push(' ');
        text.push_str(&p.name);
        text.push(' ');
        text.push_str(&p.accessors);
        if let Some(init) = &p.initializer {
            text.push_str(" = ");
            text.push_str(init);
            text.push(';');
        }
        self.line(level, &text);
    }

    fn render_params(&mut self, owner: NodeId) -> String {
        let mut parts = Vec::new();
        for pid in self.tree.params_of(owner) {
            let Some(p) = self.tree.parameter(pid) else {
                continue;
            };
            let mut s = String::new();
            for attr_id in self.tree.attributes_of(pid) {
                if let Some(a) = self.tree.attribute(attr_id) {
                    s.push_str(&a.code());
                    s.push(' ');
                }
            }
            for m in &p.modifiers {
                s.push_str(m);
                s.push(' ');
            }
            s.push_str(&p.ty);
            s.push(' ');
            s.push_str(&p.name);
            if let Some(d) = &p.default {
                s.push_str(" = ");
                s.push_str(d);
            }
            parts.push(s);
        }
        parts.join(", ")
    }

    fn render_ctor(&mut self, id: NodeId, c: CtorDecl, level: usize) {
        self.leading(id, level);
        self.render_attributes(id, level);
        let params = self.render_params(id);
        let mut header = String::new();
        for m in &c.modifiers {
            header.push_str(m);
            header.push(' ');
        }
        header.push_str(&c.name);
        header.push('(');
        header.push_str(&params);
        header.push(')');
        if let Some(init) = &c.initializer {
            header.push(' ');
            header.push_str(init);
        }
        self.line(level, &header);
        self.render_body(id, level);
    }

    fn render_method(&mut self, id: NodeId, m: MethodDecl, level: usize) {
        self.leading(id, level);
        self.render_attributes(id, level);
        let params = self.render_params(id);
        let mut header = String::new();
        for md in &m.modifiers {
            header.push_str(md);
            header.push(' ');
        }
        header.push_str(&m.return_type);
        header.push(' ');
        header.push_str(&m.name);
        if let Some(tp) = &m.type_params {
            header.push_str(tp);
        }
        header.push('(');
        header.push_str(&params);
        header.push(')');
        if let Some(w) = &m.where_clause {
            header.push(' ');
            header.push_str(w);
        }
        if let Some(expr) = &m.expr_body {
            header.push(' ');
            header.push_str(expr);
            self.line(level, &header);
        } else if !m.has_body {
            header.push(';');
            self.line(level, &header);
        } else {
            self.line(level, &header);
            self.render_body(id, level);
        }
    }

    fn render_body(&mut self, id: NodeId, level: usize) {
        self.line(level, "{");
        for sid in self.tree.statements_of(id) {
            let Some(stmt) = self.tree.statement(sid) else {
                continue;
            };
            self.render_statement(&stmt.clone());
        }
        self.line(level, "}");
    }

    fn render_statement(&mut self, s: &Statement) {
        if s.text().is_empty() && s.comments.is_empty() {
            self.out.push('\n');
            return;
        }
        for c in &s.comments {
            self.out.push_str(&s.indent);
            self.out.push_str(c);
            self.out.push('\n');
        }
        self.out.push_str(&s.indent);
        self.out.push_str(s.text());
        // call statements store the expression without the terminator
        if matches!(s.kind, StmtKind::Call(_)) {
            self.out.push(';');
        }
        self.out.push('\n');
    }
}
