//! Append-only arena tree.
//!
//! Nodes are addressed by [`NodeId`]. Edits never mutate a node's payload in
//! place: every edit, including tag attachment, appends a replacement node
//! and rewires the parent's child list. Ids held across edits therefore go
//! stale by design and must be re-resolved through one of the two indices:
//!
//! - tag index: [`SyntaxTree::current`] maps a [`Tag`] to the live node
//!   carrying it (the only sanctioned lookup during transformation),
//! - origin index: [`SyntaxTree::current_for_origin`] maps a node of the
//!   pristine tree to its live counterpart in a forked working tree.

use rustc_hash::FxHashMap;
use text_size::TextRange;

use crate::base::Tag;

use super::ast::*;

/// Arena index of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tags: Vec<Tag>,
    range: Option<TextRange>,
    /// Comment lines rendered before the node.
    leading: Vec<String>,
    /// Pristine-tree node this one descends from (working trees only).
    origin: Option<NodeId>,
    detached: bool,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            tags: Vec::new(),
            range: None,
            leading: Vec::new(),
            origin: None,
            detached: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
    root: NodeId,
    tag_index: FxHashMap<Tag, NodeId>,
    origin_index: FxHashMap<NodeId, NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
            root: NodeId(0),
            tag_index: FxHashMap::default(),
            origin_index: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.idx()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.idx()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.idx()].children
    }

    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        self.nodes[id.idx()].range
    }

    pub fn tags(&self, id: NodeId) -> &[Tag] {
        &self.nodes[id.idx()].tags
    }

    pub fn leading(&self, id: NodeId) -> &[String] {
        &self.nodes[id.idx()].leading
    }

    pub fn origin(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.idx()].origin
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        !self.nodes[id.idx()].detached
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    pub fn set_range(&mut self, id: NodeId, range: TextRange) {
        self.nodes[id.idx()].range = Some(range);
    }

    pub fn push_leading(&mut self, id: NodeId, line: impl Into<String>) {
        self.nodes[id.idx()].leading.push(line.into());
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.idx()].parent = Some(parent);
        self.nodes[parent.idx()].children.push(child);
    }

    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.nodes[child.idx()].parent = Some(parent);
        let children = &mut self.nodes[parent.idx()].children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    // ------------------------------------------------------------------
    // Edits (append-only)
    // ------------------------------------------------------------------

    /// Attach a tag by replacing the node with a tagged clone. Returns the
    /// id of the replacement.
    pub fn attach_tag(&mut self, id: NodeId, tag: Tag) -> NodeId {
        let kind = self.nodes[id.idx()].kind.clone();
        self.replace_internal(id, kind, Some(tag))
    }

    /// Replace the payload, keeping children, tags and leading comments.
    /// Returns the id of the replacement.
    pub fn replace_kind(&mut self, id: NodeId, kind: NodeKind) -> NodeId {
        self.replace_internal(id, kind, None)
    }

    fn replace_internal(&mut self, old: NodeId, kind: NodeKind, extra_tag: Option<Tag>) -> NodeId {
        let old_data = &self.nodes[old.idx()];
        let parent = old_data.parent;
        let children = old_data.children.clone();
        let mut tags = old_data.tags.clone();
        if let Some(t) = extra_tag {
            tags.push(t);
        }
        let range = old_data.range;
        let leading = old_data.leading.clone();
        let origin = old_data.origin;

        let new_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent,
            children: children.clone(),
            tags: tags.clone(),
            range,
            leading,
            origin,
            detached: false,
        });

        match parent {
            Some(p) => {
                if let Some(pos) = self.child_index(p, old) {
                    self.nodes[p.idx()].children[pos] = new_id;
                }
            }
            None => {
                if self.root == old {
                    self.root = new_id;
                }
            }
        }
        for c in children {
            self.nodes[c.idx()].parent = Some(new_id);
        }
        {
            let old_data = &mut self.nodes[old.idx()];
            old_data.detached = true;
            old_data.children.clear();
        }
        for t in tags {
            self.tag_index.insert(t, new_id);
        }
        if let Some(o) = origin {
            self.origin_index.insert(o, new_id);
        }
        new_id
    }

    /// Replace a node with several fresh nodes. The first replacement
    /// inherits tags, origin and leading comments.
    pub fn replace_with_many(&mut self, old: NodeId, kinds: Vec<NodeKind>) -> Vec<NodeId> {
        let parent = self.nodes[old.idx()].parent;
        let tags = self.nodes[old.idx()].tags.clone();
        let leading = self.nodes[old.idx()].leading.clone();
        let origin = self.nodes[old.idx()].origin;

        let mut new_ids = Vec::with_capacity(kinds.len());
        for (i, kind) in kinds.into_iter().enumerate() {
            let id = NodeId(self.nodes.len() as u32);
            let mut data = NodeData::new(kind);
            data.parent = parent;
            if i == 0 {
                data.tags = tags.clone();
                data.leading = leading.clone();
                data.origin = origin;
            }
            self.nodes.push(data);
            new_ids.push(id);
        }

        if let Some(p) = parent {
            if let Some(pos) = self.child_index(p, old) {
                let children = &mut self.nodes[p.idx()].children;
                children.splice(pos..=pos, new_ids.iter().copied());
            }
        }
        self.detach_subtree(old);
        if let Some(&first) = new_ids.first() {
            for t in &self.nodes[first.idx()].tags.clone() {
                self.tag_index.insert(*t, first);
            }
            if let Some(o) = origin {
                self.origin_index.insert(o, first);
            }
        }
        new_ids
    }

    /// Remove a node (and its subtree) from the tree.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(p) = self.nodes[id.idx()].parent {
            if let Some(pos) = self.child_index(p, id) {
                self.nodes[p.idx()].children.remove(pos);
            }
        }
        self.detach_subtree(id);
    }

    fn detach_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            self.nodes[n.idx()].detached = true;
            stack.extend(self.nodes[n.idx()].children.iter().copied());
        }
    }

    // ------------------------------------------------------------------
    // Re-resolution
    // ------------------------------------------------------------------

    /// Live node carrying `tag`, or `None` when it was removed.
    pub fn current(&self, tag: Tag) -> Option<NodeId> {
        self.tag_index
            .get(&tag)
            .copied()
            .filter(|&id| self.is_live(id))
    }

    /// Live counterpart of a pristine-tree node.
    pub fn current_for_origin(&self, pristine: NodeId) -> Option<NodeId> {
        self.origin_index
            .get(&pristine)
            .copied()
            .filter(|&id| self.is_live(id))
    }

    /// Working copy of a pristine tree. Every live node remembers its
    /// pristine id so phase-1 discoveries can be re-located after edits.
    pub fn fork(&self) -> SyntaxTree {
        let mut work = self.clone();
        for i in 0..work.nodes.len() {
            if !work.nodes[i].detached {
                let id = NodeId(i as u32);
                work.nodes[i].origin = Some(id);
                work.origin_index.insert(id, id);
            }
        }
        work
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    pub fn class(&self, id: NodeId) -> Option<&ClassDecl> {
        match self.kind(id) {
            NodeKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn method(&self, id: NodeId) -> Option<&MethodDecl> {
        match self.kind(id) {
            NodeKind::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn constructor(&self, id: NodeId) -> Option<&CtorDecl> {
        match self.kind(id) {
            NodeKind::Constructor(c) => Some(c),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId) -> Option<&AttributeSpec> {
        match self.kind(id) {
            NodeKind::Attribute(a) => Some(a),
            _ => None,
        }
    }

    pub fn base_type(&self, id: NodeId) -> Option<&BaseTypeRef> {
        match self.kind(id) {
            NodeKind::BaseType(b) => Some(b),
            _ => None,
        }
    }

    pub fn field(&self, id: NodeId) -> Option<&FieldDecl> {
        match self.kind(id) {
            NodeKind::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn property(&self, id: NodeId) -> Option<&PropertyDecl> {
        match self.kind(id) {
            NodeKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn parameter(&self, id: NodeId) -> Option<&ParamDecl> {
        match self.kind(id) {
            NodeKind::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn statement(&self, id: NodeId) -> Option<&Statement> {
        match self.kind(id) {
            NodeKind::Statement(s) => Some(s),
            _ => None,
        }
    }

    pub fn using(&self, id: NodeId) -> Option<&UsingDirective> {
        match self.kind(id) {
            NodeKind::Using(u) => Some(u),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn children_where(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| pred(self.kind(c)))
            .collect()
    }

    pub fn attributes_of(&self, id: NodeId) -> Vec<NodeId> {
        self.children_where(id, |k| matches!(k, NodeKind::Attribute(_)))
    }

    pub fn base_types_of(&self, id: NodeId) -> Vec<NodeId> {
        self.children_where(id, |k| matches!(k, NodeKind::BaseType(_)))
    }

    pub fn params_of(&self, id: NodeId) -> Vec<NodeId> {
        self.children_where(id, |k| matches!(k, NodeKind::Parameter(_)))
    }

    pub fn statements_of(&self, id: NodeId) -> Vec<NodeId> {
        self.children_where(id, |k| matches!(k, NodeKind::Statement(_)))
    }

    pub fn methods_of(&self, class: NodeId) -> Vec<NodeId> {
        self.children_where(class, |k| matches!(k, NodeKind::Method(_)))
    }

    pub fn ctors_of(&self, class: NodeId) -> Vec<NodeId> {
        self.children_where(class, |k| matches!(k, NodeKind::Constructor(_)))
    }

    pub fn fields_and_properties_of(&self, class: NodeId) -> Vec<NodeId> {
        self.children_where(class, |k| {
            matches!(k, NodeKind::Field(_) | NodeKind::Property(_))
        })
    }

    pub fn usings(&self) -> Vec<NodeId> {
        self.children_where(self.root, |k| matches!(k, NodeKind::Using(_)))
    }

    /// All classes in document order, including nested ones.
    pub fn classes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(self.root).to_vec();
        stack.reverse();
        while let Some(id) = stack.pop() {
            match self.kind(id) {
                NodeKind::Class(_) => {
                    out.push(id);
                    let mut kids = self.children(id).to_vec();
                    kids.reverse();
                    stack.extend(kids);
                }
                NodeKind::Namespace(_) => {
                    let mut kids = self.children(id).to_vec();
                    kids.reverse();
                    stack.extend(kids);
                }
                _ => {}
            }
        }
        out
    }

    /// Closest enclosing node matching `pred`, starting from the parent.
    pub fn ancestor_where(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut cur = self.parent(id);
        while let Some(n) = cur {
            if pred(self.kind(n)) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    pub fn enclosing_method(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_where(id, |k| matches!(k, NodeKind::Method(_)))
    }

    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_where(id, |k| matches!(k, NodeKind::Class(_)))
    }
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(text: &str) -> NodeKind {
        NodeKind::Statement(Statement::raw("    ", text))
    }

    fn small_tree() -> (SyntaxTree, NodeId, NodeId) {
        let mut tree = SyntaxTree::new();
        let class = tree.alloc(NodeKind::Class(ClassDecl::new(vec!["public".into()], "Tests")));
        tree.push_child(tree.root(), class);
        let method = tree.alloc(NodeKind::Method(MethodDecl::new(vec!["public".into()], "void", "Check")));
        tree.push_child(class, method);
        let s = tree.alloc(stmt("DoWork();"));
        tree.push_child(method, s);
        (tree, method, s)
    }

    #[test]
    fn tag_survives_payload_replacement() {
        let (pristine, _, s) = small_tree();
        let mut work = pristine.fork();
        let tag = Tag::new();
        let tagged = work.attach_tag(s, tag);
        assert_ne!(tagged, s);
        assert_eq!(work.current(tag), Some(tagged));

        let replaced = work.replace_kind(tagged, stmt("DoOtherWork();"));
        assert_eq!(work.current(tag), Some(replaced));
        assert!(!work.is_live(tagged));
    }

    #[test]
    fn origin_index_tracks_replacements() {
        let (pristine, _, s) = small_tree();
        let mut work = pristine.fork();
        assert_eq!(work.current_for_origin(s), Some(s));
        let tag = Tag::new();
        let tagged = work.attach_tag(s, tag);
        assert_eq!(work.current_for_origin(s), Some(tagged));
    }

    #[test]
    fn detach_makes_tag_unresolvable() {
        let (pristine, method, s) = small_tree();
        let mut work = pristine.fork();
        let tag = Tag::new();
        let tagged = work.attach_tag(s, tag);
        work.detach(tagged);
        assert_eq!(work.current(tag), None);
        assert!(work.statements_of(method).is_empty());
    }

    #[test]
    fn replace_with_many_splices_in_order() {
        let (pristine, method, s) = small_tree();
        let mut work = pristine.fork();
        let before = work.alloc(stmt("Before();"));
        work.insert_child(method, 0, before);
        let new_ids = work.replace_with_many(s, vec![stmt("A();"), stmt("B();")]);
        assert_eq!(new_ids.len(), 2);
        let stmts = work.statements_of(method);
        assert_eq!(stmts.len(), 3);
        assert_eq!(work.statement(stmts[1]).map(|st| st.text()), Some("A();"));
        assert_eq!(work.statement(stmts[2]).map(|st| st.text()), Some("B();"));
    }

    #[test]
    fn many_interleaved_edits_keep_every_tag_resolvable() {
        let mut tree = SyntaxTree::new();
        let class = tree.alloc(NodeKind::Class(ClassDecl::new(vec!["public".into()], "Big")));
        tree.push_child(tree.root(), class);
        let method = tree.alloc(NodeKind::Method(MethodDecl::new(vec!["public".into()], "void", "Lots")));
        tree.push_child(class, method);
        let mut stmts = Vec::new();
        for i in 0..50 {
            let s = tree.alloc(stmt(&format!("Step{i}();")));
            tree.push_child(method, s);
            stmts.push(s);
        }

        let mut work = tree.fork();
        let tags: Vec<Tag> = stmts
            .iter()
            .map(|&s| {
                let tag = Tag::new();
                let cur = work.current_for_origin(s).unwrap();
                work.attach_tag(cur, tag);
                tag
            })
            .collect();

        // every edit invalidates ids; tags must not care
        for (i, &tag) in tags.iter().enumerate() {
            let cur = work.current(tag).unwrap();
            work.replace_kind(cur, stmt(&format!("Rewritten{i}();")));
        }
        for (i, &tag) in tags.iter().enumerate() {
            let cur = work.current(tag).unwrap();
            let text = work.statement(cur).unwrap().text().to_string();
            assert_eq!(text, format!("Rewritten{i}();"));
        }
    }
}
