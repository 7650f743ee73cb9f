//! Recursive-descent parser for C# test files.
//!
//! The parser models what the migration engine needs to reason about:
//! usings, namespaces, classes, attributes, base lists, members and
//! statements. It is lossy-but-safe: it never fails on valid input, and
//! constructs outside the subset are preserved as verbatim raw nodes so
//! unrelated code is never damaged.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use tracing::trace;

use crate::base::LineIndex;
use crate::syntax::ast::*;
use crate::syntax::scan;
use crate::syntax::tree::{NodeId, SyntaxTree};

use super::lexer::{self, Token, TokenKind};

/// A parsed in-memory document: pristine text plus its tree.
pub struct SourceDocument {
    pub text: String,
    pub tree: SyntaxTree,
    pub line_index: LineIndex,
}

pub fn parse(source: &str) -> SourceDocument {
    let tokens = lexer::tokenize(source);
    let mut parser = Parser {
        src: source,
        toks: tokens,
        pos: 0,
        tree: SyntaxTree::new(),
        pending: Vec::new(),
    };
    let root = parser.tree.root();
    parser.parse_items(root, false, None);
    trace!("[PARSE] document parsed");
    SourceDocument {
        text: source.to_string(),
        tree: parser.tree,
        line_index: LineIndex::new(source),
    }
}

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "sealed", "abstract", "partial",
    "async", "virtual", "override", "readonly", "new", "unsafe", "extern", "required",
];

const PARAM_MODIFIERS: &[&str] = &["ref", "out", "in", "params", "this", "scoped"];

struct Parser<'a> {
    src: &'a str,
    toks: Vec<Token<'a>>,
    pos: usize,
    tree: SyntaxTree,
    pending: Vec<String>,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Token<'a>> {
        self.toks.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let t = self.peek();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn skip_trivia(&mut self) {
        while let Some(t) = self.peek() {
            match t.kind {
                TokenKind::Whitespace => self.pos += 1,
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.pending.push(t.text.to_string());
                    self.pos += 1;
                }
                _ => break,
            }
        }
    }

    fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    fn at_word(&self, word: &str) -> bool {
        self.peek()
            .map(|t| t.kind == TokenKind::Ident && t.text == word)
            .unwrap_or(false)
    }

    fn advance_past_offset(&mut self, end: usize) {
        while let Some(t) = self.peek() {
            if t.start() >= end {
                break;
            }
            self.pos += 1;
        }
    }

    fn range(&self, start: usize, end: usize) -> TextRange {
        TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32))
    }

    fn slice_offset(&self, part: &str) -> usize {
        part.as_ptr() as usize - self.src.as_ptr() as usize
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    fn parse_items(&mut self, parent: NodeId, braced: bool, class_name: Option<&str>) {
        loop {
            self.skip_trivia();
            let Some(tok) = self.peek() else {
                break;
            };
            if braced && tok.kind == TokenKind::RBrace {
                self.bump();
                break;
            }
            match tok.kind {
                TokenKind::Ident if tok.text == "using" && class_name.is_none() => {
                    self.parse_using(parent);
                }
                TokenKind::Ident if tok.text == "namespace" && class_name.is_none() => {
                    if self.parse_namespace(parent) {
                        // file-scoped: the rest of the document belongs to
                        // the namespace, which consumed it
                        break;
                    }
                }
                _ => self.parse_declaration(parent, class_name),
            }
        }
    }

    fn parse_using(&mut self, parent: NodeId) {
        let leading = self.take_pending();
        let start = self.peek().map(|t| t.start()).unwrap_or(0);
        self.bump(); // using
        self.skip_trivia();
        let mut is_static = false;
        if self.at_word("static") {
            is_static = true;
            self.bump();
            self.skip_trivia();
        }
        let path_start = self.peek().map(|t| t.start()).unwrap_or(start);
        let mut end = path_start;
        let mut semi_end = path_start;
        let mut has_eq = false;
        while let Some(t) = self.peek() {
            if t.kind == TokenKind::Semi {
                semi_end = t.end();
                self.bump();
                break;
            }
            if t.kind == TokenKind::Eq {
                has_eq = true;
            }
            end = t.end();
            self.bump();
        }
        let node = if has_eq {
            // alias directive, kept verbatim
            let text = self.src[start..semi_end.max(end)].trim().to_string();
            self.tree.alloc(NodeKind::RawMember(RawMember { text }))
        } else {
            let path = self.src[path_start..end].trim();
            self.tree.alloc(NodeKind::Using(UsingDirective {
                path: SmolStr::new(path),
                is_static,
            }))
        };
        for line in leading {
            self.tree.push_leading(node, line);
        }
        self.tree.set_range(node, self.range(start, semi_end.max(end)));
        self.tree.push_child(parent, node);
    }

    /// Returns true when the namespace was file-scoped (and consumed the
    /// rest of the document).
    fn parse_namespace(&mut self, parent: NodeId) -> bool {
        let leading = self.take_pending();
        self.bump(); // namespace
        self.skip_trivia();
        let path_start = self.peek().map(|t| t.start()).unwrap_or(0);
        let mut end = path_start;
        let mut file_scoped = false;
        let mut braced = false;
        while let Some(t) = self.peek() {
            match t.kind {
                TokenKind::Semi => {
                    self.bump();
                    file_scoped = true;
                    break;
                }
                TokenKind::LBrace => {
                    self.bump();
                    braced = true;
                    break;
                }
                _ => {
                    end = t.end();
                    self.bump();
                }
            }
        }
        let path = self.src[path_start..end].trim();
        let node = self.tree.alloc(NodeKind::Namespace(NamespaceDecl {
            path: SmolStr::new(path),
            file_scoped,
        }));
        for line in leading {
            self.tree.push_leading(node, line);
        }
        self.tree.push_child(parent, node);
        if braced {
            self.parse_items(node, true, None);
        } else if file_scoped {
            self.parse_items(node, false, None);
        }
        file_scoped
    }

    // ------------------------------------------------------------------
    // Attributes and modifiers
    // ------------------------------------------------------------------

    fn parse_attribute_specs(&mut self) -> Vec<(AttributeSpec, Vec<String>, TextRange)> {
        let mut out = Vec::new();
        loop {
            self.skip_trivia();
            let Some(t) = self.peek() else { break };
            if t.kind != TokenKind::LBracket {
                break;
            }
            let open = t.start();
            let Some(end) = scan::matching_bracket(self.src, open) else {
                break;
            };
            let leading = self.take_pending();
            let inner = &self.src[open + 1..end - 1];
            let range = self.range(open, end);
            for (i, part) in scan::split_top_level(inner, ',').into_iter().enumerate() {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let (name, args) = split_attribute(part);
                let spec = AttributeSpec::new(name, args);
                let lead = if i == 0 { leading.clone() } else { Vec::new() };
                out.push((spec, lead, range));
            }
            self.advance_past_offset(end);
        }
        out
    }

    fn attach_attributes(
        &mut self,
        owner: NodeId,
        attrs: Vec<(AttributeSpec, Vec<String>, TextRange)>,
    ) {
        for (spec, leading, range) in attrs {
            let node = self.tree.alloc(NodeKind::Attribute(spec));
            for line in leading {
                self.tree.push_leading(node, line);
            }
            self.tree.set_range(node, range);
            self.tree.push_child(owner, node);
        }
    }

    fn parse_modifiers(&mut self) -> Vec<SmolStr> {
        let mut mods = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(t) if t.kind == TokenKind::Ident && MODIFIERS.contains(&t.text) => {
                    mods.push(SmolStr::new(t.text));
                    self.bump();
                }
                _ => break,
            }
        }
        mods
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_declaration(&mut self, parent: NodeId, class_name: Option<&str>) {
        let attrs = self.parse_attribute_specs();
        self.skip_trivia();
        let leading = self.take_pending();
        let mods = self.parse_modifiers();
        self.skip_trivia();

        let Some(tok) = self.peek() else {
            // stray attributes at end of input
            if !attrs.is_empty() {
                let node = self
                    .tree
                    .alloc(NodeKind::RawMember(RawMember { text: String::new() }));
                self.attach_attributes(node, attrs);
                self.tree.push_child(parent, node);
            }
            return;
        };

        // preprocessor lines end at the newline, not at a semicolon
        if tok.kind == TokenKind::Other && tok.text == "#" {
            let start = tok.start();
            let end = self.src[start..]
                .find('\n')
                .map(|i| start + i)
                .unwrap_or(self.src.len());
            let text = self.src[start..end].trim_end().to_string();
            let node = self.tree.alloc(NodeKind::RawMember(RawMember { text }));
            for line in leading {
                self.tree.push_leading(node, line);
            }
            self.attach_attributes(node, attrs);
            self.tree.push_child(parent, node);
            self.advance_past_offset(end);
            return;
        }

        if tok.kind == TokenKind::Ident && tok.text == "class" {
            self.parse_class(parent, attrs, leading, mods);
            return;
        }

        if let Some(name) = class_name {
            // constructor: identifier matching the class name, then `(`
            if tok.kind == TokenKind::Ident && tok.text == name && self.next_is_lparen() {
                self.parse_constructor(parent, attrs, leading, mods);
                return;
            }
            self.parse_member_tail(parent, attrs, leading, mods, tok);
        } else {
            self.parse_raw_declaration(parent, attrs, leading, mods, tok.start());
        }
    }

    fn next_is_lparen(&self) -> bool {
        let mut i = self.pos + 1;
        while let Some(t) = self.toks.get(i) {
            if t.is_trivia() {
                i += 1;
                continue;
            }
            return t.kind == TokenKind::LParen;
        }
        false
    }

    fn parse_raw_declaration(
        &mut self,
        parent: NodeId,
        attrs: Vec<(AttributeSpec, Vec<String>, TextRange)>,
        leading: Vec<String>,
        mods: Vec<SmolStr>,
        start: usize,
    ) {
        let end = scan::construct_end(self.src, start);
        let slice = self.src[start..end].trim_end();
        let text = if mods.is_empty() {
            slice.to_string()
        } else {
            format!(
                "{} {}",
                mods.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(" "),
                slice
            )
        };
        let node = self.tree.alloc(NodeKind::RawMember(RawMember { text }));
        for line in leading {
            self.tree.push_leading(node, line);
        }
        self.attach_attributes(node, attrs);
        self.tree.set_range(node, self.range(start, end));
        self.tree.push_child(parent, node);
        self.advance_past_offset(end);
    }

    fn parse_class(
        &mut self,
        parent: NodeId,
        attrs: Vec<(AttributeSpec, Vec<String>, TextRange)>,
        leading: Vec<String>,
        mods: Vec<SmolStr>,
    ) {
        self.bump(); // class
        self.skip_trivia();
        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Ident => {
                self.bump();
                SmolStr::new(t.text)
            }
            _ => return,
        };
        self.skip_trivia();

        let mut type_params = None;
        if let Some(t) = self.peek() {
            if t.kind == TokenKind::Lt {
                if let Some(end) = scan::match_angle(self.src, t.start()) {
                    type_params = Some(self.src[t.start()..end].to_string());
                    self.advance_past_offset(end);
                }
            }
        }
        self.skip_trivia();

        // base list and constraints run up to the class body brace
        let mut base_list: Option<(usize, usize)> = None;
        if let Some(t) = self.peek() {
            if t.kind == TokenKind::Colon || (t.kind == TokenKind::Ident && t.text == "where") {
                let list_start = if t.kind == TokenKind::Colon {
                    self.bump();
                    self.skip_trivia();
                    self.peek().map(|n| n.start()).unwrap_or(t.end())
                } else {
                    t.start()
                };
                let mut list_end = list_start;
                while let Some(n) = self.peek() {
                    if n.kind == TokenKind::LBrace {
                        break;
                    }
                    list_end = n.end();
                    self.bump();
                }
                base_list = Some((list_start, list_end));
            }
        }

        // bases stay slices of the source so ranges can be computed
        let src = self.src;
        let (bases_text, where_clause) = match base_list {
            Some((s, e)) => {
                let text = src[s..e].trim();
                if text.starts_with("where") {
                    ("", Some(text.to_string()))
                } else if let Some(w) = text.find(" where ") {
                    (text[..w].trim(), Some(text[w + 1..].trim().to_string()))
                } else {
                    (text, None)
                }
            }
            None => ("", None),
        };

        let node = self.tree.alloc(NodeKind::Class(ClassDecl {
            modifiers: mods,
            name: name.clone(),
            type_params,
            where_clause,
        }));
        for line in leading {
            self.tree.push_leading(node, line);
        }
        self.attach_attributes(node, attrs);
        self.tree.push_child(parent, node);

        if !bases_text.is_empty() {
            for part in scan::split_top_level(bases_text, ',') {
                let trimmed = part.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let base = self.tree.alloc(NodeKind::BaseType(BaseTypeRef {
                    text: trimmed.to_string(),
                }));
                let off = self.slice_offset(trimmed);
                self.tree.set_range(base, self.range(off, off + trimmed.len()));
                self.tree.push_child(node, base);
            }
        }

        self.skip_trivia();
        match self.peek() {
            Some(t) if t.kind == TokenKind::LBrace => {
                self.bump();
                self.parse_items(node, true, Some(name.as_str()));
            }
            Some(t) if t.kind == TokenKind::Semi => {
                self.bump();
            }
            _ => {}
        }
    }

    fn parse_constructor(
        &mut self,
        parent: NodeId,
        attrs: Vec<(AttributeSpec, Vec<String>, TextRange)>,
        leading: Vec<String>,
        mods: Vec<SmolStr>,
    ) {
        let Some(name_tok) = self.bump() else { return };
        let node = self.tree.alloc(NodeKind::Constructor(CtorDecl {
            modifiers: mods,
            name: SmolStr::new(name_tok.text),
            initializer: None,
        }));
        for line in leading {
            self.tree.push_leading(node, line);
        }
        self.attach_attributes(node, attrs);
        self.tree.push_child(parent, node);

        self.parse_param_list(node);
        self.skip_trivia();

        // `: base(...)` / `: this(...)`
        if let Some(t) = self.peek() {
            if t.kind == TokenKind::Colon {
                let start = t.start();
                let mut end = t.end();
                while let Some(n) = self.peek() {
                    if n.kind == TokenKind::LBrace || n.kind == TokenKind::Semi {
                        break;
                    }
                    end = n.end();
                    self.bump();
                }
                let init = self.src[start..end].trim().to_string();
                if let NodeKind::Constructor(c) = self.tree.kind(node) {
                    let mut c = c.clone();
                    c.initializer = Some(init);
                    // parse-time mutation, no tags exist yet
                    let new_id = self.tree.replace_kind(node, NodeKind::Constructor(c));
                    self.parse_body_into(new_id);
                    return;
                }
            }
        }
        self.parse_body_into(node);
    }

    fn parse_member_tail(
        &mut self,
        parent: NodeId,
        attrs: Vec<(AttributeSpec, Vec<String>, TextRange)>,
        leading: Vec<String>,
        mods: Vec<SmolStr>,
        first: Token<'a>,
    ) {
        let member_start = first.start();
        let Some(ty) = self.parse_type_text() else {
            self.parse_raw_declaration(parent, attrs, leading, mods, member_start);
            return;
        };
        self.skip_trivia();
        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Ident => {
                self.bump();
                SmolStr::new(t.text)
            }
            _ => {
                self.parse_raw_declaration(parent, attrs, leading, mods, member_start);
                return;
            }
        };

        // generic method type parameters
        let mut type_params = None;
        self.skip_trivia();
        if let Some(t) = self.peek() {
            if t.kind == TokenKind::Lt {
                if let Some(end) = scan::match_angle(self.src, t.start()) {
                    type_params = Some(self.src[t.start()..end].to_string());
                    self.advance_past_offset(end);
                }
            }
        }
        self.skip_trivia();

        match self.peek().map(|t| t.kind) {
            Some(TokenKind::LParen) => {
                let node = self.tree.alloc(NodeKind::Method(MethodDecl {
                    modifiers: mods,
                    return_type: ty,
                    name: name.clone(),
                    type_params,
                    where_clause: None,
                    expr_body: None,
                    has_body: true,
                }));
                for line in leading {
                    self.tree.push_leading(node, line);
                }
                self.attach_attributes(node, attrs);
                self.tree.push_child(parent, node);
                if let Some(t) = self.peek() {
                    self.tree.set_range(node, self.range(member_start, t.start()));
                }
                self.parse_param_list(node);
                self.finish_method(node);
            }
            Some(TokenKind::LBrace) => {
                // property with accessor block
                let open = self.peek().map(|t| t.start()).unwrap_or(member_start);
                let Some(end) = scan::matching_bracket(self.src, open) else {
                    self.parse_raw_declaration(parent, attrs, leading, mods, member_start);
                    return;
                };
                let accessors = self.src[open..end].to_string();
                self.advance_past_offset(end);
                self.skip_trivia();
                let mut initializer = None;
                if let Some(t) = self.peek() {
                    if t.kind == TokenKind::Eq {
                        let stmt_end = scan::construct_end(self.src, t.start());
                        initializer = Some(
                            self.src[t.end()..stmt_end.saturating_sub(1)].trim().to_string(),
                        );
                        self.advance_past_offset(stmt_end);
                    }
                }
                let node = self.tree.alloc(NodeKind::Property(PropertyDecl {
                    modifiers: mods,
                    ty,
                    name,
                    accessors,
                    initializer,
                }));
                for line in leading {
                    self.tree.push_leading(node, line);
                }
                self.attach_attributes(node, attrs);
                self.tree.set_range(node, self.range(member_start, end));
                self.tree.push_child(parent, node);
            }
            Some(TokenKind::FatArrow) => {
                // expression-bodied property
                let start = self.peek().map(|t| t.start()).unwrap_or(member_start);
                let end = scan::construct_end(self.src, start);
                let accessors = self.src[start..end].trim().to_string();
                self.advance_past_offset(end);
                let node = self.tree.alloc(NodeKind::Property(PropertyDecl {
                    modifiers: mods,
                    ty,
                    name,
                    accessors,
                    initializer: None,
                }));
                for line in leading {
                    self.tree.push_leading(node, line);
                }
                self.attach_attributes(node, attrs);
                self.tree.set_range(node, self.range(member_start, end));
                self.tree.push_child(parent, node);
            }
            Some(TokenKind::Eq) => {
                let eq = self.peek().map(|t| t.start()).unwrap_or(member_start);
                let stmt_end = scan::construct_end(self.src, eq);
                let init = self.src[eq + 1..stmt_end.saturating_sub(1)].trim().to_string();
                self.advance_past_offset(stmt_end);
                let node = self.tree.alloc(NodeKind::Field(FieldDecl {
                    modifiers: mods,
                    ty,
                    name,
                    initializer: Some(init),
                }));
                for line in leading {
                    self.tree.push_leading(node, line);
                }
                self.attach_attributes(node, attrs);
                self.tree.set_range(node, self.range(member_start, stmt_end));
                self.tree.push_child(parent, node);
            }
            Some(TokenKind::Semi) => {
                self.bump();
                let node = self.tree.alloc(NodeKind::Field(FieldDecl {
                    modifiers: mods,
                    ty,
                    name,
                    initializer: None,
                }));
                for line in leading {
                    self.tree.push_leading(node, line);
                }
                self.attach_attributes(node, attrs);
                self.tree.push_child(parent, node);
            }
            _ => {
                self.parse_raw_declaration(parent, attrs, leading, mods, member_start);
            }
        }
    }

    fn finish_method(&mut self, node: NodeId) {
        self.skip_trivia();

        // where constraints
        let mut where_clause = None;
        if self.at_word("where") {
            let start = self.peek().map(|t| t.start()).unwrap_or(0);
            let mut end = start;
            while let Some(t) = self.peek() {
                if matches!(
                    t.kind,
                    TokenKind::LBrace | TokenKind::FatArrow | TokenKind::Semi
                ) {
                    break;
                }
                end = t.end();
                self.bump();
            }
            where_clause = Some(self.src[start..end].trim().to_string());
            self.skip_trivia();
        }

        let mut node = node;
        if where_clause.is_some() {
            if let NodeKind::Method(m) = self.tree.kind(node) {
                let mut m = m.clone();
                m.where_clause = where_clause;
                node = self.tree.replace_kind(node, NodeKind::Method(m));
            }
        }

        match self.peek().map(|t| t.kind) {
            Some(TokenKind::LBrace) => self.parse_body_into(node),
            Some(TokenKind::FatArrow) => {
                let start = self.peek().map(|t| t.start()).unwrap_or(0);
                let end = scan::construct_end(self.src, start);
                let expr = self.src[start..end].trim().to_string();
                self.advance_past_offset(end);
                if let NodeKind::Method(m) = self.tree.kind(node) {
                    let mut m = m.clone();
                    m.expr_body = Some(expr);
                    self.tree.replace_kind(node, NodeKind::Method(m));
                }
            }
            Some(TokenKind::Semi) => {
                self.bump();
                if let NodeKind::Method(m) = self.tree.kind(node) {
                    let mut m = m.clone();
                    m.has_body = false;
                    self.tree.replace_kind(node, NodeKind::Method(m));
                }
            }
            _ => {}
        }
    }

    fn parse_body_into(&mut self, owner: NodeId) {
        self.skip_trivia();
        let Some(t) = self.peek() else { return };
        if t.kind != TokenKind::LBrace {
            return;
        }
        let open = t.start();
        let Some(end) = scan::matching_bracket(self.src, open) else {
            self.pos = self.toks.len();
            return;
        };
        let body = &self.src[open + 1..end - 1];
        let base = open + 1;
        for raw in scan::split_statements(body) {
            let kind = classify_statement(&raw.text);
            let stmt = Statement {
                indent: raw.indent,
                comments: Vec::new(),
                kind,
            };
            let node = self.tree.alloc(NodeKind::Statement(stmt));
            let start = base + raw.offset;
            self.tree
                .set_range(node, self.range(start, start + raw.text.len()));
            self.tree.push_child(owner, node);
        }
        self.advance_past_offset(end);
    }

    // ------------------------------------------------------------------
    // Parameters and types
    // ------------------------------------------------------------------

    fn parse_param_list(&mut self, owner: NodeId) {
        self.skip_trivia();
        let Some(t) = self.peek() else { return };
        if t.kind != TokenKind::LParen {
            return;
        }
        let open = t.start();
        let Some(end) = scan::matching_bracket(self.src, open) else {
            self.pos = self.toks.len();
            return;
        };
        let list = self.src[open + 1..end - 1].to_string();
        self.advance_past_offset(end);

        for part in scan::split_top_level(&list, ',') {
            let mut rest = part.trim();
            if rest.is_empty() {
                continue;
            }
            let mut attr_specs = Vec::new();
            while rest.starts_with('[') {
                let Some(close) = scan::matching_bracket(rest, 0) else {
                    break;
                };
                let inner = &rest[1..close - 1];
                for piece in scan::split_top_level(inner, ',') {
                    let piece = piece.trim();
                    if !piece.is_empty() {
                        let (name, args) = split_attribute(piece);
                        attr_specs.push(AttributeSpec::new(name, args));
                    }
                }
                rest = rest[close..].trim_start();
            }
            let (decl, default) = match scan::find_top_level(rest, b'=') {
                Some(i) => (
                    rest[..i].trim(),
                    Some(rest[i + 1..].trim().to_string()),
                ),
                None => (rest, None),
            };
            let Some((mods, ty, name)) = split_param_decl(decl) else {
                continue;
            };
            let node = self.tree.alloc(NodeKind::Parameter(ParamDecl {
                modifiers: mods,
                ty,
                name,
                default,
            }));
            for spec in attr_specs {
                let attr = self.tree.alloc(NodeKind::Attribute(spec));
                self.tree.push_child(node, attr);
            }
            self.tree.push_child(owner, node);
        }
    }

    fn parse_type_text(&mut self) -> Option<String> {
        self.skip_trivia();
        let first = self.peek()?;
        let start = first.start();
        let mut end;
        match first.kind {
            TokenKind::LParen => {
                end = scan::matching_bracket(self.src, start)?;
                self.advance_past_offset(end);
            }
            TokenKind::Ident => {
                self.bump();
                end = first.end();
            }
            _ => return None,
        }
        loop {
            let Some(t) = self.peek() else { break };
            // suffixes must be adjacent to the type text
            match t.kind {
                TokenKind::Dot | TokenKind::ColonColon => {
                    let save = self.pos;
                    self.bump();
                    self.skip_trivia();
                    match self.peek() {
                        Some(n) if n.kind == TokenKind::Ident => {
                            self.bump();
                            end = n.end();
                        }
                        _ => {
                            self.pos = save;
                            break;
                        }
                    }
                }
                TokenKind::Lt => {
                    let Some(close) = scan::match_angle(self.src, t.start()) else {
                        break;
                    };
                    self.advance_past_offset(close);
                    end = close;
                }
                TokenKind::LBracket => {
                    let Some(close) = scan::matching_bracket(self.src, t.start()) else {
                        break;
                    };
                    self.advance_past_offset(close);
                    end = close;
                }
                TokenKind::Question => {
                    self.bump();
                    end = t.end();
                }
                _ => break,
            }
        }
        Some(self.src[start..end].trim().to_string())
    }
}

/// Split an attribute item into name and argument-list text (parens
/// stripped). The name keeps any generic suffix.
fn split_attribute(part: &str) -> (String, Option<String>) {
    let bytes = part.as_bytes();
    let mut angle = 0i32;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => angle += 1,
            b'>' => angle -= 1,
            b'(' if angle == 0 => {
                if let Some(end) = scan::matching_bracket(part, i) {
                    let name = part[..i].trim().to_string();
                    let args = part[i + 1..end - 1].to_string();
                    return (name, Some(args));
                }
            }
            _ => {}
        }
    }
    (part.trim().to_string(), None)
}

/// Split `ref Dictionary<int, string> map` into modifiers, type and name.
fn split_param_decl(decl: &str) -> Option<(Vec<SmolStr>, String, SmolStr)> {
    let decl = decl.trim();
    if decl.is_empty() || decl == "params" {
        return None;
    }
    // name is the trailing identifier
    let name_start = decl
        .rfind(|c: char| !(c.is_alphanumeric() || c == '_' || c == '@'))
        .map(|i| i + 1)
        .unwrap_or(0);
    let name = decl[name_start..].trim();
    if name.is_empty() || !is_identifier(name) {
        return None;
    }
    let mut prefix = decl[..name_start].trim();
    let mut mods = Vec::new();
    loop {
        let word = prefix.split_whitespace().next().unwrap_or("");
        if PARAM_MODIFIERS.contains(&word) {
            mods.push(SmolStr::new(word));
            prefix = prefix[word.len()..].trim_start();
        } else {
            break;
        }
    }
    let ty = prefix.trim();
    if ty.is_empty() {
        return None;
    }
    Some((mods, ty.to_string(), SmolStr::new(name)))
}

/// Classify one statement slice as a call, a call-initialized local, or raw.
fn classify_statement(text: &str) -> StmtKind {
    if text.is_empty() {
        return StmtKind::Raw(String::new());
    }
    if let Some(call) = parse_call_statement(text) {
        return StmtKind::Call(call);
    }
    if let Some(local) = parse_local_declaration(text) {
        return local;
    }
    StmtKind::Raw(text.to_string())
}

fn parse_call_statement(text: &str) -> Option<CallExpr> {
    let t = text.trim_end();
    let expr = t.strip_suffix(';')?.trim_end();
    parse_call_expression(expr)
}

/// Parse `await? receiver.chain.Method<T>(args)`.
pub fn parse_call_expression(expr: &str) -> Option<CallExpr> {
    let full = expr.trim();
    let mut rest = full;
    let mut awaited = false;
    if let Some(r) = rest.strip_prefix("await ") {
        rest = r.trim_start();
        awaited = true;
    }

    let bytes = rest.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;
    let mut segments: Vec<(&str, Vec<String>)> = Vec::new();

    loop {
        let seg_start = i;
        if i < len && bytes[i] == b'@' {
            i += 1;
        }
        while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        if i == seg_start || (i == seg_start + 1 && bytes[seg_start] == b'@') {
            return None;
        }
        let name = &rest[seg_start..i];
        let mut type_args = Vec::new();
        if i < len && bytes[i] == b'<' {
            if let Some(close) = scan::match_angle(rest, i) {
                type_args = scan::split_type_args(&rest[i + 1..close - 1]);
                i = close;
            }
        }
        if i < len && bytes[i] == b'.' {
            segments.push((name, type_args));
            i += 1;
            continue;
        }
        if i < len && bytes[i] == b'(' {
            let close = scan::matching_bracket(rest, i)?;
            if close != len {
                return None;
            }
            let args_text = &rest[i + 1..close - 1];
            let receiver = if segments.is_empty() {
                None
            } else {
                Some(
                    segments
                        .iter()
                        .map(|(s, _)| *s)
                        .collect::<Vec<_>>()
                        .join("."),
                )
            };
            return Some(CallExpr {
                receiver,
                method: SmolStr::new(name),
                type_args,
                args: parse_arg_list(args_text),
                awaited,
                text: full.to_string(),
            });
        }
        return None;
    }
}

fn parse_local_declaration(text: &str) -> Option<StmtKind> {
    let t = text.trim_end();
    let body = t.strip_suffix(';')?;
    let eq = scan::find_top_level(body, b'=')?;
    let lhs = body[..eq].trim();
    let rhs = body[eq + 1..].trim();
    if lhs.contains('(') {
        return None;
    }
    let words: Vec<&str> = lhs.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    let name = *words.last()?;
    if !is_identifier(name) {
        return None;
    }
    let ty = lhs[..lhs.len() - name.len()].trim().to_string();
    let init = parse_call_expression(rhs)?;
    Some(StmtKind::Local {
        ty,
        name: SmolStr::new(name),
        init,
        text: text.to_string(),
    })
}
