//! Node payloads for the document tree.
//!
//! The model covers the C# subset that unit-test files actually use:
//! usings, namespaces, classes with attributes and base lists, fields,
//! properties, constructors, methods, parameters, statements. Everything
//! outside the subset is carried verbatim in raw nodes so untouched code
//! renders back unchanged.

use smol_str::SmolStr;

use super::scan;

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Using(UsingDirective),
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    Attribute(AttributeSpec),
    BaseType(BaseTypeRef),
    Field(FieldDecl),
    Property(PropertyDecl),
    Constructor(CtorDecl),
    Method(MethodDecl),
    Parameter(ParamDecl),
    Statement(Statement),
    /// Verbatim source region the parser did not model.
    RawMember(RawMember),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub path: SmolStr,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub path: SmolStr,
    pub file_scoped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub modifiers: Vec<SmolStr>,
    pub name: SmolStr,
    /// `<T, U>` including the angle brackets, when generic.
    pub type_params: Option<String>,
    /// `where T : ...` constraint text, when present.
    pub where_clause: Option<String>,
}

impl ClassDecl {
    pub fn new(modifiers: Vec<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            modifiers,
            name: name.into(),
            type_params: None,
            where_clause: None,
        }
    }
}

/// A single attribute. Multi-attribute lists (`[A, B]`) are modeled as
/// separate nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: SmolStr,
    /// Argument list text WITHOUT the surrounding parentheses.
    pub args: Option<String>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<SmolStr>, args: Option<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn bare(name: impl Into<SmolStr>) -> Self {
        Self::new(name, None)
    }

    /// Parsed arguments, named ones (`Name = v` or `name: v`) carry the name.
    pub fn parse_args(&self) -> Vec<CallArg> {
        match &self.args {
            Some(a) if !a.trim().is_empty() => parse_arg_list(a),
            _ => Vec::new(),
        }
    }

    pub fn code(&self) -> String {
        match &self.args {
            Some(a) => format!("[{}({})]", self.name, a),
            None => format!("[{}]", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTypeRef {
    /// Full type text, e.g. `IClassFixture<DatabaseFixture>`.
    pub text: String,
}

impl BaseTypeRef {
    pub fn head(&self) -> &str {
        type_head(&self.text)
    }

    pub fn type_args(&self) -> Vec<String> {
        type_args_of(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub modifiers: Vec<SmolStr>,
    pub ty: String,
    pub name: SmolStr,
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub modifiers: Vec<SmolStr>,
    pub ty: String,
    pub name: SmolStr,
    /// Accessor block text including braces, e.g. `{ get; set; }`.
    pub accessors: String,
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtorDecl {
    pub modifiers: Vec<SmolStr>,
    pub name: SmolStr,
    /// `: base(...)` / `: this(...)` initializer text, when present.
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub modifiers: Vec<SmolStr>,
    pub return_type: String,
    pub name: SmolStr,
    pub type_params: Option<String>,
    pub where_clause: Option<String>,
    /// `=> expr;` text for expression-bodied methods; block bodies use
    /// statement children instead.
    pub expr_body: Option<String>,
    /// False for bodiless declarations (abstract, interface members).
    pub has_body: bool,
}

impl MethodDecl {
    pub fn new(modifiers: Vec<SmolStr>, return_type: impl Into<String>, name: impl Into<SmolStr>) -> Self {
        Self {
            modifiers,
            return_type: return_type.into(),
            name: name.into(),
            type_params: None,
            where_clause: None,
            expr_body: None,
            has_body: true,
        }
    }

    pub fn is_async(&self) -> bool {
        self.modifiers.iter().any(|m| m == "async")
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.iter().any(|m| m == "public")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// `ref`, `out`, `in`, `params`, `this`.
    pub modifiers: Vec<SmolStr>,
    pub ty: String,
    pub name: SmolStr,
    pub default: Option<String>,
}

impl ParamDecl {
    pub fn is_by_ref(&self) -> bool {
        self.modifiers.iter().any(|m| m == "ref" || m == "out")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Leading whitespace of the first line.
    pub indent: String,
    /// Comment lines rendered above the statement at the same indent.
    pub comments: Vec<String>,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// Expression statement whose expression is a call.
    Call(CallExpr),
    /// Local declaration whose initializer is a call.
    Local {
        ty: String,
        name: SmolStr,
        init: CallExpr,
        /// Original statement text.
        text: String,
    },
    /// Anything else, verbatim (may span lines).
    Raw(String),
}

impl Statement {
    pub fn raw(indent: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            comments: Vec::new(),
            kind: StmtKind::Raw(text.into()),
        }
    }

    /// The call expression, for either call statements or call-initialized
    /// locals.
    pub fn call(&self) -> Option<&CallExpr> {
        match &self.kind {
            StmtKind::Call(c) => Some(c),
            StmtKind::Local { init, .. } => Some(init),
            StmtKind::Raw(_) => None,
        }
    }

    pub fn text(&self) -> &str {
        match &self.kind {
            StmtKind::Call(c) => &c.text,
            StmtKind::Local { text, .. } => text,
            StmtKind::Raw(t) => t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    pub text: String,
}

/// A parsed call expression, e.g. `Assert.Equal(expected, actual)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    /// Member-access chain before the method name, e.g. `Assert` or
    /// `TestContext.Out`. `None` for bare calls.
    pub receiver: Option<String>,
    pub method: SmolStr,
    /// Explicit type arguments, without angle brackets.
    pub type_args: Vec<String>,
    pub args: Vec<CallArg>,
    pub awaited: bool,
    /// Full expression text including `await` and arguments, without the
    /// trailing semicolon.
    pub text: String,
}

impl CallExpr {
    /// First segment of the receiver chain (`TestContext.Out` -> `TestContext`).
    pub fn receiver_head(&self) -> Option<&str> {
        self.receiver
            .as_deref()
            .map(|r| r.split('.').next().unwrap_or(r))
    }

    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(|a| a.value.as_str())
    }

    /// Positional argument values, named arguments excluded.
    pub fn positional(&self) -> Vec<&str> {
        self.args
            .iter()
            .filter(|a| a.name.is_none())
            .map(|a| a.value.as_str())
            .collect()
    }

    pub fn named(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| a.value.as_str())
    }

    pub fn first_type_arg(&self) -> Option<&str> {
        self.type_args.first().map(|s| s.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArg {
    pub name: Option<SmolStr>,
    pub value: String,
}

/// Split an argument list on top-level commas and pull out `name:` and
/// `Name = value` forms.
pub fn parse_arg_list(list: &str) -> Vec<CallArg> {
    scan::split_top_level(list, ',')
        .into_iter()
        .map(|raw| {
            let raw = raw.trim();
            // `name: value` (but not `::`)
            if let Some(colon) = raw.find(':') {
                let (lhs, rhs) = raw.split_at(colon);
                let lhs = lhs.trim();
                if !rhs.starts_with("::")
                    && is_identifier(lhs)
                    && !rhs[1..].trim_start().is_empty()
                {
                    return CallArg {
                        name: Some(SmolStr::new(lhs)),
                        value: rhs[1..].trim().to_string(),
                    };
                }
            }
            // `Name = value`
            if let Some(eq) = scan::find_top_level(raw, b'=') {
                let lhs = raw[..eq].trim();
                if is_identifier(lhs) {
                    return CallArg {
                        name: Some(SmolStr::new(lhs)),
                        value: raw[eq + 1..].trim().to_string(),
                    };
                }
            }
            CallArg {
                name: None,
                value: raw.to_string(),
            }
        })
        .collect()
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if unicode_ident::is_xid_start(c) || c == '_' || c == '@' => {}
        _ => return false,
    }
    chars.all(|c| unicode_ident::is_xid_continue(c))
}

/// Type name up to the first `<`, `[` or `?`.
pub fn type_head(ty: &str) -> &str {
    let ty = ty.trim();
    let end = ty
        .find(|c| c == '<' || c == '[' || c == '?')
        .unwrap_or(ty.len());
    ty[..end].trim()
}

/// Type arguments of the outermost generic, empty when not generic.
pub fn type_args_of(ty: &str) -> Vec<String> {
    let ty = ty.trim();
    let Some(open) = ty.find('<') else {
        return Vec::new();
    };
    let Some(close) = ty.rfind('>') else {
        return Vec::new();
    };
    if close <= open {
        return Vec::new();
    }
    scan::split_type_args(&ty[open + 1..close])
}

/// True when the expression is a string literal (ordinary, verbatim or
/// interpolated).
pub fn is_string_literal(expr: &str) -> bool {
    let e = expr.trim();
    e.starts_with('"') || e.starts_with("@\"") || e.starts_with("$\"") || e.starts_with("$@\"") || e.starts_with("@$\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_helpers() {
        assert_eq!(type_head("TheoryData<int, string>"), "TheoryData");
        assert_eq!(
            type_args_of("TheoryData<int, string>"),
            vec!["int", "string"]
        );
        assert_eq!(type_head("int[]"), "int");
        assert!(type_args_of("int").is_empty());
    }

    #[test]
    fn named_args_are_detected() {
        let args = parse_arg_list(r#"1, 2, TestName = "x", skip: "y""#);
        assert_eq!(args.len(), 4);
        assert_eq!(args[2].name.as_deref(), Some("TestName"));
        assert_eq!(args[2].value, r#""x""#);
        assert_eq!(args[3].name.as_deref(), Some("skip"));
    }

    #[test]
    fn lambda_args_are_not_named() {
        let args = parse_arg_list("x => x == 1, 2");
        assert_eq!(args.len(), 2);
        assert!(args[0].name.is_none());
    }

    #[test]
    fn string_literal_detection() {
        assert!(is_string_literal(r#""msg""#));
        assert!(is_string_literal(r#"$"got {x}""#));
        assert!(!is_string_literal("msg"));
    }
}
