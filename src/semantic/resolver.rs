//! Symbol resolution over legacy test sources.
//!
//! Single-file migration has no compilation to lean on, so resolution is
//! best-effort: a resolver may know where a type comes from (project-wide
//! index, user-supplied map) or it may not. Callers treat [`Resolution::Unknown`]
//! as "assume it belongs to the framework under migration" so that plausible
//! candidates are never silently dropped.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

/// Outcome of a symbol lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Fully qualified name, e.g. `Xunit.Assert`.
    Known(SmolStr),
    Unknown,
}

impl Resolution {
    /// Whether the resolved symbol lives under one of `prefixes`.
    /// `None` when the symbol is unknown; the caller decides fail-open.
    pub fn belongs_to(&self, prefixes: &[&str]) -> Option<bool> {
        match self {
            Resolution::Known(q) => Some(prefixes.iter().any(|p| {
                q.as_str() == *p
                    || (q.starts_with(p) && q.as_bytes().get(p.len()) == Some(&b'.'))
            })),
            Resolution::Unknown => None,
        }
    }
}

/// Source of symbol knowledge for a migration run.
pub trait SymbolResolver: Send + Sync {
    /// Resolve a simple type name to its fully qualified name.
    fn resolve_type(&self, name: &str) -> Resolution;

    /// Resolve the static receiver of an invocation, e.g. `Assert` in
    /// `Assert.Equal(...)`.
    fn resolve_receiver(&self, receiver: &str) -> Resolution {
        self.resolve_type(receiver)
    }
}

/// Resolver that knows nothing. Every lookup is [`Resolution::Unknown`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResolver;

impl SymbolResolver for NullResolver {
    fn resolve_type(&self, _name: &str) -> Resolution {
        Resolution::Unknown
    }
}

/// Resolver backed by an explicit simple-name to qualified-name map.
#[derive(Debug, Default, Clone)]
pub struct MapResolver {
    types: FxHashMap<SmolStr, SmolStr>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, name: impl Into<SmolStr>, qualified: impl Into<SmolStr>) -> Self {
        self.insert(name, qualified);
        self
    }

    pub fn insert(&mut self, name: impl Into<SmolStr>, qualified: impl Into<SmolStr>) {
        self.types.insert(name.into(), qualified.into());
    }
}

impl SymbolResolver for MapResolver {
    fn resolve_type(&self, name: &str) -> Resolution {
        match self.types.get(name) {
            Some(q) => {
                trace!("[RESOLVE] '{}' -> '{}'", name, q);
                Resolution::Known(q.clone())
            }
            None => {
                trace!("[RESOLVE] '{}' -> unknown", name);
                Resolution::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_resolver_is_always_unknown() {
        assert_eq!(NullResolver.resolve_type("Assert"), Resolution::Unknown);
        assert_eq!(Resolution::Unknown.belongs_to(&["Xunit"]), None);
    }

    #[test]
    fn map_resolver_matches_prefixes() {
        let r = MapResolver::new()
            .with_type("Assert", "Xunit.Assert")
            .with_type("Calculator", "MyApp.Calculator");
        assert_eq!(r.resolve_type("Assert").belongs_to(&["Xunit"]), Some(true));
        assert_eq!(
            r.resolve_type("Calculator").belongs_to(&["Xunit", "NUnit"]),
            Some(false)
        );
    }

    #[test]
    fn prefix_match_requires_segment_boundary() {
        let res = Resolution::Known("NUnitLike.Assert".into());
        assert_eq!(res.belongs_to(&["NUnit"]), Some(false));
        let res = Resolution::Known("NUnit.Framework.Assert".into());
        assert_eq!(res.belongs_to(&["NUnit"]), Some(true));
    }
}
