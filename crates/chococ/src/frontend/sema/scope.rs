//! Lexical scope tree
//!
//! Scopes live in an arena and point at their parent by index. The parent
//! link can be redirected after creation with [`ScopeTree::set_parent`].
//! A stack tracks which scopes are currently open; the global scope is
//! created with the tree and is never popped.

use super::Symbol;
use crate::frontend::ast::DeclId;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Class,
    Func,
}

/// Declarations introduced directly in one lexical region
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    /// Insertion order; popping removes these from the resolver in reverse
    decls: Vec<DeclId>,
    names: HashMap<Symbol, DeclId>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            decls: Vec::new(),
            names: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn decls(&self) -> &[DeclId] {
        &self.decls
    }
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    open: Vec<ScopeId>,
}

impl ScopeTree {
    const GLOBAL: ScopeId = ScopeId(0);

    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
            open: vec![Self::GLOBAL],
        }
    }

    pub fn global(&self) -> ScopeId {
        Self::GLOBAL
    }

    /// Innermost open scope
    pub fn current(&self) -> ScopeId {
        self.open.last().copied().unwrap_or(Self::GLOBAL)
    }

    /// Open scopes, outermost first
    pub fn open_scopes(&self) -> &[ScopeId] {
        &self.open
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn kind(&self, id: ScopeId) -> ScopeKind {
        self.get(id).kind
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.get(id).parent
    }

    /// Open a new scope whose parent is the current scope
    pub fn push(&mut self, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(self.current())));
        self.open.push(id);
        debug!(?id, ?kind, depth = self.open.len(), "push scope");
        id
    }

    pub fn set_parent(&mut self, id: ScopeId, parent: ScopeId) {
        assert_ne!(id, parent, "scope cannot be its own parent");
        self.scopes[id.index()].parent = Some(parent);
    }

    /// Close the current scope; `None` when only the global scope is open
    pub fn pop(&mut self) -> Option<ScopeId> {
        if self.open.len() <= 1 {
            return None;
        }
        let id = self.open.pop()?;
        debug!(?id, depth = self.open.len(), "pop scope");
        Some(id)
    }

    /// Add `decl` under `name` to the current scope
    ///
    /// Returns `false` without changing anything if `decl` is already a
    /// member. The first declaration bound to a name keeps it.
    pub fn add_decl(&mut self, decl: DeclId, name: Symbol) -> bool {
        let current = self.current();
        let scope = &mut self.scopes[current.index()];
        if scope.decls.contains(&decl) {
            return false;
        }
        scope.decls.push(decl);
        scope.names.entry(name).or_insert(decl);
        true
    }

    pub fn is_decl_in_scope(&self, scope: ScopeId, decl: DeclId) -> bool {
        self.get(scope).decls.contains(&decl)
    }

    /// Declaration bound to `name` directly in `scope`
    pub fn lookup_local(&self, scope: ScopeId, name: Symbol) -> Option<DeclId> {
        self.get(scope).names.get(&name).copied()
    }

    /// A function scope nested directly in a class scope
    pub fn is_method(&self, id: ScopeId) -> bool {
        let scope = self.get(id);
        scope.kind == ScopeKind::Func
            && scope
                .parent
                .is_some_and(|parent| self.kind(parent) == ScopeKind::Class)
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::AstContext;
    use pretty_assertions::assert_eq;

    fn ids(ctx: &AstContext) -> (DeclId, DeclId, DeclId) {
        let builtins = ctx.builtins();
        (builtins.print, builtins.input, builtins.len)
    }

    #[test]
    fn test_global_scope_is_persistent() {
        let mut tree = ScopeTree::new();
        assert_eq!(tree.current(), tree.global());
        assert_eq!(tree.kind(tree.global()), ScopeKind::Global);
        assert_eq!(tree.pop(), None);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_push_links_parent() {
        let mut tree = ScopeTree::new();
        let class = tree.push(ScopeKind::Class);
        let method = tree.push(ScopeKind::Func);
        assert_eq!(tree.parent(class), Some(tree.global()));
        assert_eq!(tree.parent(method), Some(class));
        assert!(tree.is_method(method));
        assert!(!tree.is_method(class));

        assert_eq!(tree.pop(), Some(method));
        assert_eq!(tree.pop(), Some(class));
        assert_eq!(tree.current(), tree.global());
    }

    #[test]
    fn test_set_parent_redirects() {
        let mut tree = ScopeTree::new();
        let class = tree.push(ScopeKind::Class);
        let func = tree.push(ScopeKind::Func);
        assert!(tree.is_method(func));
        tree.set_parent(func, tree.global());
        assert!(!tree.is_method(func));
        assert_eq!(tree.parent(func), Some(tree.global()));
        assert_eq!(tree.parent(class), Some(tree.global()));
    }

    #[test]
    fn test_add_decl_is_idempotent() {
        let mut ctx = AstContext::new();
        let (print, input, _) = ids(&ctx);
        let name = ctx.symbols_mut().intern("x");

        let mut tree = ScopeTree::new();
        assert!(tree.add_decl(print, name));
        assert!(!tree.add_decl(print, name));
        assert!(tree.add_decl(input, name));

        let global = tree.global();
        assert_eq!(tree.get(global).decls(), &[print, input]);
        // The first binding keeps the name
        assert_eq!(tree.lookup_local(global, name), Some(print));
        assert!(tree.is_decl_in_scope(global, input));
    }

    #[test]
    fn test_membership_is_per_scope() {
        let mut ctx = AstContext::new();
        let (print, _, len) = ids(&ctx);
        let name = ctx.symbols_mut().intern("y");

        let mut tree = ScopeTree::new();
        tree.add_decl(print, name);
        let func = tree.push(ScopeKind::Func);
        tree.add_decl(len, name);

        assert!(tree.is_decl_in_scope(func, len));
        assert!(!tree.is_decl_in_scope(func, print));
        assert_eq!(tree.lookup_local(tree.global(), name), Some(print));
        assert_eq!(tree.lookup_local(func, name), Some(len));
    }
}
