//! Identifier resolver
//!
//! For every symbol, the declarations currently reachable by plain name,
//! innermost last. Declarations are pushed when registered and popped when
//! their scope closes. Pops must happen in strict reverse order; anything
//! else is a bug in the caller and panics.

use super::Symbol;
use crate::frontend::ast::DeclId;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Default)]
pub struct IdentifierResolver {
    chains: HashMap<Symbol, Vec<DeclId>>,
}

impl IdentifierResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `decl` the innermost binding of `symbol`
    pub fn add_decl(&mut self, decl: DeclId, symbol: Symbol) {
        trace!(?decl, ?symbol, "resolver push");
        self.chains.entry(symbol).or_default().push(decl);
    }

    /// Remove the innermost binding of `symbol`, which must be `decl`
    pub fn remove_decl(&mut self, decl: DeclId, symbol: Symbol) {
        trace!(?decl, ?symbol, "resolver pop");
        let chain = self.chains.get_mut(&symbol);
        let top = chain.as_ref().and_then(|c| c.last().copied());
        assert_eq!(
            top,
            Some(decl),
            "declarations must be removed in reverse registration order"
        );
        if let Some(chain) = chain {
            chain.pop();
            if chain.is_empty() {
                self.chains.remove(&symbol);
            }
        }
    }

    /// Visible declarations of `symbol`, innermost first
    pub fn iter(&self, symbol: Symbol) -> impl Iterator<Item = DeclId> + '_ {
        self.chains
            .get(&symbol)
            .into_iter()
            .flat_map(|chain| chain.iter().rev().copied())
    }

    /// Innermost declaration of `symbol`
    pub fn lookup(&self, symbol: Symbol) -> Option<DeclId> {
        self.chains.get(&symbol).and_then(|chain| chain.last().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
