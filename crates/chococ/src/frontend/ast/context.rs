//! Declaration arena and built-in declarations

use super::{
    ClassDef, DeclId, DeclKind, Declaration, FuncDef, Identifier, ParamDecl, TypeAnnotation,
};
use crate::common::Span;
use crate::frontend::sema::{Symbol, SymbolTable};

/// Ids of the predefined classes and functions
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub object: DeclId,
    pub int: DeclId,
    pub str: DeclId,
    pub bool: DeclId,
    pub none: DeclId,
    pub empty: DeclId,
    pub print: DeclId,
    pub input: DeclId,
    pub len: DeclId,
}

impl Builtins {
    pub fn classes(&self) -> [DeclId; 6] {
        [self.object, self.int, self.str, self.bool, self.none, self.empty]
    }

    pub fn functions(&self) -> [DeclId; 3] {
        [self.print, self.input, self.len]
    }

    /// Classes that may not be extended
    pub fn is_special_class(&self, decl: DeclId) -> bool {
        [self.int, self.str, self.bool, self.none, self.empty].contains(&decl)
    }
}

/// Owner of all declarations and identifier spellings of one compilation
#[derive(Debug)]
pub struct AstContext {
    decls: Vec<Declaration>,
    symbols: SymbolTable,
    builtins: Builtins,
}

impl AstContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            decls: Vec::new(),
            symbols: SymbolTable::new(),
            builtins: Builtins {
                object: DeclId(0),
                int: DeclId(0),
                str: DeclId(0),
                bool: DeclId(0),
                none: DeclId(0),
                empty: DeclId(0),
                print: DeclId(0),
                input: DeclId(0),
                len: DeclId(0),
            },
        };
        ctx.builtins = ctx.create_builtins();
        ctx
    }

    fn create_builtins(&mut self) -> Builtins {
        let known = *self.symbols.known();
        let object = self.builtin_class(known.object, None);
        let int = self.builtin_class(known.int, Some(known.object));
        let str = self.builtin_class(known.str, Some(known.object));
        let bool = self.builtin_class(known.bool, Some(known.object));
        let none = self.builtin_class(known.none, Some(known.object));
        let empty = self.builtin_class(known.empty, Some(known.object));

        let arg = self.symbols.intern("arg");
        let print = self.builtin_func(known.print, &[(arg, known.object)], None);
        let input = self.builtin_func(known.input, &[], Some(known.str));
        let len = self.builtin_func(known.len, &[(arg, known.object)], Some(known.int));

        Builtins {
            object,
            int,
            str,
            bool,
            none,
            empty,
            print,
            input,
            len,
        }
    }

    /// Built-in class with a no-argument `__init__`
    fn builtin_class(&mut self, name: Symbol, super_class: Option<Symbol>) -> DeclId {
        let known = *self.symbols.known();
        let init = self.builtin_func(known.init, &[(known.self_, name)], None);
        self.alloc(Declaration::new(
            Identifier::new(name, Span::default()),
            DeclKind::Class(ClassDef {
                super_class: super_class.map(|s| Identifier::new(s, Span::default())),
                members: vec![init],
            }),
            Span::default(),
        ))
    }

    fn builtin_func(
        &mut self,
        name: Symbol,
        params: &[(Symbol, Symbol)],
        ret: Option<Symbol>,
    ) -> DeclId {
        let params = params
            .iter()
            .map(|&(param, ty)| {
                self.alloc(Declaration::new(
                    Identifier::new(param, Span::default()),
                    DeclKind::Param(ParamDecl {
                        ty: TypeAnnotation::class(ty, Span::default()),
                    }),
                    Span::default(),
                ))
            })
            .collect();
        self.alloc(Declaration::new(
            Identifier::new(name, Span::default()),
            DeclKind::Func(FuncDef {
                params,
                return_type: ret.map(|ty| TypeAnnotation::class(ty, Span::default())),
                declarations: Vec::new(),
                statements: Vec::new(),
            }),
            Span::default(),
        ))
    }

    /// Move `decl` into the arena
    pub fn alloc(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        self.decls.push(decl);
        id
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    /// Spelling of a declaration's name
    pub fn name_of(&self, id: DeclId) -> &str {
        self.symbols.name(self.decl(id).name.symbol)
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl Default for AstContext {
    fn default() -> Self {
        Self::new()
    }
}
