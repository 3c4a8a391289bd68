//! Canonical type universe
//!
//! Class, list and function types are hash-consed: structurally equal
//! types share one id, so equality is an integer comparison. The six
//! built-in class types sit at fixed indices.

use std::collections::HashMap;
use std::fmt;

/// Canonical value type handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const OBJECT: TypeId = TypeId(0);
    pub const INT: TypeId = TypeId(1);
    pub const STR: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const NONE: TypeId = TypeId(4);
    pub const EMPTY: TypeId = TypeId(5);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `int`, `str` or `bool`
    pub fn is_primitive(self) -> bool {
        matches!(self, TypeId::INT | TypeId::STR | TypeId::BOOL)
    }
}

/// Canonical function type handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncTypeId(u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Nominal class type, keyed by class name
    Class(String),
    /// List of the element type
    List(TypeId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuncType {
    pub params: Vec<TypeId>,
    pub ret: TypeId,
}

const BUILTIN_CLASSES: [&str; 6] = ["object", "int", "str", "bool", "<None>", "<Empty>"];

/// Owner of every canonical type for one analysis
#[derive(Debug)]
pub struct TypeUniverse {
    values: Vec<ValueType>,
    value_ids: HashMap<ValueType, TypeId>,
    funcs: Vec<FuncType>,
    func_ids: HashMap<FuncType, FuncTypeId>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        let mut universe = Self {
            values: Vec::new(),
            value_ids: HashMap::new(),
            funcs: Vec::new(),
            func_ids: HashMap::new(),
        };
        for name in BUILTIN_CLASSES {
            universe.intern_value(ValueType::Class(name.to_string()));
        }
        universe
    }

    fn intern_value(&mut self, ty: ValueType) -> TypeId {
        if let Some(&id) = self.value_ids.get(&ty) {
            return id;
        }
        let id = TypeId(self.values.len() as u32);
        self.values.push(ty.clone());
        self.value_ids.insert(ty, id);
        id
    }

    /// Canonical class type named `name`
    pub fn class_type(&mut self, name: &str) -> TypeId {
        self.intern_value(ValueType::Class(name.to_string()))
    }

    /// Canonical `[element]`
    pub fn list_type(&mut self, element: TypeId) -> TypeId {
        self.intern_value(ValueType::List(element))
    }

    /// Canonical `(params) -> ret`
    pub fn func_type(&mut self, params: &[TypeId], ret: TypeId) -> FuncTypeId {
        let ty = FuncType {
            params: params.to_vec(),
            ret,
        };
        if let Some(&id) = self.func_ids.get(&ty) {
            return id;
        }
        let id = FuncTypeId(self.funcs.len() as u32);
        self.funcs.push(ty.clone());
        self.func_ids.insert(ty, id);
        id
    }

    pub fn get(&self, id: TypeId) -> &ValueType {
        &self.values[id.index()]
    }

    pub fn get_func(&self, id: FuncTypeId) -> &FuncType {
        &self.funcs[id.0 as usize]
    }

    /// Element type if `id` is a list type
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            ValueType::List(elem) => Some(*elem),
            ValueType::Class(_) => None,
        }
    }

    pub fn is_list(&self, id: TypeId) -> bool {
        self.element_type(id).is_some()
    }

    /// Class name if `id` is a class type
    pub fn class_name(&self, id: TypeId) -> Option<&str> {
        match self.get(id) {
            ValueType::Class(name) => Some(name),
            ValueType::List(_) => None,
        }
    }

    /// Whether a value of type `sub` may be stored in a location of type `sup`
    ///
    /// Not symmetric and not transitive. Only use it for assignment and
    /// argument passing, never as type equality.
    pub fn is_assignment_compatible(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        if sub == TypeId::NONE {
            return !sup.is_primitive();
        }
        if self.is_list(sup) {
            return sub == TypeId::EMPTY || self.element_type(sub) == Some(TypeId::NONE);
        }
        false
    }

    /// Display adapter for a value type
    pub fn display(&self, id: TypeId) -> DisplayType<'_> {
        DisplayType { universe: self, id }
    }

    /// Display adapter for a function type
    pub fn display_func(&self, id: FuncTypeId) -> DisplayFunc<'_> {
        DisplayFunc { universe: self, id }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DisplayType<'a> {
    universe: &'a TypeUniverse,
    id: TypeId,
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.universe.get(self.id) {
            ValueType::Class(name) => write!(f, "{}", name),
            ValueType::List(elem) => write!(f, "[{}]", self.universe.display(*elem)),
        }
    }
}

pub struct DisplayFunc<'a> {
    universe: &'a TypeUniverse,
    id: FuncTypeId,
}

impl fmt::Display for DisplayFunc<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let func = self.universe.get_func(self.id);
        write!(f, "(")?;
        for (i, param) in func.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.universe.display(*param))?;
        }
        write!(f, ") -> {}", self.universe.display(func.ret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtins_at_fixed_ids() {
        let mut universe = TypeUniverse::new();
        assert_eq!(universe.class_type("object"), TypeId::OBJECT);
        assert_eq!(universe.class_type("int"), TypeId::INT);
        assert_eq!(universe.class_type("str"), TypeId::STR);
        assert_eq!(universe.class_type("bool"), TypeId::BOOL);
        assert_eq!(universe.class_type("<None>"), TypeId::NONE);
        assert_eq!(universe.class_type("<Empty>"), TypeId::EMPTY);
        assert_eq!(universe.len(), 6);
    }

    #[test]
    fn test_canonicalization() {
        let mut universe = TypeUniverse::new();
        let a = universe.class_type("A");
        assert_eq!(universe.class_type("A"), a);

        let list_a = universe.list_type(a);
        let nested = universe.list_type(list_a);
        assert_eq!(universe.list_type(a), list_a);
        let again = universe.list_type(a);
        assert_eq!(universe.list_type(again), nested);
        assert_ne!(universe.list_type(TypeId::INT), list_a);

        let f = universe.func_type(&[TypeId::INT, a], TypeId::STR);
        assert_eq!(universe.func_type(&[TypeId::INT, a], TypeId::STR), f);
        assert_ne!(universe.func_type(&[a, TypeId::INT], TypeId::STR), f);
        assert_ne!(universe.func_type(&[TypeId::INT, a], TypeId::INT), f);
    }

    #[test]
    fn test_compatibility_is_reflexive() {
        let mut universe = TypeUniverse::new();
        let a = universe.class_type("A");
        let list_int = universe.list_type(TypeId::INT);
        for ty in [TypeId::OBJECT, TypeId::INT, TypeId::NONE, TypeId::EMPTY, a, list_int] {
            assert!(universe.is_assignment_compatible(ty, ty));
        }
    }

    #[test]
    fn test_none_compatibility() {
        let mut universe = TypeUniverse::new();
        let a = universe.class_type("A");
        let list_str = universe.list_type(TypeId::STR);
        assert!(universe.is_assignment_compatible(TypeId::NONE, a));
        assert!(universe.is_assignment_compatible(TypeId::NONE, TypeId::OBJECT));
        assert!(universe.is_assignment_compatible(TypeId::NONE, list_str));
        assert!(!universe.is_assignment_compatible(TypeId::NONE, TypeId::INT));
        assert!(!universe.is_assignment_compatible(TypeId::NONE, TypeId::STR));
        assert!(!universe.is_assignment_compatible(TypeId::NONE, TypeId::BOOL));
    }

    #[test]
    fn test_list_compatibility() {
        let mut universe = TypeUniverse::new();
        let list_int = universe.list_type(TypeId::INT);
        let list_str = universe.list_type(TypeId::STR);
        let list_none = universe.list_type(TypeId::NONE);
        let nested = universe.list_type(list_int);

        assert!(universe.is_assignment_compatible(TypeId::EMPTY, list_int));
        assert!(universe.is_assignment_compatible(TypeId::EMPTY, nested));
        assert!(universe.is_assignment_compatible(list_none, list_str));
        assert!(!universe.is_assignment_compatible(list_int, list_str));
        assert!(!universe.is_assignment_compatible(list_int, TypeId::EMPTY));
        assert!(!universe.is_assignment_compatible(TypeId::EMPTY, TypeId::INT));
    }

    #[test]
    fn test_compatibility_is_not_symmetric() {
        let mut universe = TypeUniverse::new();
        let a = universe.class_type("A");
        assert!(universe.is_assignment_compatible(TypeId::NONE, a));
        assert!(!universe.is_assignment_compatible(a, TypeId::NONE));
    }

    #[test]
    fn test_display() {
        let mut universe = TypeUniverse::new();
        let list_int = universe.list_type(TypeId::INT);
        let nested = universe.list_type(list_int);
        let f = universe.func_type(&[list_int, TypeId::BOOL], TypeId::NONE);
        let g = universe.func_type(&[], TypeId::STR);
        assert_eq!(universe.display(nested).to_string(), "[[int]]");
        assert_eq!(universe.display_func(f).to_string(), "([int], bool) -> <None>");
        assert_eq!(universe.display_func(g).to_string(), "() -> str");
    }
}
