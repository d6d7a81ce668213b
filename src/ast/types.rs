//! Datatypes, declarations, and the struct registry.

use std::fmt;

/// Variable modifier bits. Modifiers are carried on [`Datatype`] but are
/// **not** part of type equality ([`Datatype::identical_to`]) — two
/// declarations with the same base and pointer level are compatible
/// regardless of `const`/`volatile`/signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const CONST: Modifiers = Modifiers(0x1);
    pub const VOLATILE: Modifiers = Modifiers(0x2);
    pub const UNSIGNED: Modifiers = Modifiers(0x4);
    pub const SIGNED: Modifiers = Modifiers(0x8);
    pub const STATIC: Modifiers = Modifiers(0x10);

    pub fn empty() -> Self {
        Modifiers(0)
    }

    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    pub fn contains(&self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }
}

/// The base (non-pointer, non-modifier) shape of a type.
///
/// `Null` and `Notype` are reserved variants: they round out the data model
/// but are never produced or consumed by the code generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    Int,
    Byte,
    Float,
    String,
    Struct(String),
    Null,
    Notype,
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base::Int => write!(f, "int"),
            Base::Byte => write!(f, "byte"),
            Base::Float => write!(f, "float"),
            Base::String => write!(f, "string"),
            Base::Struct(name) => write!(f, "{name}"),
            Base::Null => write!(f, "null"),
            Base::Notype => write!(f, "notype"),
        }
    }
}

/// `{ base, ptr_level, modifiers }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datatype {
    pub base: Base,
    pub ptr_level: u32,
    pub modifiers: Modifiers,
}

impl Datatype {
    pub fn new(base: Base, ptr_level: u32) -> Self {
        Datatype {
            base,
            ptr_level,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        self.ptr_level > 0
    }

    pub fn is_struct_value(&self) -> bool {
        matches!(self.base, Base::Struct(_)) && self.ptr_level == 0
    }

    pub fn struct_name(&self) -> Option<&str> {
        match &self.base {
            Base::Struct(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// One level of pointer indirection removed, e.g. for `^` deref or
    /// stripping the handle around a by-value struct reference.
    pub fn pointee(&self) -> Datatype {
        Datatype {
            base: self.base.clone(),
            ptr_level: self.ptr_level.saturating_sub(1),
            modifiers: self.modifiers,
        }
    }

    pub fn addr_of(&self) -> Datatype {
        Datatype {
            base: self.base.clone(),
            ptr_level: self.ptr_level + 1,
            modifiers: self.modifiers,
        }
    }

    /// Type equality for the purposes of assignment/argument/return
    /// checking: bases equal, `ptr_level` equal, struct names equal
    /// when the base is `Struct`; modifiers play no part (see Open
    /// Questions). `Int`/`Byte` are mutually compatible, and any pointer is
    /// compatible with `Int` for arithmetic purposes — those two special
    /// cases are intentionally *not* folded into this strict equality and
    /// are instead handled at each call site that needs them (coercion
    /// insertion, pointer-arithmetic scaling) since they are directional,
    /// not symmetric type-identity claims.
    pub fn identical_to(&self, other: &Datatype) -> bool {
        self.ptr_level == other.ptr_level && self.base == other.base
    }

    pub fn is_float(&self) -> bool {
        matches!(self.base, Base::Float) && self.ptr_level == 0
    }

    pub fn is_int_like(&self) -> bool {
        matches!(self.base, Base::Int | Base::Byte) && self.ptr_level == 0
    }
}

/// A variable or struct field. `slot` is a stack offset within the
/// owning function frame, or a field index within the owning struct
/// (multiplied by 8 bytes per slot when emitted as `icinc`).
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: String,
    pub datatype: Datatype,
    pub slot: u32,
}

/// A user-defined struct. The registry holds at most one entry per
/// name; an incomplete forward declaration is patched in place when its
/// full body is parsed.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub complete: bool,
    pub size: u32,
    pub fields: Vec<Decl>,
}

impl StructDef {
    pub fn field(&self, name: &str) -> Option<&Decl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The struct registry built by the parser and read by the code generator.
#[derive(Debug, Clone, Default)]
pub struct StructTable {
    structs: Vec<StructDef>,
}

impl StructTable {
    pub fn get(&self, name: &str) -> Option<&StructDef> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StructDef> {
        self.structs.iter_mut().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn insert(&mut self, def: StructDef) {
        self.structs.push(def);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructDef> {
        self.structs.iter()
    }
}

/// 8 bytes per stack-machine slot.
pub const SLOT_BYTES: u32 = 8;

/// Number of slots a value of `datatype` occupies when held as a local or
/// struct field: 1 for any pointer or primitive, `struct.size` for a
/// by-value struct.
pub fn slot_size(datatype: &Datatype, structs: &StructTable) -> u32 {
    if datatype.is_struct_value() {
        let name = datatype.struct_name().expect("struct_value implies Struct base");
        structs.get(name).map(|s| s.size).unwrap_or(0)
    } else {
        1
    }
}
