pub use command::{Binary, CallData, Command, CondJump, Unary};

mod command;

/// A virtual operand produced and consumed by IL commands, independent of
/// any physical storage.
///
/// Values are created by the front end; this layer only reads their type
/// metadata to pick legal encodings. Identity is the `id`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Value {
    pub id: usize,
    pub ty: Type,
}

impl Value {
    pub fn new(id: usize, ty: Type) -> Self {
        Self { id, ty }
    }
}

/// The slice of front-end type information lowering cares about: operand
/// width, signedness, and pointer/void classification.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Type {
    /// Size in bytes.
    pub size: usize,
    pub signed: bool,
    pub kind: TypeKind,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeKind {
    Int,
    Pointer,
    Void,
}

impl Type {
    pub const fn int(size: usize, signed: bool) -> Self {
        Self {
            size,
            signed,
            kind: TypeKind::Int,
        }
    }

    pub const fn pointer(size: usize) -> Self {
        Self {
            size,
            signed: false,
            kind: TypeKind::Pointer,
        }
    }

    pub const fn void() -> Self {
        Self {
            size: 0,
            signed: false,
            kind: TypeKind::Void,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, TypeKind::Pointer)
    }
}
