use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::AnnotationSet;

/// Identity of a class (or interface, or primitive) declared in a [`crate::TypeEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    /// `java.lang.Object` is always the first class of every store.
    pub const OBJECT: ClassId = ClassId(0);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a declared type variable.
///
/// Every type parameter declaration gets its own id, so two variables are the
/// same exactly when they share the declaring context and the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of a capture allocated inside a [`crate::reflect::TyContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureId(u32);

impl CaptureId {
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId {
    pub class: ClassId,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId {
    pub class: ClassId,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstructorId {
    pub class: ClassId,
    pub index: u32,
}

/// A generic declaration: something that can declare type parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GenericDecl {
    Class(ClassId),
    Method(MethodId),
    Constructor(ConstructorId),
}

/// A plain class use: no type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassRef {
    pub def: ClassId,
    pub annotations: AnnotationSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterizedType {
    pub raw: ClassId,
    pub args: Vec<Type>,
    /// Present for non-static inner classes of a generic enclosing class.
    pub owner: Option<Box<Type>>,
    pub annotations: AnnotationSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WildcardType {
    /// Never empty; `?` and `? super X` carry `[Object]`.
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
    pub annotations: AnnotationSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVariable {
    pub id: TypeVarId,
    pub annotations: AnnotationSet,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayType {
    pub component: Box<Type>,
    pub annotations: AnnotationSet,
}

/// A use of a capture variable. The bounds live in the owning context's arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureType {
    pub id: CaptureId,
    pub annotations: AnnotationSet,
}

/// A type node.
///
/// The set of variants is closed; every engine operation matches on it exhaustively.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Class(ClassRef),
    Parameterized(ParameterizedType),
    Wildcard(WildcardType),
    TypeVar(TypeVariable),
    Array(ArrayType),
    Capture(CaptureType),
}

static UNBOUND_WILDCARD: LazyLock<Type> = LazyLock::new(|| {
    Type::Wildcard(WildcardType {
        upper_bounds: vec![Type::class(ClassId::OBJECT)],
        lower_bounds: Vec::new(),
        annotations: AnnotationSet::new(),
    })
});

impl Type {
    pub fn class(def: ClassId) -> Type {
        Type::Class(ClassRef {
            def,
            annotations: AnnotationSet::new(),
        })
    }

    pub fn object() -> Type {
        Type::class(ClassId::OBJECT)
    }

    /// Unchecked construction; see [`crate::reflect::parameterized_class`] for the validating
    /// variant.
    pub fn parameterized(raw: ClassId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            raw,
            args,
            owner: None,
            annotations: AnnotationSet::new(),
        })
    }

    pub fn inner(owner: Type, raw: ClassId, args: Vec<Type>) -> Type {
        Type::Parameterized(ParameterizedType {
            raw,
            args,
            owner: Some(Box::new(owner)),
            annotations: AnnotationSet::new(),
        })
    }

    pub fn type_var(id: TypeVarId) -> Type {
        Type::TypeVar(TypeVariable {
            id,
            annotations: AnnotationSet::new(),
        })
    }

    pub fn array(component: Type) -> Type {
        Type::Array(ArrayType {
            component: Box::new(component),
            annotations: AnnotationSet::new(),
        })
    }

    /// `?`, i.e. `? extends Object`.
    pub fn unbounded_wildcard() -> Type {
        UNBOUND_WILDCARD.clone()
    }

    pub fn wildcard_extends(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
            annotations: AnnotationSet::new(),
        })
    }

    pub fn wildcard_super(bound: Type) -> Type {
        Type::Wildcard(WildcardType {
            upper_bounds: vec![Type::object()],
            lower_bounds: vec![bound],
            annotations: AnnotationSet::new(),
        })
    }

    pub fn annotations(&self) -> &AnnotationSet {
        match self {
            Type::Class(t) => &t.annotations,
            Type::Parameterized(t) => &t.annotations,
            Type::Wildcard(t) => &t.annotations,
            Type::TypeVar(t) => &t.annotations,
            Type::Array(t) => &t.annotations,
            Type::Capture(t) => &t.annotations,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut AnnotationSet {
        match self {
            Type::Class(t) => &mut t.annotations,
            Type::Parameterized(t) => &mut t.annotations,
            Type::Wildcard(t) => &mut t.annotations,
            Type::TypeVar(t) => &mut t.annotations,
            Type::Array(t) => &mut t.annotations,
            Type::Capture(t) => &mut t.annotations,
        }
    }

    pub fn with_annotations(mut self, annotations: AnnotationSet) -> Type {
        *self.annotations_mut() = annotations;
        self
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Type::Class(c) if c.def == ClassId::OBJECT)
    }

    /// Structural equality that ignores annotations at every level.
    pub fn same_type(&self, other: &Type) -> bool {
        fn all_same(a: &[Type], b: &[Type]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.same_type(b))
        }

        match (self, other) {
            (Type::Class(a), Type::Class(b)) => a.def == b.def,
            (Type::Parameterized(a), Type::Parameterized(b)) => {
                a.raw == b.raw
                    && all_same(&a.args, &b.args)
                    && match (&a.owner, &b.owner) {
                        (Some(a), Some(b)) => a.same_type(b),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (Type::Wildcard(a), Type::Wildcard(b)) => {
                all_same(&a.upper_bounds, &b.upper_bounds)
                    && all_same(&a.lower_bounds, &b.lower_bounds)
            }
            (Type::TypeVar(a), Type::TypeVar(b)) => a.id == b.id,
            (Type::Array(a), Type::Array(b)) => a.component.same_type(&b.component),
            (Type::Capture(a), Type::Capture(b)) => a.id == b.id,
            _ => false,
        }
    }
}

impl From<ClassRef> for Type {
    fn from(value: ClassRef) -> Self {
        Type::Class(value)
    }
}

impl From<ParameterizedType> for Type {
    fn from(value: ParameterizedType) -> Self {
        Type::Parameterized(value)
    }
}

impl From<WildcardType> for Type {
    fn from(value: WildcardType) -> Self {
        Type::Wildcard(value)
    }
}

impl From<TypeVariable> for Type {
    fn from(value: TypeVariable) -> Self {
        Type::TypeVar(value)
    }
}
