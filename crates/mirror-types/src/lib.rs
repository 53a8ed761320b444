//! Generic type algebra for a Java-style reflection model.
//!
//! Types are plain values ([`Type`]) that refer to declarations through ids. The declarations
//! themselves (classes, type parameters, members) live behind a [`TypeEnv`], normally a
//! [`TypeStore`]. The [`reflect`] module holds the resolution engine: erasure, supertype and
//! subtype search, capture conversion, member type resolution, and canonicalization.

mod annotations;
mod error;
mod format;
mod store;
mod ty;

pub mod reflect;

pub use annotations::{Annotation, AnnotationSet, AnnotationValue};
pub use error::{ReflectError, Result};
pub use format::{class_name, type_name, TypeDisplay};
pub use store::{
    ClassDef, ClassKind, ConstructorDef, FieldDef, MethodDef, PrimitiveType, TypeEnv,
    TypeParamDef, TypeStore, WellKnownTypes, BOX_TYPES,
};
pub use ty::{
    ArrayType, CaptureId, CaptureType, ClassId, ClassRef, ConstructorId, FieldId, GenericDecl,
    MethodId, ParameterizedType, Type, TypeVarId, TypeVariable, WildcardType,
};
