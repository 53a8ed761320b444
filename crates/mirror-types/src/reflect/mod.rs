//! The resolution engine.
//!
//! Read-only queries (`erase`, `exact_super_type`, `to_canonical`, ...) are free functions over a
//! [`TypeEnv`]. Anything that may allocate captures is a method on [`TyContext`].

mod annotate;
mod canonical;
mod capture;
mod env;
mod erase;
mod factory;
mod keyed;
mod member;
mod resolve;
mod supertypes;
mod var_map;
mod visitor;

pub use annotate::{merge_annotations, replace_annotations, replace_parameters, update_annotations};
pub use canonical::{canonical_eq, to_canonical, to_canonical_boxed, CanonicalType};
pub use env::{CaptureDef, TyContext};
pub use erase::{erase, RawClass};
pub use factory::{
    add_wildcard_parameters, array_component_type, box_type, expand_class_generics,
    is_fully_bound, is_missing_type_parameters, parameterized_class, parameterized_inner_class,
    upper_bound_classes,
};
pub use keyed::{KeyMode, MapBacking, SetBacking, TypeMap, TypeSet};
pub use member::Member;
pub use supertypes::{
    exact_direct_super_types, exact_sub_type, exact_super_class, exact_super_type, type_parameter,
};
pub use var_map::{MappingMode, VarMap};
pub use visitor::{
    transform, walk_array, walk_capture, walk_parameterized, walk_type_var, walk_wildcard,
    TypeVisitor, VisitCache,
};

use crate::{
    CaptureId, ClassDef, ClassId, GenericDecl, ReflectError, Result, TypeEnv, TypeParamDef,
    TypeVarId, TypeVariable,
};

pub(crate) fn class_def(env: &dyn TypeEnv, id: ClassId) -> Result<&ClassDef> {
    env.class(id)
        .ok_or_else(|| ReflectError::invariant(format!("unknown class #{}", id.to_raw())))
}

pub(crate) fn type_param_def(env: &dyn TypeEnv, id: TypeVarId) -> Result<&TypeParamDef> {
    env.type_param(id)
        .ok_or_else(|| ReflectError::invariant(format!("unknown type variable #{}", id.to_raw())))
}

pub(crate) fn capture_def(env: &dyn TypeEnv, id: CaptureId) -> Result<&CaptureDef> {
    env.capture_var(id).ok_or_else(|| {
        ReflectError::invariant(format!(
            "capture #{} does not belong to this context",
            id.to_raw()
        ))
    })
}

/// A use of a declared type variable, carrying the annotations of its declaration.
pub(crate) fn declared_variable(env: &dyn TypeEnv, id: TypeVarId) -> Result<TypeVariable> {
    Ok(TypeVariable {
        id,
        annotations: type_param_def(env, id)?.annotations.clone(),
    })
}

pub(crate) fn describe_owner(env: &dyn TypeEnv, owner: Option<GenericDecl>) -> String {
    match owner {
        Some(GenericDecl::Class(class)) => crate::class_name(env, class),
        Some(GenericDecl::Method(method)) => Member::Method(method).describe(env),
        Some(GenericDecl::Constructor(ctor)) => Member::Constructor(ctor).describe(env),
        None => "<undeclared>".to_owned(),
    }
}
