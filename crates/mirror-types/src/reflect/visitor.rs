//! Bottom-up rewriting of type graphs.
//!
//! A [`TypeVisitor`] overrides the node kinds it cares about; every other node is rebuilt from
//! its transformed children. Captures and type variables are cached before their bounds are
//! visited, so a capture whose bounds refer back to itself is rebuilt into a new capture that
//! refers to the new node instead of recursing forever.

use std::collections::HashMap;

use super::{capture_def, TyContext};
use crate::{
    AnnotationSet, ArrayType, CaptureType, ClassRef, ParameterizedType, ReflectError, Result,
    Type, TypeVarId, TypeVariable, WildcardType,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CaptureKey {
    wildcard: WildcardType,
    variable: TypeVariable,
    annotations: AnnotationSet,
}

/// Per-transform memo of already rebuilt variables and captures.
#[derive(Debug, Default)]
pub struct VisitCache {
    vars: HashMap<(TypeVarId, AnnotationSet), Type>,
    captures: HashMap<CaptureKey, Type>,
}

impl VisitCache {
    pub fn clear(&mut self) {
        self.vars.clear();
        self.captures.clear();
    }
}

pub trait TypeVisitor {
    fn cache(&mut self) -> &mut VisitCache;

    fn visit_class(&mut self, _cx: &mut TyContext<'_>, ty: &ClassRef) -> Result<Type> {
        Ok(Type::Class(ty.clone()))
    }

    fn visit_parameterized(
        &mut self,
        cx: &mut TyContext<'_>,
        ty: &ParameterizedType,
    ) -> Result<Type> {
        walk_parameterized(self, cx, ty)
    }

    fn visit_wildcard(&mut self, cx: &mut TyContext<'_>, ty: &WildcardType) -> Result<Type> {
        walk_wildcard(self, cx, ty)
    }

    fn visit_type_var(&mut self, cx: &mut TyContext<'_>, ty: &TypeVariable) -> Result<Type> {
        walk_type_var(self, cx, ty)
    }

    fn visit_array(&mut self, cx: &mut TyContext<'_>, ty: &ArrayType) -> Result<Type> {
        walk_array(self, cx, ty)
    }

    fn visit_capture(&mut self, cx: &mut TyContext<'_>, ty: &CaptureType) -> Result<Type> {
        walk_capture(self, cx, ty)
    }
}

/// Dispatch `ty` to the matching `visit_*` method.
pub fn transform<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    cx: &mut TyContext<'_>,
    ty: &Type,
) -> Result<Type> {
    match ty {
        Type::Class(t) => visitor.visit_class(cx, t),
        Type::Parameterized(t) => visitor.visit_parameterized(cx, t),
        Type::Wildcard(t) => visitor.visit_wildcard(cx, t),
        Type::TypeVar(t) => visitor.visit_type_var(cx, t),
        Type::Array(t) => visitor.visit_array(cx, t),
        Type::Capture(t) => visitor.visit_capture(cx, t),
    }
}

fn transform_all<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    cx: &mut TyContext<'_>,
    types: &[Type],
) -> Result<Vec<Type>> {
    types.iter().map(|ty| transform(visitor, cx, ty)).collect()
}

pub fn walk_parameterized<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    cx: &mut TyContext<'_>,
    ty: &ParameterizedType,
) -> Result<Type> {
    let args = transform_all(visitor, cx, &ty.args)?;
    let owner = match &ty.owner {
        Some(owner) => Some(Box::new(transform(visitor, cx, owner)?)),
        None => None,
    };
    Ok(Type::Parameterized(ParameterizedType {
        raw: ty.raw,
        args,
        owner,
        annotations: ty.annotations.clone(),
    }))
}

pub fn walk_wildcard<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    cx: &mut TyContext<'_>,
    ty: &WildcardType,
) -> Result<Type> {
    Ok(Type::Wildcard(WildcardType {
        upper_bounds: transform_all(visitor, cx, &ty.upper_bounds)?,
        lower_bounds: transform_all(visitor, cx, &ty.lower_bounds)?,
        annotations: ty.annotations.clone(),
    }))
}

pub fn walk_array<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    cx: &mut TyContext<'_>,
    ty: &ArrayType,
) -> Result<Type> {
    Ok(Type::Array(ArrayType {
        component: Box::new(transform(visitor, cx, &ty.component)?),
        annotations: ty.annotations.clone(),
    }))
}

/// Variables are values here (their bounds live in the declaration), so the cache only
/// guarantees that every use of the same annotated variable maps to one node.
pub fn walk_type_var<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    _cx: &mut TyContext<'_>,
    ty: &TypeVariable,
) -> Result<Type> {
    let key = (ty.id, ty.annotations.clone());
    if let Some(hit) = visitor.cache().vars.get(&key) {
        return Ok(hit.clone());
    }
    let out = Type::TypeVar(ty.clone());
    visitor.cache().vars.insert(key, out.clone());
    Ok(out)
}

/// Rebuild a capture in two phases: allocate the new capture and cache it, then transform the
/// bounds, which may lead back to this capture through the cache.
pub fn walk_capture<V: TypeVisitor + ?Sized>(
    visitor: &mut V,
    cx: &mut TyContext<'_>,
    ty: &CaptureType,
) -> Result<Type> {
    let def = capture_def(cx, ty.id)?.clone();
    let key = CaptureKey {
        wildcard: def.wildcard().clone(),
        variable: def.variable().clone(),
        annotations: ty.annotations.clone(),
    };
    if let Some(hit) = visitor.cache().captures.get(&key) {
        return Ok(hit.clone());
    }

    let wildcard = match visitor.visit_wildcard(cx, def.wildcard())? {
        Type::Wildcard(wildcard) => wildcard,
        other => {
            return Err(ReflectError::invariant(format!(
                "capture wildcard rewritten to {}",
                other.display(cx)
            )))
        }
    };
    let variable = match visitor.visit_type_var(cx, def.variable())? {
        Type::TypeVar(variable) => variable,
        other => {
            return Err(ReflectError::invariant(format!(
                "capture variable rewritten to {}",
                other.display(cx)
            )))
        }
    };

    let lower_bounds = wildcard.lower_bounds.clone();
    let id = cx.alloc_capture(wildcard, variable)?;
    let out = Type::Capture(CaptureType {
        id,
        annotations: ty.annotations.clone(),
    });
    visitor.cache().captures.insert(key, out.clone());

    let upper_bounds = transform_all(visitor, cx, def.upper_bounds())?;
    cx.complete_capture(id, upper_bounds, lower_bounds)?;
    Ok(out)
}
