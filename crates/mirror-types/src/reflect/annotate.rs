use super::class_def;
use crate::{
    AnnotationSet, ArrayType, ParameterizedType, ReflectError, Result, Type, TypeEnv,
    WildcardType,
};

/// Replace the top-level annotations of `ty`.
pub fn replace_annotations(ty: Type, annotations: AnnotationSet) -> Type {
    ty.with_annotations(annotations)
}

/// Add `annotations` to the top-level annotations of `ty`.
pub fn update_annotations(mut ty: Type, annotations: &AnnotationSet) -> Type {
    if annotations.is_empty() {
        return ty;
    }
    let merged = ty.annotations().union(annotations);
    *ty.annotations_mut() = merged;
    ty
}

/// Union the annotations of two types of the same shape, at every level.
pub fn merge_annotations(left: &Type, right: &Type) -> Result<Type> {
    fn merge_all(left: &[Type], right: &[Type]) -> Result<Vec<Type>> {
        if left.len() != right.len() {
            return Err(ReflectError::invariant("cannot merge type lists of different length"));
        }
        left.iter()
            .zip(right)
            .map(|(l, r)| merge_annotations(l, r))
            .collect()
    }

    let annotations = left.annotations().union(right.annotations());
    let merged = match (left, right) {
        (Type::Class(l), Type::Class(r)) if l.def == r.def => Type::Class(l.clone()),
        (Type::Parameterized(l), Type::Parameterized(r)) if l.raw == r.raw => {
            let owner = match (&l.owner, &r.owner) {
                (Some(lo), Some(ro)) => Some(Box::new(merge_annotations(lo, ro)?)),
                (None, None) => None,
                _ => return Err(mismatch(left, right)),
            };
            Type::Parameterized(ParameterizedType {
                raw: l.raw,
                args: merge_all(&l.args, &r.args)?,
                owner,
                annotations: AnnotationSet::new(),
            })
        }
        (Type::Wildcard(l), Type::Wildcard(r)) => Type::Wildcard(WildcardType {
            upper_bounds: merge_all(&l.upper_bounds, &r.upper_bounds)?,
            lower_bounds: merge_all(&l.lower_bounds, &r.lower_bounds)?,
            annotations: AnnotationSet::new(),
        }),
        (Type::TypeVar(l), Type::TypeVar(r)) if l.id == r.id => Type::TypeVar(l.clone()),
        (Type::Array(l), Type::Array(r)) => Type::Array(ArrayType {
            component: Box::new(merge_annotations(&l.component, &r.component)?),
            annotations: AnnotationSet::new(),
        }),
        (Type::Capture(l), Type::Capture(r)) if l.id == r.id => Type::Capture(l.clone()),
        _ => return Err(mismatch(left, right)),
    };
    Ok(merged.with_annotations(annotations))
}

fn mismatch(left: &Type, right: &Type) -> ReflectError {
    ReflectError::invariant(format!(
        "cannot merge annotations of structurally different types {left:?} and {right:?}"
    ))
}

/// `ty` with its type arguments replaced by `args`; owner and annotations are kept.
pub fn replace_parameters(
    env: &dyn TypeEnv,
    ty: &ParameterizedType,
    args: Vec<Type>,
) -> Result<Type> {
    let expected = class_def(env, ty.raw)?.type_params.len();
    if args.len() != expected {
        return Err(ReflectError::invariant(format!(
            "{} expects {expected} type arguments, got {}",
            crate::class_name(env, ty.raw),
            args.len()
        )));
    }
    Ok(Type::Parameterized(ParameterizedType {
        raw: ty.raw,
        args,
        owner: ty.owner.clone(),
        annotations: ty.annotations.clone(),
    }))
}
