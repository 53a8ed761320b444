//! Validated construction and small structural queries.

use std::collections::HashSet;

use indexmap::IndexSet;

use super::erase::{erase, RawClass};
use super::supertypes::exact_direct_super_types;
use super::{class_def, declared_variable};
use crate::{
    AnnotationSet, ClassId, ParameterizedType, ReflectError, Result, Type, TypeEnv, TypeVarId,
};

fn check_arity(env: &dyn TypeEnv, raw: ClassId, args: &[Type]) -> Result<()> {
    let expected = class_def(env, raw)?.type_params.len();
    if expected != args.len() {
        return Err(ReflectError::invariant(format!(
            "{} expects {expected} type arguments, got {}",
            crate::class_name(env, raw),
            args.len()
        )));
    }
    Ok(())
}

/// `raw<args>`. A non-static inner class of a generic class gets its raw enclosing class as
/// owner.
pub fn parameterized_class(env: &dyn TypeEnv, raw: ClassId, args: Vec<Type>) -> Result<Type> {
    check_arity(env, raw, &args)?;
    let def = class_def(env, raw)?;
    let owner = match def.enclosing {
        Some(enclosing) if !def.is_static && is_missing_type_parameters(env, &Type::class(enclosing))? => {
            Some(Box::new(Type::class(enclosing)))
        }
        _ => None,
    };
    Ok(Type::Parameterized(ParameterizedType {
        raw,
        args,
        owner,
        annotations: AnnotationSet::new(),
    }))
}

/// `owner.raw<args>`; `owner` must name the class enclosing `raw`.
pub fn parameterized_inner_class(
    env: &dyn TypeEnv,
    owner: Type,
    raw: ClassId,
    args: Vec<Type>,
) -> Result<Type> {
    check_arity(env, raw, &args)?;
    let def = class_def(env, raw)?;
    let owner_class = erase(env, &owner)?.as_class();
    if def.is_static || def.enclosing.is_none() || def.enclosing != owner_class {
        return Err(ReflectError::invariant(format!(
            "{} is not an inner class of {}",
            crate::class_name(env, raw),
            owner.display(env)
        )));
    }
    Ok(Type::inner(owner, raw, args))
}

/// The generic form of a class: `C<T1, .., Tn>` over its own type variables. Non-static inner
/// classes of generic classes get the generic form of the enclosing class as owner.
pub fn expand_class_generics(env: &dyn TypeEnv, class: ClassId) -> Result<Type> {
    let def = class_def(env, class)?;
    let owner = match def.enclosing {
        Some(enclosing) if !def.is_static && is_missing_type_parameters(env, &Type::class(enclosing))? => {
            Some(Box::new(expand_class_generics(env, enclosing)?))
        }
        _ => None,
    };
    if def.type_params.is_empty() && owner.is_none() {
        return Ok(Type::class(class));
    }
    let args = def
        .type_params
        .iter()
        .map(|tp| declared_variable(env, *tp).map(Type::TypeVar))
        .collect::<Result<Vec<_>>>()?;
    Ok(Type::Parameterized(ParameterizedType {
        raw: class,
        args,
        owner,
        annotations: AnnotationSet::new(),
    }))
}

/// Whether `ty` is a raw use of a generic class, i.e. type arguments are missing either for the
/// class itself or for one of its enclosing classes.
pub fn is_missing_type_parameters(env: &dyn TypeEnv, ty: &Type) -> Result<bool> {
    let class = match ty {
        Type::Class(class) => class.def,
        Type::Array(array) => return is_missing_type_parameters(env, &array.component),
        _ => return Ok(false),
    };

    let def = class_def(env, class)?;
    if def.is_static {
        return Ok(!def.type_params.is_empty());
    }
    let mut current = Some(class);
    while let Some(id) = current {
        let def = class_def(env, id)?;
        if !def.type_params.is_empty() {
            return Ok(true);
        }
        current = def.enclosing;
    }
    Ok(false)
}

/// `raw` with every missing type argument replaced by `?`.
pub fn add_wildcard_parameters(env: &dyn TypeEnv, raw: &RawClass) -> Result<Type> {
    let class = match raw {
        RawClass::Array(component) => return Ok(Type::array(add_wildcard_parameters(env, component)?)),
        RawClass::Class(class) => *class,
    };
    if !is_missing_type_parameters(env, &Type::class(class))? {
        return Ok(Type::class(class));
    }

    let def = class_def(env, class)?;
    let owner = match def.enclosing {
        Some(enclosing) if !def.is_static => {
            match add_wildcard_parameters(env, &RawClass::Class(enclosing))? {
                owner @ Type::Parameterized(_) => Some(Box::new(owner)),
                _ => None,
            }
        }
        _ => None,
    };
    Ok(Type::Parameterized(ParameterizedType {
        raw: class,
        args: vec![Type::unbounded_wildcard(); def.type_params.len()],
        owner,
        annotations: AnnotationSet::new(),
    }))
}

/// No type variables, wildcards, or captures anywhere inside `ty`.
pub fn is_fully_bound(ty: &Type) -> bool {
    match ty {
        Type::Class(_) => true,
        Type::Parameterized(p) => {
            p.args.iter().all(is_fully_bound) && p.owner.as_deref().is_none_or(is_fully_bound)
        }
        Type::Array(a) => is_fully_bound(&a.component),
        Type::Wildcard(_) | Type::TypeVar(_) | Type::Capture(_) => false,
    }
}

pub fn array_component_type(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Array(a) => Some(&a.component),
        _ => None,
    }
}

/// The box class of a primitive class type; any other type is returned unchanged.
pub fn box_type(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Class(class) => match env.well_known().box_class(class.def) {
            Some(boxed) => Type::class(boxed).with_annotations(class.annotations.clone()),
            None => ty.clone(),
        },
        _ => ty.clone(),
    }
}

/// The classes and interfaces `ty` is bounded by, in declaration order and without duplicates.
///
/// For `T extends Number & Iterable<T>` this is `[Number, Iterable]`; a class or interface
/// yields just itself.
pub fn upper_bound_classes(env: &dyn TypeEnv, ty: &Type) -> Result<Vec<RawClass>> {
    fn collect(
        env: &dyn TypeEnv,
        ty: &Type,
        out: &mut IndexSet<RawClass>,
        visiting: &mut HashSet<TypeVarId>,
    ) -> Result<()> {
        match ty {
            Type::Class(_) | Type::Parameterized(_) | Type::Array(_) => {
                out.insert(erase(env, ty)?);
            }
            _ => {
                if let Type::TypeVar(var) = ty {
                    if !visiting.insert(var.id) {
                        return Err(ReflectError::invariant(format!(
                            "cyclic bounds on type variable {}",
                            ty.display(env)
                        )));
                    }
                }
                for sup in exact_direct_super_types(env, ty)? {
                    collect(env, &sup, out, visiting)?;
                }
                if let Type::TypeVar(var) = ty {
                    visiting.remove(&var.id);
                }
            }
        }
        Ok(())
    }

    let mut out = IndexSet::new();
    collect(env, ty, &mut out, &mut HashSet::new())?;
    Ok(out.into_iter().collect())
}
