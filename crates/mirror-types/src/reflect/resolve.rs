use super::annotate::update_annotations;
use super::factory::expand_class_generics;
use super::supertypes::type_parameter;
use super::var_map::MappingMode;
use super::visitor::{transform, TypeVisitor, VisitCache};
use super::{type_param_def, TyContext};
use crate::{
    ArrayType, ClassRef, GenericDecl, ParameterizedType, ReflectError, Result, Type, TypeEnv,
    WildcardType,
};

/// Replaces every raw use of a generic class by its generic form (`List` becomes `List<E>`).
#[derive(Default)]
struct ExpandGenerics {
    cache: VisitCache,
}

impl TypeVisitor for ExpandGenerics {
    fn cache(&mut self) -> &mut VisitCache {
        &mut self.cache
    }

    fn visit_class(&mut self, cx: &mut TyContext<'_>, ty: &ClassRef) -> Result<Type> {
        let expanded = expand_class_generics(cx, ty.def)?;
        Ok(update_annotations(expanded, &ty.annotations))
    }
}

impl TyContext<'_> {
    /// `ty` with every raw generic class replaced by its generic form.
    pub fn expand_generics(&mut self, ty: &Type) -> Result<Type> {
        transform(&mut ExpandGenerics::default(), self, ty)
    }

    /// Resolve the class type variables in `unresolved` against `context`.
    ///
    /// A variable declared by class `C` resolves to the matching argument of the `C` supertype
    /// of `context`. Raw classes in `context` are first expanded to their generic form, so a
    /// raw context resolves variables to themselves.
    pub fn resolve_type(
        &mut self,
        unresolved: &Type,
        context: &Type,
        mode: MappingMode,
    ) -> Result<Type> {
        let context = self.expand_generics(context)?;
        resolve_in(self, unresolved, &context, mode)
    }

    pub fn resolve_exact_type(&mut self, unresolved: &Type, context: &Type) -> Result<Type> {
        self.resolve_type(unresolved, context, MappingMode::Exact)
    }
}

fn resolve_all(
    env: &dyn TypeEnv,
    types: &[Type],
    context: &Type,
    mode: MappingMode,
) -> Result<Vec<Type>> {
    types
        .iter()
        .map(|ty| resolve_in(env, ty, context, mode))
        .collect()
}

fn resolve_in(env: &dyn TypeEnv, unresolved: &Type, context: &Type, mode: MappingMode) -> Result<Type> {
    match unresolved {
        Type::Class(_) | Type::Capture(_) => Ok(unresolved.clone()),
        Type::Parameterized(p) => Ok(Type::Parameterized(ParameterizedType {
            raw: p.raw,
            args: resolve_all(env, &p.args, context, mode)?,
            owner: p.owner.clone(),
            annotations: p.annotations.clone(),
        })),
        Type::Wildcard(w) => Ok(Type::Wildcard(WildcardType {
            upper_bounds: resolve_all(env, &w.upper_bounds, context, mode)?,
            lower_bounds: resolve_all(env, &w.lower_bounds, context, mode)?,
            annotations: w.annotations.clone(),
        })),
        Type::Array(a) => Ok(Type::Array(ArrayType {
            component: Box::new(resolve_in(env, &a.component, context, mode)?),
            annotations: a.annotations.clone(),
        })),
        Type::TypeVar(var) => {
            let def = type_param_def(env, var.id)?;
            if let Some(GenericDecl::Class(_)) = def.owner {
                if let Some(resolved) = type_parameter(env, context, var.id)? {
                    return Ok(update_annotations(resolved, &var.annotations));
                }
            }
            match mode {
                MappingMode::AllowIncomplete => Ok(unresolved.clone()),
                MappingMode::Exact => Err(ReflectError::UnresolvedVariable {
                    variable: def.name.clone(),
                    context: context.display(env).to_string(),
                }),
            }
        }
    }
}
