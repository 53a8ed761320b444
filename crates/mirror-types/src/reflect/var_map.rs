use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::annotate::update_annotations;
use super::{class_def, type_param_def};
use crate::{
    ArrayType, ParameterizedType, ReflectError, Result, Type, TypeEnv, TypeVarId, WildcardType,
};

/// What to do with a type variable that has no binding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// Fail with [`ReflectError::UnresolvedVariable`].
    #[default]
    Exact,
    /// Leave the variable in place.
    AllowIncomplete,
}

/// Bindings from type variables to types, scoped to one resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarMap {
    map: HashMap<TypeVarId, Type>,
}

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for every class type parameter visible in `ty`: its own arguments and, walking
    /// through owner types, those of its enclosing classes.
    pub fn for_declaring_type(env: &dyn TypeEnv, ty: &Type) -> Result<Self> {
        let mut out = Self::new();
        let mut current = Some(ty);
        while let Some(Type::Parameterized(p)) = current {
            let def = class_def(env, p.raw)?;
            out.add_all(&def.type_params, &p.args)?;
            current = p.owner.as_deref();
        }
        Ok(out)
    }

    pub fn add(&mut self, var: TypeVarId, ty: Type) {
        self.map.insert(var, ty);
    }

    pub fn add_all(&mut self, vars: &[TypeVarId], types: &[Type]) -> Result<()> {
        if vars.len() != types.len() {
            return Err(ReflectError::invariant(format!(
                "{} type arguments for {} type parameters",
                types.len(),
                vars.len()
            )));
        }
        for (var, ty) in vars.iter().zip(types) {
            self.add(*var, ty.clone());
        }
        Ok(())
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Substitute the bindings into `ty`.
    pub fn map(&self, env: &dyn TypeEnv, ty: &Type, mode: MappingMode) -> Result<Type> {
        match ty {
            Type::Class(_) | Type::Capture(_) => Ok(ty.clone()),
            Type::TypeVar(var) => match self.map.get(&var.id) {
                Some(bound) => {
                    let declared = &type_param_def(env, var.id)?.annotations;
                    Ok(update_annotations(
                        bound.clone(),
                        &var.annotations.union(declared),
                    ))
                }
                None => match mode {
                    MappingMode::Exact => {
                        let def = type_param_def(env, var.id)?;
                        Err(ReflectError::UnresolvedVariable {
                            variable: def.name.clone(),
                            context: super::describe_owner(env, def.owner),
                        })
                    }
                    MappingMode::AllowIncomplete => {
                        tracing::trace!(
                            target: "mirror.reflect",
                            variable = %ty.display(env),
                            "leaving type variable unresolved"
                        );
                        Ok(ty.clone())
                    }
                },
            },
            Type::Parameterized(p) => {
                let owner = match &p.owner {
                    Some(owner) => Some(Box::new(self.map(env, owner, mode)?)),
                    None => None,
                };
                Ok(Type::Parameterized(ParameterizedType {
                    raw: p.raw,
                    args: self.map_all(env, &p.args, mode)?,
                    owner,
                    annotations: p.annotations.clone(),
                }))
            }
            Type::Wildcard(w) => Ok(Type::Wildcard(WildcardType {
                upper_bounds: self.map_all(env, &w.upper_bounds, mode)?,
                lower_bounds: self.map_all(env, &w.lower_bounds, mode)?,
                annotations: w.annotations.clone(),
            })),
            Type::Array(a) => Ok(Type::Array(ArrayType {
                component: Box::new(self.map(env, &a.component, mode)?),
                annotations: a.annotations.clone(),
            })),
        }
    }

    pub fn map_all(&self, env: &dyn TypeEnv, types: &[Type], mode: MappingMode) -> Result<Vec<Type>> {
        types.iter().map(|ty| self.map(env, ty, mode)).collect()
    }
}
