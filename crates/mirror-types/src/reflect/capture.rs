use super::var_map::{MappingMode, VarMap};
use super::{capture_def, class_def, declared_variable, type_param_def, TyContext};
use crate::{CaptureId, CaptureType, ParameterizedType, ReflectError, Result, Type};

impl TyContext<'_> {
    /// Capture conversion.
    ///
    /// Every wildcard argument of a parameterized type is replaced by a fresh capture of the
    /// matching type parameter. Other types are returned unchanged. The owner type is captured
    /// on its own.
    pub fn capture(&mut self, ty: &Type) -> Result<Type> {
        match ty {
            Type::Parameterized(p) => self.capture_parameterized(p),
            _ => Ok(ty.clone()),
        }
    }

    fn capture_parameterized(&mut self, ty: &ParameterizedType) -> Result<Type> {
        let vars = class_def(self, ty.raw)?.type_params.clone();
        if vars.len() != ty.args.len() {
            return Err(ReflectError::invariant(format!(
                "{} type arguments for {}",
                ty.args.len(),
                crate::class_name(self, ty.raw)
            )));
        }

        // Allocate every capture before computing any bounds, since a bound may refer to a
        // sibling capture (`Foo<T, U extends T>`).
        let mut var_map = VarMap::new();
        let mut pending = Vec::new();
        let mut args = Vec::with_capacity(ty.args.len());
        for (var, arg) in vars.iter().zip(&ty.args) {
            let arg = match arg {
                Type::Wildcard(wildcard) => {
                    let variable = declared_variable(self, *var)?;
                    let annotations = wildcard.annotations.union(&variable.annotations);
                    let id = self.alloc_capture(wildcard.clone(), variable)?;
                    pending.push(id);
                    Type::Capture(CaptureType { id, annotations })
                }
                other => other.clone(),
            };
            var_map.add(*var, arg.clone());
            args.push(arg);
        }

        for id in &pending {
            self.init_capture(*id, &var_map)?;
        }
        if !pending.is_empty() {
            tracing::trace!(
                target: "mirror.reflect",
                class = %crate::class_name(self, ty.raw),
                captures = pending.len(),
                "captured wildcard arguments"
            );
        }

        let owner = match &ty.owner {
            Some(owner) => Some(Box::new(self.capture(owner)?)),
            None => None,
        };
        Ok(Type::Parameterized(ParameterizedType {
            raw: ty.raw,
            args,
            owner,
            annotations: ty.annotations.clone(),
        }))
    }

    /// Upper bounds: the variable's bounds with sibling captures substituted, followed by the
    /// wildcard's upper bounds minus a leading `Object`. Lower bounds: the wildcard's.
    fn init_capture(&mut self, id: CaptureId, var_map: &VarMap) -> Result<()> {
        let def = capture_def(self, id)?;
        let wildcard = def.wildcard().clone();
        let var_bounds = type_param_def(self, def.variable().id)?.upper_bounds.clone();

        let mut upper = var_map.map_all(self, &var_bounds, MappingMode::AllowIncomplete)?;
        let wildcard_upper = match wildcard.upper_bounds.split_first() {
            Some((first, rest)) if first.is_object() => rest,
            _ => &wildcard.upper_bounds[..],
        };
        upper.extend(wildcard_upper.iter().cloned());

        self.complete_capture(id, upper, wildcard.lower_bounds)
    }
}
