use std::collections::HashSet;

use super::annotate::{replace_annotations, update_annotations};
use super::erase::{erase, RawClass};
use super::factory::{expand_class_generics, is_missing_type_parameters};
use super::var_map::{MappingMode, VarMap};
use super::{capture_def, class_def, type_param_def, TyContext};
use crate::{
    ArrayType, CaptureId, ClassId, GenericDecl, ReflectError, Result, Type, TypeEnv, TypeVarId,
};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum Visiting {
    Var(TypeVarId),
    Capture(CaptureId),
}

/// The supertype of `ty` whose erasure is `target`, with type arguments substituted along the
/// way; `None` if `target` is not a supertype.
///
/// Example: `ArrayList<String>` searched for `List` yields `List<String>`.
pub fn exact_super_type(env: &dyn TypeEnv, ty: &Type, target: &RawClass) -> Result<Option<Type>> {
    let mut visiting = HashSet::new();
    search_super_type(env, ty, target, &mut visiting)
}

fn search_super_type(
    env: &dyn TypeEnv,
    ty: &Type,
    target: &RawClass,
    visiting: &mut HashSet<Visiting>,
) -> Result<Option<Type>> {
    if matches!(ty, Type::Class(_) | Type::Parameterized(_) | Type::Array(_)) {
        let raw = erase(env, ty)?;
        if raw == *target {
            return Ok(Some(ty.clone()));
        }
        if !target.is_assignable_from(env, &raw) {
            return Ok(None);
        }
    }

    // Bounds of variables and captures may mention the variable again.
    let key = match ty {
        Type::TypeVar(var) => Some(Visiting::Var(var.id)),
        Type::Capture(capture) => Some(Visiting::Capture(capture.id)),
        _ => None,
    };
    if let Some(key) = key {
        if !visiting.insert(key) {
            return Ok(None);
        }
    }

    let mut found = None;
    for sup in exact_direct_super_types(env, ty)? {
        if let Some(result) = search_super_type(env, &sup, target, visiting)? {
            found = Some(result);
            break;
        }
    }

    if let Some(key) = key {
        visiting.remove(&key);
    }
    Ok(found)
}

/// The direct supertypes of `ty`, with type arguments of `ty` substituted into them.
///
/// Type variables, wildcards, and captures yield their upper bounds. Arrays follow array
/// covariance and always include `Object`, `Cloneable`, and `Serializable`.
pub fn exact_direct_super_types(env: &dyn TypeEnv, ty: &Type) -> Result<Vec<Type>> {
    match ty {
        Type::Class(class) => class_direct_super_types(env, class.def, ty),
        Type::Parameterized(p) => class_direct_super_types(env, p.raw, ty),
        Type::TypeVar(var) => Ok(type_param_def(env, var.id)?.upper_bounds.clone()),
        Type::Wildcard(w) => Ok(w.upper_bounds.clone()),
        Type::Capture(capture) => Ok(capture_def(env, capture.id)?.upper_bounds().to_vec()),
        Type::Array(array) => array_direct_super_types(env, array),
    }
}

fn class_direct_super_types(env: &dyn TypeEnv, class: ClassId, ty: &Type) -> Result<Vec<Type>> {
    let def = class_def(env, class)?;
    if class == env.well_known().object || def.primitive_type().is_some() {
        return Ok(Vec::new());
    }

    let mut out = Vec::with_capacity(def.interfaces.len() + 1);
    if def.is_interface() {
        if def.interfaces.is_empty() {
            out.push(Type::object());
        }
    } else {
        match &def.super_class {
            Some(super_class) => out.push(map_type_parameters(env, super_class, ty)?),
            None => out.push(Type::object()),
        }
    }
    for iface in &def.interfaces {
        out.push(map_type_parameters(env, iface, ty)?);
    }
    Ok(out)
}

fn array_direct_super_types(env: &dyn TypeEnv, array: &ArrayType) -> Result<Vec<Type>> {
    let primitive_component = match array.component.as_ref() {
        Type::Class(c) => class_def(env, c.def)?.primitive_type().is_some(),
        _ => false,
    };

    let mut out = Vec::new();
    if !primitive_component {
        out.extend(
            exact_direct_super_types(env, &array.component)?
                .into_iter()
                .map(Type::array),
        );
    }
    out.extend(
        env.well_known()
            .array_supertypes()
            .into_iter()
            .map(Type::class),
    );
    Ok(out)
}

/// Substitute the type arguments of `type_and_params` into a supertype declared by its class.
/// A raw `type_and_params` erases the result.
fn map_type_parameters(env: &dyn TypeEnv, to_map: &Type, type_and_params: &Type) -> Result<Type> {
    if is_missing_type_parameters(env, type_and_params)? {
        let raw = erase(env, to_map)?.to_type();
        return Ok(replace_annotations(raw, to_map.annotations().clone()));
    }
    VarMap::for_declaring_type(env, type_and_params)?.map(env, to_map, MappingMode::Exact)
}

/// The most specific parameterization of `target` that is a subtype of `super_type`.
///
/// Returns `None` if `target` is not a subclass of the erasure of `super_type`. If the type
/// arguments of `super_type` cannot be traced back to type parameters of `target`, the raw
/// `target` is returned.
///
/// Example: `List<String>` searched for `ArrayList` yields `ArrayList<String>`.
pub fn exact_sub_type(
    env: &dyn TypeEnv,
    super_type: &Type,
    target: &RawClass,
) -> Result<Option<Type>> {
    let raw_super = erase(env, super_type)?;
    if !raw_super.is_assignable_from(env, target) {
        return Ok(None);
    }

    let class = match target {
        RawClass::Array(component) => {
            return match super_type {
                Type::Array(array) => {
                    Ok(exact_sub_type(env, &array.component, component)?.map(Type::array))
                }
                _ => Ok(Some(target.to_type())),
            };
        }
        RawClass::Class(class) => *class,
    };

    let generic = expand_class_generics(env, class)?;
    if !matches!(generic, Type::Parameterized(_)) {
        return Ok(Some(generic));
    }
    let Type::Parameterized(parameterized_super) = super_type else {
        return Ok(Some(target.to_type()));
    };
    let matched = match exact_super_type(env, &generic, &raw_super)? {
        Some(Type::Parameterized(matched)) => matched,
        Some(_) => return Ok(Some(target.to_type())),
        None => return Ok(None),
    };

    let mut vars = VarMap::new();
    for (declared, actual) in matched.args.iter().zip(&parameterized_super.args) {
        if let Type::TypeVar(var) = declared {
            if type_param_def(env, var.id)?.owner == Some(GenericDecl::Class(class)) {
                vars.add(var.id, actual.clone());
            }
        }
    }

    match vars.map(env, &generic, MappingMode::Exact) {
        Ok(ty) => Ok(Some(ty)),
        Err(ReflectError::UnresolvedVariable { variable, .. }) => {
            tracing::debug!(
                target: "mirror.reflect",
                super_type = %super_type.display(env),
                subclass = %target.to_type().display(env),
                %variable,
                "type arguments not traceable to the subclass, falling back to the raw type"
            );
            Ok(Some(target.to_type()))
        }
        Err(err) => Err(err),
    }
}

/// The value of class type parameter `var` in `ty`, looking through supertypes of `ty`.
///
/// `None` if `var` is declared by a method or constructor, or if the declaring class is not a
/// parameterized supertype of `ty`.
pub fn type_parameter(env: &dyn TypeEnv, ty: &Type, var: TypeVarId) -> Result<Option<Type>> {
    let def = type_param_def(env, var)?;
    let Some(GenericDecl::Class(class)) = def.owner else {
        return Ok(None);
    };
    let Some(Type::Parameterized(sup)) = exact_super_type(env, ty, &RawClass::Class(class))? else {
        return Ok(None);
    };
    let index = class_def(env, class)?
        .type_params
        .iter()
        .position(|tp| *tp == var);
    Ok(index
        .and_then(|index| sup.args.get(index))
        .map(|arg| update_annotations(arg.clone(), &def.annotations)))
}

impl TyContext<'_> {
    /// Whether `sup` is a supertype of `sub`, using wildcard containment for type arguments.
    ///
    /// `sub` is capture-converted first. A type variable on the super side accepts the same
    /// variable or anything bounded by it; a wildcard on the super side is not a type.
    ///
    /// Captures allocated while checking are dropped again before returning.
    pub fn is_super_type(&mut self, sup: &Type, sub: &Type) -> Result<bool> {
        let mark = self.capture_count();
        let result = self.super_type_check(sup, sub);
        self.truncate_captures(mark);
        result
    }

    fn super_type_check(&mut self, sup: &Type, sub: &Type) -> Result<bool> {
        match sup {
            Type::Class(_) | Type::Parameterized(_) | Type::Array(_) => {
                let super_class = erase(self, sup)?;
                let captured = self.capture(sub)?;
                let Some(mapped) = exact_super_type(self, &captured, &super_class)? else {
                    return Ok(false);
                };
                match (sup, &mapped) {
                    (Type::Class(_), _) | (_, Type::Class(_)) => Ok(true),
                    (Type::Array(sup_array), Type::Array(mapped_array)) => {
                        self.super_type_check(&sup_array.component, &mapped_array.component)
                    }
                    (Type::Parameterized(sup_p), Type::Parameterized(mapped_p)) => {
                        if sup_p.args.len() != mapped_p.args.len() {
                            return Err(ReflectError::invariant(format!(
                                "argument count mismatch between {} and {}",
                                sup.display(self),
                                mapped.display(self)
                            )));
                        }
                        for (containing, contained) in sup_p.args.iter().zip(&mapped_p.args) {
                            if !self.contains_check(containing, contained)? {
                                return Ok(false);
                            }
                        }
                        match (&sup_p.owner, &mapped_p.owner) {
                            (Some(sup_owner), Some(mapped_owner)) => {
                                self.super_type_check(sup_owner, mapped_owner)
                            }
                            _ => Ok(true),
                        }
                    }
                    _ => Err(ReflectError::invariant(format!(
                        "{} found as supertype for {}",
                        mapped.display(self),
                        sup.display(self)
                    ))),
                }
            }
            Type::Capture(capture) => {
                if let Type::Capture(other) = sub {
                    if other.id == capture.id {
                        return Ok(true);
                    }
                }
                let lower_bounds = capture_def(self, capture.id)?.lower_bounds().to_vec();
                for lower in &lower_bounds {
                    if self.super_type_check(lower, sub)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Type::TypeVar(var) => self.reaches_variable(var.id, sub, &mut HashSet::new()),
            Type::Wildcard(_) => Err(ReflectError::UnsupportedType(format!(
                "wildcard {} used as a type",
                sup.display(self)
            ))),
        }
    }

    fn reaches_variable(
        &mut self,
        var: TypeVarId,
        sub: &Type,
        visiting: &mut HashSet<Visiting>,
    ) -> Result<bool> {
        let (key, bounds) = match sub {
            Type::TypeVar(v) if v.id == var => return Ok(true),
            Type::TypeVar(v) => (
                Visiting::Var(v.id),
                type_param_def(self, v.id)?.upper_bounds.clone(),
            ),
            Type::Capture(c) => (
                Visiting::Capture(c.id),
                capture_def(self, c.id)?.upper_bounds().to_vec(),
            ),
            _ => return Ok(false),
        };
        if !visiting.insert(key) {
            return Ok(false);
        }
        for bound in &bounds {
            if self.reaches_variable(var, bound, visiting)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Type argument containment: a wildcard contains every type within its bounds, any other
    /// argument contains only itself.
    ///
    /// A wildcard with lower bounds requires each lower bound to be a supertype of `contained`.
    pub fn contains(&mut self, containing: &Type, contained: &Type) -> Result<bool> {
        let mark = self.capture_count();
        let result = self.contains_check(containing, contained);
        self.truncate_captures(mark);
        result
    }

    fn contains_check(&mut self, containing: &Type, contained: &Type) -> Result<bool> {
        let Type::Wildcard(wildcard) = containing else {
            return Ok(containing.same_type(contained));
        };
        for upper in &wildcard.upper_bounds {
            if !self.super_type_check(upper, contained)? {
                return Ok(false);
            }
        }
        for lower in &wildcard.lower_bounds {
            if !self.super_type_check(lower, contained)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Convenience for raw-class queries by id.
pub fn exact_super_class(env: &dyn TypeEnv, ty: &Type, target: ClassId) -> Result<Option<Type>> {
    exact_super_type(env, ty, &RawClass::Class(target))
}
