use std::collections::{HashSet, VecDeque};

use super::type_param_def;
use crate::{ClassDef, ClassId, ReflectError, Result, Type, TypeEnv, TypeVarId};

/// An erased type: a class, or an array of erased components.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawClass {
    Class(ClassId),
    Array(Box<RawClass>),
}

impl RawClass {
    pub fn array_of(component: RawClass) -> RawClass {
        RawClass::Array(Box::new(component))
    }

    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            RawClass::Class(id) => Some(*id),
            RawClass::Array(_) => None,
        }
    }

    pub fn component(&self) -> Option<&RawClass> {
        match self {
            RawClass::Class(_) => None,
            RawClass::Array(component) => Some(component),
        }
    }

    pub fn is_primitive(&self, env: &dyn TypeEnv) -> bool {
        self.as_class()
            .and_then(|id| env.class(id))
            .is_some_and(|def| def.primitive_type().is_some())
    }

    /// The raw class as an unannotated type node.
    pub fn to_type(&self) -> Type {
        match self {
            RawClass::Class(id) => Type::class(*id),
            RawClass::Array(component) => Type::array(component.to_type()),
        }
    }

    /// Whether a value of raw type `other` can be assigned to this raw type, ignoring generics.
    ///
    /// Arrays are covariant in their reference component; primitive arrays are only assignable
    /// to themselves and to the three array supertypes.
    pub fn is_assignable_from(&self, env: &dyn TypeEnv, other: &RawClass) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (RawClass::Class(target), RawClass::Class(source)) => {
                !self.is_primitive(env)
                    && !other.is_primitive(env)
                    && is_subclass(env, *source, *target)
            }
            (RawClass::Class(target), RawClass::Array(_)) => {
                env.well_known().array_supertypes().contains(target)
            }
            (RawClass::Array(target), RawClass::Array(source)) => {
                !target.is_primitive(env)
                    && !source.is_primitive(env)
                    && target.is_assignable_from(env, source)
            }
            (RawClass::Array(_), RawClass::Class(_)) => false,
        }
    }
}

impl From<ClassId> for RawClass {
    fn from(value: ClassId) -> Self {
        RawClass::Class(value)
    }
}

/// Erasure of a type.
///
/// A type variable erases to its first bound, a wildcard to its lower bound if it has one and
/// its first upper bound otherwise. Captures have no erasure of their own.
pub fn erase(env: &dyn TypeEnv, ty: &Type) -> Result<RawClass> {
    erase_in(env, ty, &mut HashSet::new())
}

fn erase_in(env: &dyn TypeEnv, ty: &Type, visiting: &mut HashSet<TypeVarId>) -> Result<RawClass> {
    match ty {
        Type::Class(class) => Ok(RawClass::Class(class.def)),
        Type::Parameterized(p) => Ok(RawClass::Class(p.raw)),
        Type::TypeVar(var) => {
            if !visiting.insert(var.id) {
                return Err(ReflectError::invariant(format!(
                    "cyclic bounds on type variable {}",
                    ty.display(env)
                )));
            }
            let erased = match type_param_def(env, var.id)?.upper_bounds.first() {
                Some(bound) => erase_in(env, bound, visiting),
                None => Ok(RawClass::Class(ClassId::OBJECT)),
            };
            visiting.remove(&var.id);
            erased
        }
        Type::Array(array) => Ok(RawClass::array_of(erase_in(env, &array.component, visiting)?)),
        Type::Wildcard(w) => match w.lower_bounds.first().or(w.upper_bounds.first()) {
            Some(bound) => erase_in(env, bound, visiting),
            None => Ok(RawClass::Class(ClassId::OBJECT)),
        },
        Type::Capture(_) => Err(ReflectError::UnsupportedType(format!(
            "cannot erase {}",
            ty.display(env)
        ))),
    }
}

/// The classes named by the direct supertypes of `def`. Classes without an explicit superclass
/// and interfaces without superinterfaces extend `Object`.
pub(crate) fn direct_raw_supertypes(env: &dyn TypeEnv, id: ClassId, def: &ClassDef) -> Vec<ClassId> {
    fn class_of(ty: &Type) -> Option<ClassId> {
        match ty {
            Type::Class(c) => Some(c.def),
            Type::Parameterized(p) => Some(p.raw),
            _ => None,
        }
    }

    let mut out = Vec::new();
    if id == env.well_known().object || def.primitive_type().is_some() {
        return out;
    }
    if def.is_interface() {
        if def.interfaces.is_empty() {
            out.push(ClassId::OBJECT);
        }
    } else {
        out.push(def.super_class.as_ref().and_then(class_of).unwrap_or(ClassId::OBJECT));
    }
    out.extend(def.interfaces.iter().filter_map(class_of));
    out
}

fn is_subclass(env: &dyn TypeEnv, sub: ClassId, sup: ClassId) -> bool {
    let mut queue = VecDeque::from([sub]);
    let mut seen = HashSet::new();
    while let Some(current) = queue.pop_front() {
        if current == sup {
            return true;
        }
        if !seen.insert(current) {
            continue;
        }
        if let Some(def) = env.class(current) {
            queue.extend(direct_raw_supertypes(env, current, def));
        }
    }
    false
}
