//! Structural identity for type graphs.
//!
//! Two captures with the same wildcard, variable, and bounds are the same type for the purpose
//! of keys and equality, even though they were allocated separately. [`CanonicalType`] drops
//! capture ids and unrolls captures into their structure; a capture appearing inside its own
//! bounds becomes a [`CanonicalType::Recursive`] back reference.
//!
//! The walk does not go through [`TypeVisitor`](super::TypeVisitor): its output is an id-free
//! [`CanonicalType`], not a [`Type`].

use super::{capture_def, TyContext};
use crate::{
    AnnotationSet, ArrayType, CaptureId, CaptureType, ClassId, ClassRef, ParameterizedType,
    ReflectError, Result, Type, TypeEnv, TypeVarId, TypeVariable, WildcardType,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalType {
    Class {
        class: ClassId,
        annotations: AnnotationSet,
    },
    Parameterized {
        raw: ClassId,
        args: Vec<CanonicalType>,
        owner: Option<Box<CanonicalType>>,
        annotations: AnnotationSet,
    },
    Wildcard {
        upper_bounds: Vec<CanonicalType>,
        lower_bounds: Vec<CanonicalType>,
        annotations: AnnotationSet,
    },
    TypeVar {
        var: TypeVarId,
        annotations: AnnotationSet,
    },
    Array {
        component: Box<CanonicalType>,
        annotations: AnnotationSet,
    },
    Capture {
        wildcard: Box<CanonicalType>,
        variable: TypeVarId,
        variable_annotations: AnnotationSet,
        upper_bounds: Vec<CanonicalType>,
        lower_bounds: Vec<CanonicalType>,
        annotations: AnnotationSet,
    },
    /// The capture `depth` levels out from the innermost capture being unrolled (0 is the
    /// innermost).
    Recursive {
        depth: u32,
        annotations: AnnotationSet,
    },
}

/// The canonical form of `ty`.
pub fn to_canonical(env: &dyn TypeEnv, ty: &Type) -> Result<CanonicalType> {
    Canonicalizer::new(env, false).canonical(ty)
}

/// The canonical form of `ty` with primitive classes replaced by their box classes, so `int`
/// and `Integer` get the same key. Primitive array components are kept (`int[]` is not
/// `Integer[]`).
pub fn to_canonical_boxed(env: &dyn TypeEnv, ty: &Type) -> Result<CanonicalType> {
    Canonicalizer::new(env, true).canonical(ty)
}

/// Structural equality of two types, captures included.
pub fn canonical_eq(env: &dyn TypeEnv, left: &Type, right: &Type) -> Result<bool> {
    Ok(to_canonical(env, left)? == to_canonical(env, right)?)
}

struct Canonicalizer<'a> {
    env: &'a dyn TypeEnv,
    boxed: bool,
    /// Captures currently being unrolled, innermost last.
    unrolling: Vec<CaptureId>,
}

impl<'a> Canonicalizer<'a> {
    fn new(env: &'a dyn TypeEnv, boxed: bool) -> Self {
        Self {
            env,
            boxed,
            unrolling: Vec::new(),
        }
    }

    fn canonical_all(&mut self, types: &[Type]) -> Result<Vec<CanonicalType>> {
        types.iter().map(|ty| self.canonical(ty)).collect()
    }

    fn class(&self, class: &ClassRef, boxed: bool) -> CanonicalType {
        let id = if boxed {
            self.env
                .well_known()
                .box_class(class.def)
                .unwrap_or(class.def)
        } else {
            class.def
        };
        CanonicalType::Class {
            class: id,
            annotations: class.annotations.clone(),
        }
    }

    fn canonical(&mut self, ty: &Type) -> Result<CanonicalType> {
        Ok(match ty {
            Type::Class(class) => self.class(class, self.boxed),
            Type::Parameterized(p) => CanonicalType::Parameterized {
                raw: p.raw,
                args: self.canonical_all(&p.args)?,
                owner: match &p.owner {
                    Some(owner) => Some(Box::new(self.canonical(owner)?)),
                    None => None,
                },
                annotations: p.annotations.clone(),
            },
            Type::Wildcard(w) => CanonicalType::Wildcard {
                upper_bounds: self.canonical_all(&w.upper_bounds)?,
                lower_bounds: self.canonical_all(&w.lower_bounds)?,
                annotations: w.annotations.clone(),
            },
            Type::TypeVar(v) => CanonicalType::TypeVar {
                var: v.id,
                annotations: v.annotations.clone(),
            },
            Type::Array(a) => {
                let component = match a.component.as_ref() {
                    Type::Class(class) => self.class(class, false),
                    other => self.canonical(other)?,
                };
                CanonicalType::Array {
                    component: Box::new(component),
                    annotations: a.annotations.clone(),
                }
            }
            Type::Capture(c) => self.capture(c)?,
        })
    }

    fn capture(&mut self, capture: &CaptureType) -> Result<CanonicalType> {
        if let Some(pos) = self.unrolling.iter().rposition(|id| *id == capture.id) {
            return Ok(CanonicalType::Recursive {
                depth: (self.unrolling.len() - 1 - pos) as u32,
                annotations: capture.annotations.clone(),
            });
        }

        let env = self.env;
        let def = capture_def(env, capture.id)?;
        if !def.is_initialized() {
            return Err(ReflectError::invariant(format!(
                "capture #{} used before its bounds were set",
                capture.id.to_raw()
            )));
        }
        let wildcard = self.canonical(&Type::Wildcard(def.wildcard().clone()))?;

        self.unrolling.push(capture.id);
        let upper_bounds = self.canonical_all(def.upper_bounds())?;
        let lower_bounds = self.canonical_all(def.lower_bounds())?;
        self.unrolling.pop();

        Ok(CanonicalType::Capture {
            wildcard: Box::new(wildcard),
            variable: def.variable().id,
            variable_annotations: def.variable().annotations.clone(),
            upper_bounds,
            lower_bounds,
            annotations: capture.annotations.clone(),
        })
    }
}

impl CanonicalType {
    pub fn annotations(&self) -> &AnnotationSet {
        match self {
            CanonicalType::Class { annotations, .. }
            | CanonicalType::Parameterized { annotations, .. }
            | CanonicalType::Wildcard { annotations, .. }
            | CanonicalType::TypeVar { annotations, .. }
            | CanonicalType::Array { annotations, .. }
            | CanonicalType::Capture { annotations, .. }
            | CanonicalType::Recursive { annotations, .. } => annotations,
        }
    }

    /// Build a type node with this structure. Captures are allocated fresh in `cx`.
    pub fn to_type(&self, cx: &mut TyContext<'_>) -> Result<Type> {
        self.materialize(cx, &mut Vec::new())
    }

    fn materialize_all(
        types: &[CanonicalType],
        cx: &mut TyContext<'_>,
        stack: &mut Vec<CaptureId>,
    ) -> Result<Vec<Type>> {
        types.iter().map(|ty| ty.materialize(cx, stack)).collect()
    }

    fn materialize(&self, cx: &mut TyContext<'_>, stack: &mut Vec<CaptureId>) -> Result<Type> {
        Ok(match self {
            CanonicalType::Class { class, annotations } => Type::Class(ClassRef {
                def: *class,
                annotations: annotations.clone(),
            }),
            CanonicalType::Parameterized {
                raw,
                args,
                owner,
                annotations,
            } => Type::Parameterized(ParameterizedType {
                raw: *raw,
                args: Self::materialize_all(args, cx, stack)?,
                owner: match owner {
                    Some(owner) => Some(Box::new(owner.materialize(cx, stack)?)),
                    None => None,
                },
                annotations: annotations.clone(),
            }),
            CanonicalType::Wildcard {
                upper_bounds,
                lower_bounds,
                annotations,
            } => Type::Wildcard(WildcardType {
                upper_bounds: Self::materialize_all(upper_bounds, cx, stack)?,
                lower_bounds: Self::materialize_all(lower_bounds, cx, stack)?,
                annotations: annotations.clone(),
            }),
            CanonicalType::TypeVar { var, annotations } => Type::TypeVar(TypeVariable {
                id: *var,
                annotations: annotations.clone(),
            }),
            CanonicalType::Array {
                component,
                annotations,
            } => Type::Array(ArrayType {
                component: Box::new(component.materialize(cx, stack)?),
                annotations: annotations.clone(),
            }),
            CanonicalType::Capture {
                wildcard,
                variable,
                variable_annotations,
                upper_bounds,
                lower_bounds,
                annotations,
            } => {
                let Type::Wildcard(wildcard) = wildcard.materialize(cx, stack)? else {
                    return Err(ReflectError::invariant("capture of a non-wildcard"));
                };
                let variable = TypeVariable {
                    id: *variable,
                    annotations: variable_annotations.clone(),
                };
                let id = cx.alloc_capture(wildcard, variable)?;
                stack.push(id);
                let upper = Self::materialize_all(upper_bounds, cx, stack)?;
                let lower = Self::materialize_all(lower_bounds, cx, stack)?;
                stack.pop();
                cx.complete_capture(id, upper, lower)?;
                Type::Capture(CaptureType {
                    id,
                    annotations: annotations.clone(),
                })
            }
            CanonicalType::Recursive { depth, annotations } => {
                let id = (*depth as usize)
                    .checked_add(1)
                    .and_then(|n| stack.len().checked_sub(n))
                    .map(|idx| stack[idx])
                    .ok_or_else(|| {
                        ReflectError::invariant(format!("dangling capture reference {depth}"))
                    })?;
                Type::Capture(CaptureType {
                    id,
                    annotations: annotations.clone(),
                })
            }
        })
    }
}
