//! Java-like rendering of type nodes, used in error messages and logs.
//!
//! The output is stable but not meant to be parsed back.

use std::fmt;

use crate::{AnnotationSet, ClassId, Type, TypeEnv};

pub struct TypeDisplay<'a> {
    env: &'a dyn TypeEnv,
    ty: &'a Type,
}

impl Type {
    pub fn display<'a>(&'a self, env: &'a dyn TypeEnv) -> TypeDisplay<'a> {
        TypeDisplay { env, ty: self }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self.env, self.ty)
    }
}

/// `java.util.List<? extends java.lang.Number>`, `T[]`, `capture#0 of ?`, ...
pub fn type_name(env: &dyn TypeEnv, ty: &Type) -> String {
    ty.display(env).to_string()
}

pub fn class_name(env: &dyn TypeEnv, id: ClassId) -> String {
    match env.class(id) {
        Some(def) => def.name.clone(),
        None => format!("<unknown class #{}>", id.to_raw()),
    }
}

fn write_annotations(f: &mut fmt::Formatter<'_>, annotations: &AnnotationSet) -> fmt::Result {
    if annotations.is_empty() {
        return Ok(());
    }
    write!(f, "{annotations} ")
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    env: &dyn TypeEnv,
    types: &[Type],
    sep: &str,
) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write_type(f, env, ty)?;
    }
    Ok(())
}

fn write_type(f: &mut fmt::Formatter<'_>, env: &dyn TypeEnv, ty: &Type) -> fmt::Result {
    match ty {
        Type::Class(class) => {
            write_annotations(f, &class.annotations)?;
            f.write_str(&class_name(env, class.def))
        }
        Type::Parameterized(p) => {
            match &p.owner {
                Some(owner) => {
                    write_type(f, env, owner)?;
                    f.write_str(".")?;
                    write_annotations(f, &p.annotations)?;
                    match env.class(p.raw) {
                        Some(def) => f.write_str(def.simple_name())?,
                        None => f.write_str(&class_name(env, p.raw))?,
                    }
                }
                None => {
                    write_annotations(f, &p.annotations)?;
                    f.write_str(&class_name(env, p.raw))?;
                }
            }
            if !p.args.is_empty() {
                f.write_str("<")?;
                write_list(f, env, &p.args, ", ")?;
                f.write_str(">")?;
            }
            Ok(())
        }
        Type::Wildcard(w) => {
            write_annotations(f, &w.annotations)?;
            f.write_str("?")?;
            if !w.lower_bounds.is_empty() {
                f.write_str(" super ")?;
                write_list(f, env, &w.lower_bounds, " & ")
            } else if w.upper_bounds.iter().any(|b| !b.is_object()) {
                f.write_str(" extends ")?;
                write_list(f, env, &w.upper_bounds, " & ")
            } else {
                Ok(())
            }
        }
        Type::TypeVar(v) => {
            write_annotations(f, &v.annotations)?;
            match env.type_param(v.id) {
                Some(def) => f.write_str(&def.name),
                None => write!(f, "<unknown type variable #{}>", v.id.to_raw()),
            }
        }
        Type::Array(a) => {
            write_type(f, env, &a.component)?;
            if !a.annotations.is_empty() {
                write!(f, " {}", a.annotations)?;
            }
            f.write_str("[]")
        }
        Type::Capture(c) => {
            write_annotations(f, &c.annotations)?;
            write!(f, "capture#{} of ", c.id.to_raw())?;
            match env.capture_var(c.id) {
                Some(def) => write_type(f, env, &Type::Wildcard(def.wildcard().clone())),
                None => f.write_str("?"),
            }
        }
    }
}
