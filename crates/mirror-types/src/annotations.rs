use std::fmt;

use serde::{Deserialize, Serialize};

/// A constant value attached to an annotation element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(String),
    /// A class literal, stored as the binary name of the class (`java.lang.String`).
    Class(String),
    Enum {
        type_name: String,
        constant: String,
    },
    Array(Vec<AnnotationValue>),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(value) => write!(f, "{value}"),
            AnnotationValue::Int(value) => write!(f, "{value}"),
            AnnotationValue::Str(value) => write!(f, "{value:?}"),
            AnnotationValue::Class(name) => write!(f, "{name}.class"),
            AnnotationValue::Enum {
                type_name,
                constant,
            } => write!(f, "{type_name}.{constant}"),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A type-use annotation.
///
/// Elements are kept sorted by name so two annotations that list the same
/// elements in a different order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    type_name: String,
    elements: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    pub fn new(
        type_name: impl Into<String>,
        elements: impl IntoIterator<Item = (String, AnnotationValue)>,
    ) -> Self {
        let mut elements: Vec<_> = elements.into_iter().collect();
        elements.sort_by(|a, b| a.0.cmp(&b.0));
        elements.dedup_by(|a, b| a.0 == b.0);
        Self {
            type_name: type_name.into(),
            elements,
        }
    }

    /// An annotation without elements (`@NonNull`).
    pub fn marker(type_name: impl Into<String>) -> Self {
        Self::new(type_name, [])
    }

    pub fn with_element(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        let name = name.into();
        match self.elements.binary_search_by(|(n, _)| n.as_str().cmp(&name)) {
            Ok(idx) => self.elements[idx].1 = value,
            Err(idx) => self.elements.insert(idx, (name, value)),
        }
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn elements(&self) -> &[(String, AnnotationValue)] {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&AnnotationValue> {
        self.elements
            .binary_search_by(|(n, _)| n.as_str().cmp(name))
            .ok()
            .map(|idx| &self.elements[idx].1)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.type_name)?;
        if self.elements.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (idx, (name, value)) in self.elements.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// An order-insensitive, duplicate-free set of annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnnotationSet(Vec<Annotation>);

impl AnnotationSet {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.0.iter()
    }

    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.0.binary_search(annotation).is_ok()
    }

    /// First annotation of the given type, if any.
    pub fn get(&self, type_name: &str) -> Option<&Annotation> {
        self.0.iter().find(|a| a.type_name == type_name)
    }

    /// Returns `false` if the annotation was already present.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        match self.0.binary_search(&annotation) {
            Ok(_) => false,
            Err(idx) => {
                self.0.insert(idx, annotation);
                true
            }
        }
    }

    pub fn union(&self, other: &AnnotationSet) -> AnnotationSet {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut out = self.clone();
        for annotation in other.iter() {
            out.insert(annotation.clone());
        }
        out
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        let mut items: Vec<Annotation> = iter.into_iter().collect();
        items.sort();
        items.dedup();
        Self(items)
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for AnnotationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, annotation) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{annotation}")?;
        }
        Ok(())
    }
}
