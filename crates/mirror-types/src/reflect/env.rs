use std::fmt;

use crate::{
    AnnotationSet, CaptureId, ClassDef, ClassId, ReflectError, Result, Type, TypeEnv,
    TypeParamDef, TypeVarId, TypeVariable, WellKnownTypes, WildcardType,
};

/// A capture variable: the wildcard it replaced, the type parameter it was captured against, and
/// its bounds once initialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureDef {
    wildcard: WildcardType,
    variable: TypeVariable,
    upper_bounds: Vec<Type>,
    lower_bounds: Vec<Type>,
    initialized: bool,
}

impl CaptureDef {
    pub fn wildcard(&self) -> &WildcardType {
        &self.wildcard
    }

    pub fn variable(&self) -> &TypeVariable {
        &self.variable
    }

    /// Empty until the capture is initialized.
    pub fn upper_bounds(&self) -> &[Type] {
        &self.upper_bounds
    }

    pub fn lower_bounds(&self) -> &[Type] {
        &self.lower_bounds
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Annotations a use of this capture carries: the wildcard's plus the variable's.
    pub fn annotations(&self) -> AnnotationSet {
        self.wildcard.annotations.union(&self.variable.annotations)
    }
}

/// Per-invocation resolution context.
///
/// Owns every capture allocated while resolving, so the shared [`crate::TypeStore`] is never
/// mutated. Capture ids are only meaningful for the context that allocated them.
pub struct TyContext<'env> {
    base: &'env dyn TypeEnv,
    captures: Vec<CaptureDef>,
}

impl fmt::Debug for TyContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TyContext")
            .field("captures", &self.captures)
            .finish_non_exhaustive()
    }
}

impl<'env> TyContext<'env> {
    pub fn new(base: &'env dyn TypeEnv) -> Self {
        Self {
            base,
            captures: Vec::new(),
        }
    }

    /// Drop all captures. Types produced before the reset must not be used afterwards.
    pub fn reset(&mut self) {
        self.captures.clear();
    }

    pub fn capture_count(&self) -> usize {
        self.captures.len()
    }

    /// Drop the captures allocated after the first `len`. Only valid when no surviving type
    /// refers to them.
    pub(crate) fn truncate_captures(&mut self, len: usize) {
        self.captures.truncate(len);
    }

    /// First phase of capture construction: an uninitialized shell that can already be
    /// referenced from other types.
    pub(crate) fn alloc_capture(
        &mut self,
        wildcard: WildcardType,
        variable: TypeVariable,
    ) -> Result<CaptureId> {
        let raw: u32 = self
            .captures
            .len()
            .try_into()
            .map_err(|_| ReflectError::invariant("too many capture variables in one context"))?;
        let id = CaptureId::from_raw(raw);
        self.captures.push(CaptureDef {
            wildcard,
            variable,
            upper_bounds: Vec::new(),
            lower_bounds: Vec::new(),
            initialized: false,
        });
        Ok(id)
    }

    /// Second phase: fill in the bounds. Allowed exactly once per capture.
    pub(crate) fn complete_capture(
        &mut self,
        id: CaptureId,
        upper_bounds: Vec<Type>,
        lower_bounds: Vec<Type>,
    ) -> Result<()> {
        let def = self
            .captures
            .get_mut(id.index())
            .ok_or_else(|| ReflectError::invariant(format!("unknown capture #{}", id.to_raw())))?;
        if def.initialized {
            return Err(ReflectError::invariant(format!(
                "capture #{} initialized twice",
                id.to_raw()
            )));
        }
        def.upper_bounds = upper_bounds;
        def.lower_bounds = lower_bounds;
        def.initialized = true;
        Ok(())
    }
}

impl TypeEnv for TyContext<'_> {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.base.class(id)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.base.type_param(id)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.base.lookup_class(name)
    }

    fn well_known(&self) -> &WellKnownTypes {
        self.base.well_known()
    }

    fn capture_var(&self, id: CaptureId) -> Option<&CaptureDef> {
        self.captures.get(id.index())
    }
}
