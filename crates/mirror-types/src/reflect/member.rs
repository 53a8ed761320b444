use super::erase::RawClass;
use super::supertypes::exact_super_type;
use super::var_map::{MappingMode, VarMap};
use super::TyContext;
use crate::{ClassId, ConstructorId, FieldId, MethodId, ReflectError, Result, Type, TypeEnv};

/// A field, method, or constructor of a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Member {
    Field(FieldId),
    Method(MethodId),
    Constructor(ConstructorId),
}

impl Member {
    pub fn declaring_class(self) -> ClassId {
        match self {
            Member::Field(id) => id.class,
            Member::Method(id) => id.class,
            Member::Constructor(id) => id.class,
        }
    }

    /// `field java.util.Map.size`-style description for messages.
    pub fn describe(self, env: &dyn TypeEnv) -> String {
        let class = crate::class_name(env, self.declaring_class());
        match self {
            Member::Field(id) => match env.field(id) {
                Some(def) => format!("field {class}.{}", def.name),
                None => format!("field #{} of {class}", id.index),
            },
            Member::Method(id) => match env.method(id) {
                Some(def) => format!("method {class}.{}", def.name),
                None => format!("method #{} of {class}", id.index),
            },
            Member::Constructor(id) => format!("constructor #{} of {class}", id.index),
        }
    }

    fn declared_params(self, env: &dyn TypeEnv) -> Result<Vec<Type>> {
        let params = match self {
            Member::Method(id) => env.method(id).map(|m| m.params.clone()),
            Member::Constructor(id) => env.constructor(id).map(|c| c.params.clone()),
            Member::Field(_) => None,
        };
        params.ok_or_else(|| unknown(env, self))
    }
}

impl From<FieldId> for Member {
    fn from(value: FieldId) -> Self {
        Member::Field(value)
    }
}

impl From<MethodId> for Member {
    fn from(value: MethodId) -> Self {
        Member::Method(value)
    }
}

impl From<ConstructorId> for Member {
    fn from(value: ConstructorId) -> Self {
        Member::Constructor(value)
    }
}

fn unknown(env: &dyn TypeEnv, member: Member) -> ReflectError {
    ReflectError::invariant(format!("unknown {}", member.describe(env)))
}

impl TyContext<'_> {
    /// Type of `field` as seen from `declaring`; unbound variables are an error.
    pub fn exact_field_type(&mut self, field: FieldId, declaring: &Type) -> Result<Type> {
        self.field_type_in(field, declaring, MappingMode::Exact)
    }

    /// Like [`TyContext::exact_field_type`], but unbound variables are left in place.
    pub fn field_type(&mut self, field: FieldId, declaring: &Type) -> Result<Type> {
        self.field_type_in(field, declaring, MappingMode::AllowIncomplete)
    }

    pub fn exact_return_type(&mut self, method: MethodId, declaring: &Type) -> Result<Type> {
        self.return_type_in(method, declaring, MappingMode::Exact)
    }

    pub fn return_type(&mut self, method: MethodId, declaring: &Type) -> Result<Type> {
        self.return_type_in(method, declaring, MappingMode::AllowIncomplete)
    }

    /// Parameter types of a method or constructor as seen from `declaring`.
    pub fn exact_parameter_types(
        &mut self,
        executable: impl Into<Member>,
        declaring: &Type,
    ) -> Result<Vec<Type>> {
        self.parameter_types_in(executable.into(), declaring, MappingMode::Exact)
    }

    pub fn parameter_types(
        &mut self,
        executable: impl Into<Member>,
        declaring: &Type,
    ) -> Result<Vec<Type>> {
        self.parameter_types_in(executable.into(), declaring, MappingMode::AllowIncomplete)
    }

    fn field_type_in(&mut self, field: FieldId, declaring: &Type, mode: MappingMode) -> Result<Type> {
        let member = Member::Field(field);
        let declared = match self.field(field) {
            Some(def) => def.ty.clone(),
            None => return Err(unknown(self, member)),
        };
        let vars = self.member_var_map(member, declaring)?;
        vars.map(self, &declared, mode)
    }

    fn return_type_in(
        &mut self,
        method: MethodId,
        declaring: &Type,
        mode: MappingMode,
    ) -> Result<Type> {
        let member = Member::Method(method);
        let declared = match self.method(method) {
            Some(def) => def.return_type.clone(),
            None => return Err(unknown(self, member)),
        };
        let vars = self.member_var_map(member, declaring)?;
        vars.map(self, &declared, mode)
    }

    fn parameter_types_in(
        &mut self,
        member: Member,
        declaring: &Type,
        mode: MappingMode,
    ) -> Result<Vec<Type>> {
        let declared = member.declared_params(self)?;
        let vars = self.member_var_map(member, declaring)?;
        vars.map_all(self, &declared, mode)
    }

    /// Bindings for the class type variables visible to `member` when accessed through
    /// `declaring`.
    fn member_var_map(&mut self, member: Member, declaring: &Type) -> Result<VarMap> {
        let captured = self.capture(declaring)?;
        let class = RawClass::Class(member.declaring_class());
        match exact_super_type(self, &captured, &class)? {
            Some(exact_declaring) => VarMap::for_declaring_type(self, &exact_declaring),
            None => {
                let member = member.describe(self);
                let context = declaring.display(self).to_string();
                tracing::debug!(
                    target: "mirror.reflect",
                    %member,
                    %context,
                    "member not reachable from context"
                );
                Err(ReflectError::NotAMember { member, context })
            }
        }
    }
}
