use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reflect::CaptureDef;
use crate::{
    AnnotationSet, CaptureId, ClassId, ConstructorId, FieldId, GenericDecl, MethodId,
    ReflectError, Result, Type, TypeVarId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Double,
        PrimitiveType::Float,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Short,
        PrimitiveType::Void,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Double => "double",
            PrimitiveType::Float => "float",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Short => "short",
            PrimitiveType::Void => "void",
        }
    }

    pub fn boxed_name(self) -> &'static str {
        BOX_TYPES[self as usize].1
    }
}

/// Primitive types and the binary names of their box classes.
pub const BOX_TYPES: [(PrimitiveType, &str); 9] = [
    (PrimitiveType::Boolean, "java.lang.Boolean"),
    (PrimitiveType::Byte, "java.lang.Byte"),
    (PrimitiveType::Char, "java.lang.Character"),
    (PrimitiveType::Double, "java.lang.Double"),
    (PrimitiveType::Float, "java.lang.Float"),
    (PrimitiveType::Int, "java.lang.Integer"),
    (PrimitiveType::Long, "java.lang.Long"),
    (PrimitiveType::Short, "java.lang.Short"),
    (PrimitiveType::Void, "java.lang.Void"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive(PrimitiveType),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            params,
            return_type,
            is_static: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstructorDef {
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    /// `None` means `java.lang.Object` (or nothing, for `Object` itself).
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub enclosing: Option<ClassId>,
    pub is_static: bool,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub constructors: Vec<ConstructorDef>,
}

impl ClassDef {
    fn with_kind(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
            is_static: false,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, ClassKind::Interface)
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::with_kind(primitive.name(), ClassKind::Primitive(primitive))
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self.kind {
            ClassKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Simple (unqualified) name used for display.
    pub fn simple_name(&self) -> &str {
        let tail = self.name.rsplit('.').next().unwrap_or(&self.name);
        tail.rsplit('$').next().unwrap_or(tail)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamDef {
    pub name: String,
    /// Filled in when the declaring class is defined.
    pub owner: Option<GenericDecl>,
    /// Never empty once stored; an unbounded variable gets `[Object]`.
    pub upper_bounds: Vec<Type>,
    pub annotations: AnnotationSet,
}

impl TypeParamDef {
    pub fn new(name: impl Into<String>, upper_bounds: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            owner: None,
            upper_bounds,
            annotations: AnnotationSet::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub comparable: ClassId,
    pub char_sequence: ClassId,
    primitives: [ClassId; 9],
    boxes: [ClassId; 9],
}

impl WellKnownTypes {
    fn placeholder() -> Self {
        Self {
            object: ClassId::OBJECT,
            cloneable: ClassId::OBJECT,
            serializable: ClassId::OBJECT,
            string: ClassId::OBJECT,
            number: ClassId::OBJECT,
            comparable: ClassId::OBJECT,
            char_sequence: ClassId::OBJECT,
            primitives: [ClassId::OBJECT; 9],
            boxes: [ClassId::OBJECT; 9],
        }
    }

    pub fn primitive(&self, primitive: PrimitiveType) -> ClassId {
        self.primitives[primitive as usize]
    }

    pub fn boxed(&self, primitive: PrimitiveType) -> ClassId {
        self.boxes[primitive as usize]
    }

    /// The box class of a primitive class; `None` for anything else.
    pub fn box_class(&self, id: ClassId) -> Option<ClassId> {
        self.primitives
            .iter()
            .position(|p| *p == id)
            .map(|idx| self.boxes[idx])
    }

    /// The three classes every array type is a subtype of.
    pub fn array_supertypes(&self) -> [ClassId; 3] {
        [self.object, self.cloneable, self.serializable]
    }
}

/// Read access to class and type parameter declarations.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;

    /// Captures only exist inside a resolution context.
    fn capture_var(&self, _id: CaptureId) -> Option<&CaptureDef> {
        None
    }

    fn field(&self, id: FieldId) -> Option<&FieldDef> {
        self.class(id.class)?.fields.get(id.index as usize)
    }

    fn method(&self, id: MethodId) -> Option<&MethodDef> {
        self.class(id.class)?.methods.get(id.index as usize)
    }

    fn constructor(&self, id: ConstructorId) -> Option<&ConstructorDef> {
        self.class(id.class)?.constructors.get(id.index as usize)
    }
}

/// An in-memory universe of class declarations.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    class_by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// Returns the id for `name`, allocating a placeholder class if it is not known yet.
    ///
    /// Together with [`TypeStore::define_class`] this allows declaring classes whose type
    /// parameter bounds mention the class itself (`E extends Enum<E>`).
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }
        let raw: u32 = self.classes.len().try_into().expect("too many classes");
        let id = ClassId::from_raw(raw);
        self.classes.push(ClassDef::class(name));
        self.class_by_name.insert(name.to_owned(), id);
        id
    }

    /// Replace the definition behind `id`. Type parameters of the class, its methods, and its
    /// constructors get their owner set to the matching declaration.
    ///
    /// `id` must come from [`TypeStore::intern_class_id`]; any other id is an
    /// [`ReflectError::InvariantViolation`].
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) -> Result<()> {
        if id.index() >= self.classes.len() {
            return Err(ReflectError::invariant(format!(
                "cannot define {} under unknown class id #{}",
                def.name,
                id.to_raw()
            )));
        }
        self.install_class(id, def);
        Ok(())
    }

    /// `id` is known to be allocated.
    fn install_class(&mut self, id: ClassId, def: ClassDef) {
        let mut owned: Vec<(TypeVarId, GenericDecl)> = def
            .type_params
            .iter()
            .map(|tp| (*tp, GenericDecl::Class(id)))
            .collect();
        for (index, method) in def.methods.iter().enumerate() {
            let decl = GenericDecl::Method(MethodId {
                class: id,
                index: index as u32,
            });
            owned.extend(method.type_params.iter().map(|tp| (*tp, decl)));
        }
        for (index, ctor) in def.constructors.iter().enumerate() {
            let decl = GenericDecl::Constructor(ConstructorId {
                class: id,
                index: index as u32,
            });
            owned.extend(ctor.type_params.iter().map(|tp| (*tp, decl)));
        }
        for (tp, decl) in owned {
            if let Some(param) = self.type_params.get_mut(tp.index()) {
                param.owner = Some(decl);
            }
        }

        let previous = &self.classes[id.index()].name;
        if *previous != def.name {
            let previous = previous.clone();
            self.class_by_name.remove(&previous);
            self.class_by_name.insert(def.name.clone(), id);
        }
        self.classes[id.index()] = def;
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.install_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let raw: u32 = self.type_params.len().try_into().expect("too many type parameters");
        let id = TypeVarId::from_raw(raw);
        self.type_params
            .push(normalize_bounds(TypeParamDef::new(name, upper_bounds)));
        id
    }

    /// Replace a type parameter definition; the owner recorded by `define_class` is kept when
    /// `def.owner` is `None`.
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) -> Result<()> {
        let slot = self.type_param_slot(id)?;
        let owner = def.owner.or(slot.owner);
        *slot = normalize_bounds(TypeParamDef { owner, ..def });
        Ok(())
    }

    /// Replace the bounds of an allocated type parameter, e.g. to close a self-referential
    /// bound after the parameter id is known.
    pub fn set_type_param_bounds(
        &mut self,
        id: TypeVarId,
        upper_bounds: Vec<Type>,
    ) -> Result<()> {
        let slot = self.type_param_slot(id)?;
        slot.upper_bounds = upper_bounds;
        if slot.upper_bounds.is_empty() {
            slot.upper_bounds.push(Type::object());
        }
        Ok(())
    }

    pub fn set_type_param_annotations(
        &mut self,
        id: TypeVarId,
        annotations: AnnotationSet,
    ) -> Result<()> {
        self.type_param_slot(id)?.annotations = annotations;
        Ok(())
    }

    fn type_param_slot(&mut self, id: TypeVarId) -> Result<&mut TypeParamDef> {
        self.type_params.get_mut(id.index()).ok_or_else(|| {
            ReflectError::invariant(format!("unknown type parameter id #{}", id.to_raw()))
        })
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    pub fn find_field(&self, class: ClassId, name: &str) -> Option<FieldId> {
        let def = self.class(class)?;
        let index = def.fields.iter().position(|f| f.name == name)?;
        Some(FieldId {
            class,
            index: index as u32,
        })
    }

    /// First method named `name`, in declaration order.
    pub fn find_method(&self, class: ClassId, name: &str) -> Option<MethodId> {
        let def = self.class(class)?;
        let index = def.methods.iter().position(|m| m.name == name)?;
        Some(MethodId {
            class,
            index: index as u32,
        })
    }

    pub fn constructors(&self, class: ClassId) -> impl Iterator<Item = ConstructorId> + '_ {
        let count = self.class(class).map_or(0, |def| def.constructors.len());
        (0..count).map(move |index| ConstructorId {
            class,
            index: index as u32,
        })
    }

    /// A store with the `java.lang` core plus a handful of generic collection types.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::default();
        let wk = store.well_known.clone();
        let int = Type::class(wk.primitive(PrimitiveType::Int));
        let boolean = Type::class(wk.primitive(PrimitiveType::Boolean));

        let iterable = store.intern_class_id("java.lang.Iterable");
        let iterable_t = store.add_type_param("T", vec![]);
        store.install_class(
            iterable,
            ClassDef {
                type_params: vec![iterable_t],
                ..ClassDef::interface("java.lang.Iterable")
            },
        );

        let collection = store.intern_class_id("java.util.Collection");
        let collection_e = store.add_type_param("E", vec![]);
        let to_array_t = store.add_type_param("T", vec![]);
        let e = Type::type_var(collection_e);
        store.install_class(
            collection,
            ClassDef {
                type_params: vec![collection_e],
                interfaces: vec![Type::parameterized(iterable, vec![e.clone()])],
                methods: vec![
                    MethodDef::new("size", vec![], int.clone()),
                    MethodDef::new("add", vec![e.clone()], boolean.clone()),
                    MethodDef {
                        type_params: vec![to_array_t],
                        ..MethodDef::new(
                            "toArray",
                            vec![Type::array(Type::type_var(to_array_t))],
                            Type::array(Type::type_var(to_array_t)),
                        )
                    },
                ],
                ..ClassDef::interface("java.util.Collection")
            },
        );

        let list = store.intern_class_id("java.util.List");
        let list_e = store.add_type_param("E", vec![]);
        let e = Type::type_var(list_e);
        store.install_class(
            list,
            ClassDef {
                type_params: vec![list_e],
                interfaces: vec![Type::parameterized(collection, vec![e.clone()])],
                methods: vec![
                    MethodDef::new("get", vec![int.clone()], e.clone()),
                    MethodDef::new("set", vec![int.clone(), e.clone()], e.clone()),
                    MethodDef::new(
                        "subList",
                        vec![int.clone(), int.clone()],
                        Type::parameterized(list, vec![e.clone()]),
                    ),
                ],
                ..ClassDef::interface("java.util.List")
            },
        );

        let set = store.intern_class_id("java.util.Set");
        let set_e = store.add_type_param("E", vec![]);
        store.install_class(
            set,
            ClassDef {
                type_params: vec![set_e],
                interfaces: vec![Type::parameterized(
                    collection,
                    vec![Type::type_var(set_e)],
                )],
                ..ClassDef::interface("java.util.Set")
            },
        );

        let array_list = store.intern_class_id("java.util.ArrayList");
        let array_list_e = store.add_type_param("E", vec![]);
        let e = Type::type_var(array_list_e);
        store.install_class(
            array_list,
            ClassDef {
                type_params: vec![array_list_e],
                interfaces: vec![
                    Type::parameterized(list, vec![e.clone()]),
                    Type::class(wk.cloneable),
                    Type::class(wk.serializable),
                ],
                constructors: vec![
                    ConstructorDef::default(),
                    ConstructorDef {
                        type_params: Vec::new(),
                        params: vec![Type::parameterized(
                            collection,
                            vec![Type::wildcard_extends(e.clone())],
                        )],
                    },
                ],
                ..ClassDef::class("java.util.ArrayList")
            },
        );

        let hash_set = store.intern_class_id("java.util.HashSet");
        let hash_set_e = store.add_type_param("E", vec![]);
        store.install_class(
            hash_set,
            ClassDef {
                type_params: vec![hash_set_e],
                interfaces: vec![
                    Type::parameterized(set, vec![Type::type_var(hash_set_e)]),
                    Type::class(wk.cloneable),
                    Type::class(wk.serializable),
                ],
                ..ClassDef::class("java.util.HashSet")
            },
        );

        let map = store.intern_class_id("java.util.Map");
        let map_k = store.add_type_param("K", vec![]);
        let map_v = store.add_type_param("V", vec![]);
        let (k, v) = (Type::type_var(map_k), Type::type_var(map_v));
        store.install_class(
            map,
            ClassDef {
                type_params: vec![map_k, map_v],
                methods: vec![
                    MethodDef::new("get", vec![Type::object()], v.clone()),
                    MethodDef::new("put", vec![k.clone(), v.clone()], v.clone()),
                    MethodDef::new(
                        "keySet",
                        vec![],
                        Type::parameterized(set, vec![k.clone()]),
                    ),
                ],
                ..ClassDef::interface("java.util.Map")
            },
        );

        let hash_map = store.intern_class_id("java.util.HashMap");
        let hash_map_k = store.add_type_param("K", vec![]);
        let hash_map_v = store.add_type_param("V", vec![]);
        store.install_class(
            hash_map,
            ClassDef {
                type_params: vec![hash_map_k, hash_map_v],
                interfaces: vec![
                    Type::parameterized(
                        map,
                        vec![Type::type_var(hash_map_k), Type::type_var(hash_map_v)],
                    ),
                    Type::class(wk.cloneable),
                    Type::class(wk.serializable),
                ],
                ..ClassDef::class("java.util.HashMap")
            },
        );

        let enum_class = store.intern_class_id("java.lang.Enum");
        let enum_e = store.add_type_param("E", vec![]);
        let e = Type::type_var(enum_e);
        store.type_params[enum_e.index()].upper_bounds =
            vec![Type::parameterized(enum_class, vec![e.clone()])];
        store.install_class(
            enum_class,
            ClassDef {
                type_params: vec![enum_e],
                interfaces: vec![
                    Type::parameterized(wk.comparable, vec![e]),
                    Type::class(wk.serializable),
                ],
                methods: vec![
                    MethodDef::new("name", vec![], Type::class(wk.string)),
                    MethodDef::new("ordinal", vec![], int),
                ],
                ..ClassDef::class("java.lang.Enum")
            },
        );

        store
    }
}

fn normalize_bounds(mut def: TypeParamDef) -> TypeParamDef {
    if def.upper_bounds.is_empty() {
        def.upper_bounds.push(Type::object());
    }
    def
}

impl Default for TypeStore {
    fn default() -> Self {
        let mut store = TypeStore {
            classes: Vec::new(),
            class_by_name: HashMap::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes::placeholder(),
        };

        let object = store.add_class(ClassDef::class("java.lang.Object"));
        debug_assert_eq!(object, ClassId::OBJECT);

        let mut primitives = [ClassId::OBJECT; 9];
        for primitive in PrimitiveType::ALL {
            primitives[primitive as usize] = store.add_class(ClassDef::primitive(primitive));
        }

        let serializable = store.add_class(ClassDef::interface("java.io.Serializable"));
        let cloneable = store.add_class(ClassDef::interface("java.lang.Cloneable"));
        let char_sequence = store.add_class(ClassDef::interface("java.lang.CharSequence"));

        let comparable = store.intern_class_id("java.lang.Comparable");
        let comparable_t = store.add_type_param("T", vec![]);
        store.install_class(
            comparable,
            ClassDef {
                type_params: vec![comparable_t],
                ..ClassDef::interface("java.lang.Comparable")
            },
        );

        let number = store.add_class(ClassDef {
            interfaces: vec![Type::class(serializable)],
            ..ClassDef::class("java.lang.Number")
        });

        let string = store.intern_class_id("java.lang.String");
        store.install_class(
            string,
            ClassDef {
                interfaces: vec![
                    Type::class(serializable),
                    Type::parameterized(comparable, vec![Type::class(string)]),
                    Type::class(char_sequence),
                ],
                ..ClassDef::class("java.lang.String")
            },
        );

        let mut boxes = [ClassId::OBJECT; 9];
        for (primitive, name) in BOX_TYPES {
            let id = store.intern_class_id(name);
            let comparable_self = Type::parameterized(comparable, vec![Type::class(id)]);
            let (super_class, interfaces) = match primitive {
                PrimitiveType::Void => (None, Vec::new()),
                PrimitiveType::Boolean | PrimitiveType::Char => (
                    None,
                    vec![Type::class(serializable), comparable_self],
                ),
                _ => (Some(Type::class(number)), vec![comparable_self]),
            };
            store.install_class(
                id,
                ClassDef {
                    super_class,
                    interfaces,
                    ..ClassDef::class(name)
                },
            );
            boxes[primitive as usize] = id;
        }

        store.well_known = WellKnownTypes {
            object,
            cloneable,
            serializable,
            string,
            number,
            comparable,
            char_sequence,
            primitives,
            boxes,
        };
        store
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        if name.contains('.') {
            return None;
        }
        self.class_id(&format!("java.lang.{name}"))
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
