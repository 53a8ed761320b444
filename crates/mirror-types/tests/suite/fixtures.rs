//! A minimal JDK plus a handful of generic declarations shared by the suites.

use mirror_types::{
    ClassDef, ClassId, ConstructorId, FieldDef, FieldId, MethodDef, MethodId, PrimitiveType, Type,
    TypeEnv, TypeStore, TypeVarId,
};

pub struct Fixture {
    pub store: TypeStore,

    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub int: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub comparable: ClassId,

    pub iterable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub list_e: TypeVarId,
    pub array_list: ClassId,
    pub array_list_e: TypeVarId,
    pub map: ClassId,
    pub map_k: TypeVarId,
    pub hash_map: ClassId,

    /// `class Pair<A, B> { A first; B second; }`
    pub pair: ClassId,
    /// `class Box<T> { T get(); void set(T); <R> Box<R> wrap(R); }`
    pub boxed: ClassId,
    pub box_t: TypeVarId,
    pub wrap_r: TypeVarId,
    /// `class IntBox extends Box<Integer>`
    pub int_box: ClassId,
    /// `class Tagged<X> extends Box<String>`
    pub tagged: ClassId,
    /// `class StringList implements List<String>`
    pub string_list: ClassId,
    /// `class Foo<T extends Foo<T>>`
    pub foo: ClassId,
    pub foo_t: TypeVarId,
    /// `class Sibling<T, U extends T>`
    pub sibling: ClassId,
    pub sibling_t: TypeVarId,
    pub sibling_u: TypeVarId,
    /// `class Outer<T> { class Inner<U> { U value; T outer(); } }`
    pub outer: ClassId,
    pub inner: ClassId,
}

fn class(store: &TypeStore, name: &str) -> ClassId {
    store
        .lookup_class(name)
        .unwrap_or_else(|| panic!("{name} should be declared"))
}

fn param(store: &TypeStore, class: ClassId, index: usize) -> TypeVarId {
    store.class(class).expect("class").type_params[index]
}

impl Fixture {
    pub fn new() -> Self {
        let mut store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().clone();
        let void = Type::class(wk.primitive(PrimitiveType::Void));

        let list = class(&store, "java.util.List");
        let array_list = class(&store, "java.util.ArrayList");
        let map = class(&store, "java.util.Map");
        let integer = class(&store, "Integer");

        let pair = store.intern_class_id("demo.Pair");
        let pair_a = store.add_type_param("A", vec![]);
        let pair_b = store.add_type_param("B", vec![]);
        store
            .define_class(
                pair,
                ClassDef {
                    type_params: vec![pair_a, pair_b],
                    fields: vec![
                        FieldDef::new("first", Type::type_var(pair_a)),
                        FieldDef::new("second", Type::type_var(pair_b)),
                    ],
                    ..ClassDef::class("demo.Pair")
                },
            )
            .expect("define fixture class");

        let boxed = store.intern_class_id("demo.Box");
        let box_t = store.add_type_param("T", vec![]);
        let wrap_r = store.add_type_param("R", vec![]);
        let t = Type::type_var(box_t);
        let r = Type::type_var(wrap_r);
        store
            .define_class(
                boxed,
                ClassDef {
                    type_params: vec![box_t],
                    methods: vec![
                        MethodDef::new("get", vec![], t.clone()),
                        MethodDef::new("set", vec![t], void),
                        MethodDef {
                            type_params: vec![wrap_r],
                            ..MethodDef::new(
                                "wrap",
                                vec![r.clone()],
                                Type::parameterized(boxed, vec![r]),
                            )
                        },
                    ],
                    ..ClassDef::class("demo.Box")
                },
            )
            .expect("define fixture class");

        let int_box = store.add_class(ClassDef {
            super_class: Some(Type::parameterized(boxed, vec![Type::class(integer)])),
            ..ClassDef::class("demo.IntBox")
        });

        let tagged = store.intern_class_id("demo.Tagged");
        let tagged_x = store.add_type_param("X", vec![]);
        store
            .define_class(
                tagged,
                ClassDef {
                    type_params: vec![tagged_x],
                    super_class: Some(Type::parameterized(boxed, vec![Type::class(wk.string)])),
                    ..ClassDef::class("demo.Tagged")
                },
            )
            .expect("define fixture class");

        let string_list = store.add_class(ClassDef {
            interfaces: vec![Type::parameterized(list, vec![Type::class(wk.string)])],
            ..ClassDef::class("demo.StringList")
        });

        let foo = store.intern_class_id("demo.Foo");
        let foo_t = store.add_type_param("T", vec![]);
        store
            .set_type_param_bounds(foo_t, vec![Type::parameterized(foo, vec![Type::type_var(foo_t)])])
            .expect("bound fixture type parameter");
        store
            .define_class(
                foo,
                ClassDef {
                    type_params: vec![foo_t],
                    ..ClassDef::class("demo.Foo")
                },
            )
            .expect("define fixture class");

        let sibling = store.intern_class_id("demo.Sibling");
        let sibling_t = store.add_type_param("T", vec![]);
        let sibling_u = store.add_type_param("U", vec![Type::type_var(sibling_t)]);
        store
            .define_class(
                sibling,
                ClassDef {
                    type_params: vec![sibling_t, sibling_u],
                    ..ClassDef::class("demo.Sibling")
                },
            )
            .expect("define fixture class");

        let outer = store.intern_class_id("demo.Outer");
        let outer_t = store.add_type_param("T", vec![]);
        store
            .define_class(
                outer,
                ClassDef {
                    type_params: vec![outer_t],
                    ..ClassDef::class("demo.Outer")
                },
            )
            .expect("define fixture class");
        let inner = store.intern_class_id("demo.Outer$Inner");
        let inner_u = store.add_type_param("U", vec![]);
        store
            .define_class(
                inner,
                ClassDef {
                    type_params: vec![inner_u],
                    enclosing: Some(outer),
                    fields: vec![FieldDef::new("value", Type::type_var(inner_u))],
                    methods: vec![MethodDef::new("outer", vec![], Type::type_var(outer_t))],
                    ..ClassDef::class("demo.Outer$Inner")
                },
            )
            .expect("define fixture class");

        Fixture {
            object: wk.object,
            string: wk.string,
            number: wk.number,
            integer,
            int: wk.primitive(PrimitiveType::Int),
            cloneable: wk.cloneable,
            serializable: wk.serializable,
            comparable: wk.comparable,
            iterable: class(&store, "java.lang.Iterable"),
            collection: class(&store, "java.util.Collection"),
            list,
            list_e: param(&store, list, 0),
            array_list,
            array_list_e: param(&store, array_list, 0),
            map,
            map_k: param(&store, map, 0),
            hash_map: class(&store, "java.util.HashMap"),
            pair,
            boxed,
            box_t,
            wrap_r,
            int_box,
            tagged,
            string_list,
            foo,
            foo_t,
            sibling,
            sibling_t,
            sibling_u,
            outer,
            inner,
            store,
        }
    }

    pub fn ty(&self, class: ClassId) -> Type {
        Type::class(class)
    }

    pub fn generic(&self, class: ClassId, args: Vec<Type>) -> Type {
        Type::parameterized(class, args)
    }

    pub fn list_of(&self, arg: Type) -> Type {
        Type::parameterized(self.list, vec![arg])
    }

    pub fn field(&self, class: ClassId, name: &str) -> FieldId {
        self.store
            .find_field(class, name)
            .unwrap_or_else(|| panic!("field {name} should exist"))
    }

    pub fn method(&self, class: ClassId, name: &str) -> MethodId {
        self.store
            .find_method(class, name)
            .unwrap_or_else(|| panic!("method {name} should exist"))
    }

    pub fn constructor(&self, class: ClassId, index: usize) -> ConstructorId {
        self.store
            .constructors(class)
            .nth(index)
            .expect("constructor should exist")
    }
}
