use mirror_types::reflect::{exact_super_class, TyContext};
use mirror_types::{ReflectError, Type};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

#[test]
fn field_type_in_parameterized_context() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let context = fx.generic(fx.pair, vec![fx.ty(fx.integer), fx.ty(fx.string)]);

    let second = fx.field(fx.pair, "second");
    let first = fx.field(fx.pair, "first");
    assert_eq!(cx.exact_field_type(second, &context).unwrap(), fx.ty(fx.string));
    assert_eq!(cx.exact_field_type(first, &context).unwrap(), fx.ty(fx.integer));
}

#[test]
fn raw_context_fails_exact_and_keeps_variable_when_incomplete() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let get = fx.method(fx.boxed, "get");
    let raw = fx.ty(fx.boxed);

    let err = cx.exact_return_type(get, &raw).unwrap_err();
    assert_eq!(
        err,
        ReflectError::UnresolvedVariable {
            variable: "T".to_owned(),
            context: "demo.Box".to_owned(),
        }
    );
    assert_eq!(cx.return_type(get, &raw).unwrap(), Type::type_var(fx.box_t));
}

#[test]
fn inherited_member_through_subclass() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let get = fx.method(fx.boxed, "get");
    let set = fx.method(fx.boxed, "set");

    let context = fx.ty(fx.int_box);
    assert_eq!(cx.exact_return_type(get, &context).unwrap(), fx.ty(fx.integer));
    assert_eq!(
        cx.exact_parameter_types(set, &context).unwrap(),
        vec![fx.ty(fx.integer)]
    );
}

#[test]
fn interface_methods_through_implementing_class() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let put = fx.method(fx.map, "put");
    let key_set = fx.method(fx.map, "keySet");
    let context = fx.generic(fx.hash_map, vec![fx.ty(fx.string), fx.ty(fx.integer)]);

    assert_eq!(
        cx.exact_parameter_types(put, &context).unwrap(),
        vec![fx.ty(fx.string), fx.ty(fx.integer)]
    );
    let set = fx.store.class_id("java.util.Set").expect("Set");
    assert_eq!(
        cx.exact_return_type(key_set, &context).unwrap(),
        fx.generic(set, vec![fx.ty(fx.string)])
    );
}

#[test]
fn wildcard_context_returns_a_capture() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let get = fx.method(fx.list, "get");
    let context = fx.list_of(Type::wildcard_extends(fx.ty(fx.number)));

    let returned = cx.exact_return_type(get, &context).unwrap();
    assert!(matches!(returned, Type::Capture(_)), "got {returned:?}");
    assert_eq!(
        exact_super_class(&cx, &returned, fx.number).unwrap(),
        Some(fx.ty(fx.number))
    );
    assert!(cx.is_super_type(&fx.ty(fx.number), &returned).unwrap());
}

#[test]
fn constructor_parameters() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let copy = fx.constructor(fx.array_list, 1);
    let context = fx.generic(fx.array_list, vec![fx.ty(fx.string)]);

    assert_eq!(
        cx.exact_parameter_types(copy, &context).unwrap(),
        vec![fx.generic(
            fx.collection,
            vec![Type::wildcard_extends(fx.ty(fx.string))]
        )]
    );
    assert_eq!(
        cx.exact_parameter_types(fx.constructor(fx.array_list, 0), &context)
            .unwrap(),
        Vec::<Type>::new()
    );
}

#[test]
fn method_type_parameters_stay_unbound() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let wrap = fx.method(fx.boxed, "wrap");
    let context = fx.generic(fx.boxed, vec![fx.ty(fx.string)]);

    let err = cx.exact_parameter_types(wrap, &context).unwrap_err();
    assert_eq!(
        err,
        ReflectError::UnresolvedVariable {
            variable: "R".to_owned(),
            context: "method demo.Box.wrap".to_owned(),
        }
    );
    assert_eq!(
        cx.parameter_types(wrap, &context).unwrap(),
        vec![Type::type_var(fx.wrap_r)]
    );
    assert_eq!(
        cx.return_type(wrap, &context).unwrap(),
        fx.generic(fx.boxed, vec![Type::type_var(fx.wrap_r)])
    );
}

#[test]
fn member_of_unrelated_context() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let second = fx.field(fx.pair, "second");

    let err = cx.exact_field_type(second, &fx.ty(fx.string)).unwrap_err();
    assert_eq!(
        err,
        ReflectError::NotAMember {
            member: "field demo.Pair.second".to_owned(),
            context: "java.lang.String".to_owned(),
        }
    );
}

#[test]
fn inner_class_members_see_enclosing_arguments() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let owner = fx.generic(fx.outer, vec![fx.ty(fx.string)]);
    let context = Type::inner(owner, fx.inner, vec![fx.ty(fx.integer)]);

    let outer = fx.method(fx.inner, "outer");
    let value = fx.field(fx.inner, "value");
    assert_eq!(cx.exact_return_type(outer, &context).unwrap(), fx.ty(fx.string));
    assert_eq!(cx.exact_field_type(value, &context).unwrap(), fx.ty(fx.integer));
}

#[test]
fn generic_return_type_keeps_context_arguments() {
    let fx = Fixture::new();
    let mut cx = TyContext::new(&fx.store);
    let sub_list = fx.method(fx.list, "subList");
    let context = fx.generic(fx.array_list, vec![fx.ty(fx.string)]);
    assert_eq!(
        cx.exact_return_type(sub_list, &context).unwrap(),
        fx.list_of(fx.ty(fx.string))
    );
}
