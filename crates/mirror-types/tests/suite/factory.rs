use mirror_types::reflect::{
    add_wildcard_parameters, array_component_type, box_type, expand_class_generics,
    is_fully_bound, is_missing_type_parameters, merge_annotations, parameterized_class,
    parameterized_inner_class, replace_parameters, upper_bound_classes, RawClass,
};
use mirror_types::{
    Annotation, AnnotationSet, ClassDef, ParameterizedType, ReflectError, Type, TypeEnv,
};
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

fn marked(name: &str) -> AnnotationSet {
    [Annotation::marker(name)].into_iter().collect()
}

#[test]
fn parameterized_class_checks_arity() {
    let fx = Fixture::new();
    let err = parameterized_class(&fx.store, fx.map, vec![fx.ty(fx.string)]).unwrap_err();
    assert!(matches!(err, ReflectError::InvariantViolation(_)), "got {err:?}");

    assert_eq!(
        parameterized_class(&fx.store, fx.list, vec![fx.ty(fx.string)]).unwrap(),
        fx.list_of(fx.ty(fx.string))
    );
}

#[test]
fn inner_class_of_generic_class_gets_raw_owner() {
    let fx = Fixture::new();
    let ty = parameterized_class(&fx.store, fx.inner, vec![fx.ty(fx.string)]).unwrap();
    assert_eq!(ty, Type::inner(fx.ty(fx.outer), fx.inner, vec![fx.ty(fx.string)]));
}

#[test]
fn parameterized_inner_class_requires_enclosing_owner() {
    let fx = Fixture::new();
    let owner = fx.generic(fx.outer, vec![fx.ty(fx.integer)]);
    assert_eq!(
        parameterized_inner_class(&fx.store, owner.clone(), fx.inner, vec![fx.ty(fx.string)])
            .unwrap(),
        Type::inner(owner, fx.inner, vec![fx.ty(fx.string)])
    );

    let err = parameterized_inner_class(
        &fx.store,
        fx.list_of(fx.ty(fx.string)),
        fx.inner,
        vec![fx.ty(fx.string)],
    )
    .unwrap_err();
    assert!(matches!(err, ReflectError::InvariantViolation(_)), "got {err:?}");
}

#[test]
fn generic_form_of_inner_class_includes_owner() {
    let fx = Fixture::new();
    let outer_t = fx.store.class(fx.outer).unwrap().type_params[0];
    let inner_u = fx.store.class(fx.inner).unwrap().type_params[0];

    assert_eq!(
        expand_class_generics(&fx.store, fx.inner).unwrap(),
        Type::inner(
            fx.generic(fx.outer, vec![Type::type_var(outer_t)]),
            fx.inner,
            vec![Type::type_var(inner_u)],
        )
    );
    assert_eq!(
        expand_class_generics(&fx.store, fx.string).unwrap(),
        fx.ty(fx.string)
    );
}

#[test]
fn missing_type_parameters() {
    let mut fx = Fixture::new();
    let nested = fx.store.add_class(ClassDef {
        enclosing: Some(fx.outer),
        is_static: true,
        ..ClassDef::class("demo.Outer$Nested")
    });
    let member = fx.store.add_class(ClassDef {
        enclosing: Some(fx.outer),
        ..ClassDef::class("demo.Outer$Member")
    });

    let missing = |ty: Type| is_missing_type_parameters(&fx.store, &ty).unwrap();
    assert!(missing(fx.ty(fx.list)));
    assert!(missing(Type::array(fx.ty(fx.list))));
    assert!(missing(fx.ty(fx.inner)));
    assert!(missing(fx.ty(member)));
    assert!(!missing(fx.ty(nested)));
    assert!(!missing(fx.ty(fx.string)));
    assert!(!missing(fx.list_of(fx.ty(fx.string))));
    assert!(!missing(Type::type_var(fx.list_e)));
}

#[test]
fn wildcard_parameters_fill_raw_classes() {
    let fx = Fixture::new();
    let any = Type::unbounded_wildcard;

    assert_eq!(
        add_wildcard_parameters(&fx.store, &RawClass::Class(fx.map)).unwrap(),
        fx.generic(fx.map, vec![any(), any()])
    );
    assert_eq!(
        add_wildcard_parameters(&fx.store, &RawClass::array_of(RawClass::Class(fx.list)))
            .unwrap(),
        Type::array(fx.list_of(any()))
    );
    assert_eq!(
        add_wildcard_parameters(&fx.store, &RawClass::Class(fx.string)).unwrap(),
        fx.ty(fx.string)
    );
    assert_eq!(
        add_wildcard_parameters(&fx.store, &RawClass::Class(fx.inner)).unwrap(),
        Type::inner(fx.generic(fx.outer, vec![any()]), fx.inner, vec![any()])
    );
}

#[test]
fn fully_bound_types() {
    let fx = Fixture::new();
    assert!(is_fully_bound(&fx.ty(fx.string)));
    assert!(is_fully_bound(&Type::array(fx.list_of(fx.ty(fx.string)))));
    assert!(!is_fully_bound(&fx.list_of(Type::unbounded_wildcard())));
    assert!(!is_fully_bound(&fx.list_of(Type::type_var(fx.list_e))));
    assert!(!is_fully_bound(&Type::inner(
        fx.generic(fx.outer, vec![Type::type_var(fx.box_t)]),
        fx.inner,
        vec![fx.ty(fx.string)],
    )));
}

#[test]
fn boxing_and_components() {
    let fx = Fixture::new();
    let annotated = fx.ty(fx.int).with_annotations(marked("NonNull"));
    assert_eq!(
        box_type(&fx.store, &annotated),
        fx.ty(fx.integer).with_annotations(marked("NonNull"))
    );
    let list = fx.list_of(fx.ty(fx.string));
    assert_eq!(box_type(&fx.store, &list), list);

    let array = Type::array(list.clone());
    assert_eq!(array_component_type(&array), Some(&list));
    assert_eq!(array_component_type(&list), None);
}

#[test]
fn upper_bound_classes_of_a_bounded_variable() {
    let mut fx = Fixture::new();
    let comparable_string = fx.generic(fx.comparable, vec![fx.ty(fx.string)]);
    let var = fx.store.add_type_param(
        "N",
        vec![fx.ty(fx.number), comparable_string.clone(), fx.ty(fx.number)],
    );

    assert_eq!(
        upper_bound_classes(&fx.store, &Type::type_var(var)).unwrap(),
        vec![RawClass::Class(fx.number), RawClass::Class(fx.comparable)]
    );
    assert_eq!(
        upper_bound_classes(&fx.store, &comparable_string).unwrap(),
        vec![RawClass::Class(fx.comparable)]
    );
}

#[test]
fn replace_parameters_keeps_owner_and_annotations() {
    let fx = Fixture::new();
    let owner = fx.generic(fx.outer, vec![fx.ty(fx.integer)]);
    let original = ParameterizedType {
        raw: fx.inner,
        args: vec![fx.ty(fx.string)],
        owner: Some(Box::new(owner.clone())),
        annotations: marked("Inner"),
    };

    let replaced = replace_parameters(&fx.store, &original, vec![fx.ty(fx.number)]).unwrap();
    assert_eq!(
        replaced,
        Type::inner(owner, fx.inner, vec![fx.ty(fx.number)]).with_annotations(marked("Inner"))
    );

    let err = replace_parameters(&fx.store, &original, vec![]).unwrap_err();
    assert!(matches!(err, ReflectError::InvariantViolation(_)), "got {err:?}");
}

#[test]
fn merge_annotations_unions_every_level() {
    let fx = Fixture::new();
    let left = fx.list_of(fx.ty(fx.string).with_annotations(marked("A")));
    let right = fx.list_of(fx.ty(fx.string)).with_annotations(marked("B"));

    assert_eq!(
        merge_annotations(&left, &right).unwrap(),
        fx.list_of(fx.ty(fx.string).with_annotations(marked("A"))).with_annotations(marked("B"))
    );

    let err = merge_annotations(&left, &fx.ty(fx.string)).unwrap_err();
    assert!(matches!(err, ReflectError::InvariantViolation(_)), "got {err:?}");
}
