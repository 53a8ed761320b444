use mirror_types::reflect::{
    exact_direct_super_types, exact_sub_type, exact_super_class, exact_super_type,
    type_parameter, RawClass,
};
use mirror_types::Type;
use pretty_assertions::assert_eq;

use super::fixtures::Fixture;

#[test]
fn implemented_interface_carries_its_arguments() {
    let fx = Fixture::new();
    let found = exact_super_class(&fx.store, &fx.ty(fx.string_list), fx.list).unwrap();
    assert_eq!(found, Some(fx.list_of(fx.ty(fx.string))));
}

#[test]
fn arguments_flow_through_the_hierarchy() {
    let fx = Fixture::new();
    let array_list = fx.generic(fx.array_list, vec![fx.ty(fx.string)]);

    assert_eq!(
        exact_super_class(&fx.store, &array_list, fx.collection).unwrap(),
        Some(fx.generic(fx.collection, vec![fx.ty(fx.string)]))
    );
    assert_eq!(
        exact_super_class(&fx.store, &array_list, fx.iterable).unwrap(),
        Some(fx.generic(fx.iterable, vec![fx.ty(fx.string)]))
    );

    let hash_map = fx.generic(fx.hash_map, vec![fx.ty(fx.string), fx.ty(fx.integer)]);
    assert_eq!(
        exact_super_class(&fx.store, &hash_map, fx.map).unwrap(),
        Some(fx.generic(fx.map, vec![fx.ty(fx.string), fx.ty(fx.integer)]))
    );
}

#[test]
fn raw_subclass_gives_raw_supertype() {
    let fx = Fixture::new();
    let found = exact_super_class(&fx.store, &fx.ty(fx.array_list), fx.list).unwrap();
    assert_eq!(found, Some(fx.ty(fx.list)));
}

#[test]
fn unrelated_class_is_not_found() {
    let fx = Fixture::new();
    assert_eq!(
        exact_super_class(&fx.store, &fx.ty(fx.string), fx.list).unwrap(),
        None
    );
    assert_eq!(
        exact_super_class(&fx.store, &fx.list_of(fx.ty(fx.string)), fx.array_list).unwrap(),
        None
    );
}

#[test]
fn type_variables_search_their_bounds() {
    let fx = Fixture::new();
    let t = Type::type_var(fx.foo_t);
    assert_eq!(
        exact_super_class(&fx.store, &t, fx.foo).unwrap(),
        Some(fx.generic(fx.foo, vec![t.clone()]))
    );
}

#[test]
fn arrays_are_covariant() {
    let fx = Fixture::new();
    let strings = Type::array(fx.ty(fx.string));
    let objects = RawClass::array_of(RawClass::Class(fx.object));
    assert_eq!(
        exact_super_type(&fx.store, &strings, &objects).unwrap(),
        Some(Type::array(fx.ty(fx.object)))
    );

    let lists = Type::array(fx.generic(fx.array_list, vec![fx.ty(fx.string)]));
    assert_eq!(
        exact_super_type(&fx.store, &lists, &RawClass::array_of(RawClass::Class(fx.list)))
            .unwrap(),
        Some(Type::array(fx.list_of(fx.ty(fx.string))))
    );
}

#[test]
fn primitive_arrays_only_reach_the_array_supertypes() {
    let fx = Fixture::new();
    let ints = Type::array(fx.ty(fx.int));
    assert_eq!(
        exact_super_class(&fx.store, &ints, fx.cloneable).unwrap(),
        Some(fx.ty(fx.cloneable))
    );
    assert_eq!(
        exact_super_type(
            &fx.store,
            &ints,
            &RawClass::array_of(RawClass::Class(fx.object))
        )
        .unwrap(),
        None
    );
}

#[test]
fn supertype_search_is_reflexive() {
    let fx = Fixture::new();
    let ty = fx.generic(fx.hash_map, vec![fx.ty(fx.string), fx.list_of(fx.ty(fx.integer))]);
    assert_eq!(
        exact_super_class(&fx.store, &ty, fx.hash_map).unwrap(),
        Some(ty.clone())
    );
}

#[test]
fn direct_supertypes_of_a_generic_class() {
    let fx = Fixture::new();
    let ty = fx.generic(fx.array_list, vec![fx.ty(fx.string)]);
    assert_eq!(
        exact_direct_super_types(&fx.store, &ty).unwrap(),
        vec![
            fx.ty(fx.object),
            fx.list_of(fx.ty(fx.string)),
            fx.ty(fx.cloneable),
            fx.ty(fx.serializable),
        ]
    );
    assert_eq!(
        exact_direct_super_types(&fx.store, &fx.ty(fx.object)).unwrap(),
        Vec::<Type>::new()
    );
}

#[test]
fn type_parameter_looks_through_supertypes() {
    let fx = Fixture::new();
    let ty = fx.generic(fx.array_list, vec![fx.ty(fx.string)]);
    assert_eq!(
        type_parameter(&fx.store, &ty, fx.list_e).unwrap(),
        Some(fx.ty(fx.string))
    );
    assert_eq!(type_parameter(&fx.store, &ty, fx.map_k).unwrap(), None);
    // Method type parameters are never bound by a class type.
    let boxed = fx.generic(fx.boxed, vec![fx.ty(fx.string)]);
    assert_eq!(type_parameter(&fx.store, &boxed, fx.wrap_r).unwrap(), None);
}

#[test]
fn sub_type_recovers_subclass_arguments() {
    let fx = Fixture::new();
    let list_string = fx.list_of(fx.ty(fx.string));
    assert_eq!(
        exact_sub_type(&fx.store, &list_string, &RawClass::Class(fx.array_list)).unwrap(),
        Some(fx.generic(fx.array_list, vec![fx.ty(fx.string)]))
    );

    let map = fx.generic(fx.map, vec![fx.ty(fx.string), fx.ty(fx.integer)]);
    assert_eq!(
        exact_sub_type(&fx.store, &map, &RawClass::Class(fx.hash_map)).unwrap(),
        Some(fx.generic(fx.hash_map, vec![fx.ty(fx.string), fx.ty(fx.integer)]))
    );
}

#[test]
fn sub_type_of_unrelated_class_is_none() {
    let fx = Fixture::new();
    let list_string = fx.list_of(fx.ty(fx.string));
    assert_eq!(
        exact_sub_type(&fx.store, &list_string, &RawClass::Class(fx.string)).unwrap(),
        None
    );
}

#[test]
fn sub_type_without_generics_is_the_class_itself() {
    let fx = Fixture::new();
    let collection = fx.generic(fx.collection, vec![fx.ty(fx.string)]);
    assert_eq!(
        exact_sub_type(&fx.store, &collection, &RawClass::Class(fx.string_list)).unwrap(),
        Some(fx.ty(fx.string_list))
    );
}

// Permissive on purpose: `Tagged<X> extends Box<String>` leaves `X` unconstrained.
#[test]
fn untraceable_sub_type_arguments_fall_back_to_the_raw_class() {
    let fx = Fixture::new();
    let box_string = fx.generic(fx.boxed, vec![fx.ty(fx.string)]);
    assert_eq!(
        exact_sub_type(&fx.store, &box_string, &RawClass::Class(fx.tagged)).unwrap(),
        Some(fx.ty(fx.tagged))
    );
}
