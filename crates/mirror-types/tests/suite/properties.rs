use mirror_types::reflect::{erase, exact_super_type, to_canonical, TyContext};
use mirror_types::Type;
use proptest::prelude::*;

use super::fixtures::Fixture;

const PROPTEST_CASES: u32 = 128;

/// Fixture-independent description of a type, turned into a [`Type`] once the fixture exists.
#[derive(Clone, Debug)]
enum Shape {
    Leaf(u8),
    List(Box<Shape>),
    ArrayList(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Pair(Box<Shape>, Box<Shape>),
    Array(Box<Shape>),
    Extends(Box<Shape>),
    Super(Box<Shape>),
    Unbounded,
}

impl Shape {
    fn build(&self, fx: &Fixture) -> Type {
        match self {
            Shape::Leaf(idx) => {
                let leaves = [fx.string, fx.integer, fx.number, fx.object, fx.string_list];
                fx.ty(leaves[*idx as usize % leaves.len()])
            }
            Shape::List(arg) => fx.list_of(arg.build(fx)),
            Shape::ArrayList(arg) => fx.generic(fx.array_list, vec![arg.build(fx)]),
            Shape::Map(k, v) => fx.generic(fx.map, vec![k.build(fx), v.build(fx)]),
            Shape::Pair(a, b) => fx.generic(fx.pair, vec![a.build(fx), b.build(fx)]),
            Shape::Array(component) => Type::array(component.build(fx)),
            Shape::Extends(bound) => Type::wildcard_extends(bound.build(fx)),
            Shape::Super(bound) => Type::wildcard_super(bound.build(fx)),
            Shape::Unbounded => Type::unbounded_wildcard(),
        }
    }
}

/// Concrete types: no wildcards anywhere.
fn arb_concrete() -> impl Strategy<Value = Shape> {
    any::<u8>().prop_map(Shape::Leaf).prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| Shape::List(Box::new(s))),
            inner.clone().prop_map(|s| Shape::ArrayList(Box::new(s))),
            inner.clone().prop_map(|s| Shape::Array(Box::new(s))),
            (inner.clone(), inner.clone()).prop_map(|(k, v)| Shape::Map(Box::new(k), Box::new(v))),
            (inner.clone(), inner).prop_map(|(a, b)| Shape::Pair(Box::new(a), Box::new(b))),
        ]
    })
}

/// Type arguments may be wildcards.
fn arb_argument() -> impl Strategy<Value = Shape> {
    prop_oneof![
        3 => arb_concrete(),
        1 => Just(Shape::Unbounded),
        1 => arb_concrete().prop_map(|s| Shape::Extends(Box::new(s))),
        1 => arb_concrete().prop_map(|s| Shape::Super(Box::new(s))),
    ]
}

/// A generic class applied to possibly-wildcard arguments, ready for capture conversion.
fn arb_wildcard_type() -> impl Strategy<Value = Shape> {
    prop_oneof![
        arb_argument().prop_map(|s| Shape::List(Box::new(s))),
        (arb_argument(), arb_argument()).prop_map(|(k, v)| Shape::Map(Box::new(k), Box::new(v))),
        (arb_argument(), arb_argument()).prop_map(|(a, b)| Shape::Pair(Box::new(a), Box::new(b))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn erasure_is_idempotent(shape in arb_concrete()) {
        let fx = Fixture::new();
        let ty = shape.build(&fx);
        let raw = erase(&fx.store, &ty).unwrap();
        prop_assert_eq!(erase(&fx.store, &raw.to_type()).unwrap(), raw);
    }

    #[test]
    fn every_type_is_its_own_supertype(shape in arb_concrete()) {
        let fx = Fixture::new();
        let ty = shape.build(&fx);
        let mut cx = TyContext::new(&fx.store);
        prop_assert!(cx.is_super_type(&ty, &ty).unwrap());
        prop_assert!(cx.is_super_type(&Type::object(), &ty).unwrap());

        let raw = erase(&fx.store, &ty).unwrap();
        prop_assert_eq!(exact_super_type(&fx.store, &ty, &raw).unwrap(), Some(ty));
    }

    #[test]
    fn canonical_form_survives_materialization(shape in arb_wildcard_type()) {
        let fx = Fixture::new();
        let mut cx = TyContext::new(&fx.store);
        let captured = cx.capture(&shape.build(&fx)).unwrap();

        let canonical = to_canonical(&cx, &captured).unwrap();
        let rebuilt = canonical.to_type(&mut cx).unwrap();
        prop_assert_eq!(to_canonical(&cx, &rebuilt).unwrap(), canonical);
    }
}
