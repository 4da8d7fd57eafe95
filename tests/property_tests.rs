//! Property-based tests for the built-in generators.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated bounds and seeds.

use std::sync::Arc;

use proptest::prelude::*;

use fixtura::core::catalog::TypeCatalog;
use fixtura::core::types::Value;
use fixtura::generator::{Gen, GeneratorContext, GeneratorHandle, Random};
use fixtura::generator::specs::PeselSpec;
use fixtura::Fixture;

fn draw(handle: &GeneratorHandle, seed: u64) -> Value {
    handle.init(&GeneratorContext::default());
    let mut random = Random::new(Some(seed));
    handle.generate(&mut random).expect("generation succeeds")
}

/// Strategy for ordered integer bounds.
fn int_bounds() -> impl Strategy<Value = (i64, i64)> {
    (-1_000_000i64..1_000_000, 0i64..10_000).prop_map(|(min, span)| (min, min + span))
}

/// Strategy for ordered string length bounds.
fn length_bounds() -> impl Strategy<Value = (usize, usize)> {
    (0usize..40, 0usize..40).prop_map(|(min, span)| (min, min + span))
}

proptest! {
    #[test]
    fn ints_stay_in_range((min, max) in int_bounds(), seed in any::<u64>()) {
        let handle: GeneratorHandle = Gen::longs().range(min, max).into();
        let value = draw(&handle, seed).as_int().expect("int value");
        prop_assert!((min..=max).contains(&value));
    }

    #[test]
    fn i32_range_is_clamped(seed in any::<u64>()) {
        let handle: GeneratorHandle = Gen::ints().range(i64::MIN, i64::MAX).into();
        let value = draw(&handle, seed).as_int().expect("int value");
        prop_assert!(i32::try_from(value).is_ok());
    }

    #[test]
    fn string_length_stays_in_bounds((min, max) in length_bounds(), seed in any::<u64>()) {
        let handle: GeneratorHandle = Gen::strings().min_length(min).max_length(max).into();
        let value = draw(&handle, seed);
        let len = value.as_str().expect("string value").chars().count();
        prop_assert!((min..=max).contains(&len));
    }

    #[test]
    fn digit_strings_are_digits(len in 1usize..30, seed in any::<u64>()) {
        let handle: GeneratorHandle = Gen::strings().length(len).digits().into();
        let value = draw(&handle, seed);
        let s = value.as_str().expect("string value");
        prop_assert_eq!(s.len(), len);
        prop_assert!(s.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn prefix_and_suffix_wrap_the_body(seed in any::<u64>()) {
        let handle: GeneratorHandle =
            Gen::strings().prefix("ID-").suffix("!").length(5).upper_case().into();
        let value = draw(&handle, seed);
        let s = value.as_str().expect("string value");
        prop_assert!(s.starts_with("ID-"));
        prop_assert!(s.ends_with('!'));
    }

    #[test]
    fn mod11_default_layout_is_valid(seed in any::<u64>()) {
        let spec = Gen::mod11();
        let handle: GeneratorHandle = spec.clone().into();
        let value = draw(&handle, seed);
        let s = value.as_str().expect("string value");
        prop_assert_eq!(s.chars().count(), 11);
        prop_assert!(spec.is_valid(s), "{} should be valid", s);
    }

    #[test]
    fn mod11_windowed_layout_is_valid(
        start in 0usize..4,
        width in 2usize..8,
        threshold in 2u32..9,
        left_to_right in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let end = start + width;
        let mut spec = Gen::mod11().start_index(start).end_index(end).threshold(threshold);
        if left_to_right {
            spec = spec.left_to_right();
        }
        let handle: GeneratorHandle = spec.clone().into();
        let value = draw(&handle, seed);
        prop_assert!(spec.is_valid(value.as_str().expect("string value")));
    }

    #[test]
    fn pesel_check_digit_matches(seed in any::<u64>()) {
        let handle: GeneratorHandle = Gen::pesel().into();
        let value = draw(&handle, seed);
        let s = value.as_str().expect("string value");
        let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
        prop_assert_eq!(digits.len(), 11);
        prop_assert_eq!(PeselSpec::check_digit(&digits[..10]), digits[10]);
    }

    #[test]
    fn same_seed_same_record(seed in any::<u64>()) {
        let catalog = Arc::new(
            TypeCatalog::builder()
                .record("Person", |r| {
                    r.field("name", "string")
                        .field("age", "i32")
                        .field("tags", "Tags")
                })
                .list("Tags", "string")
                .build()
                .expect("catalog is valid"),
        );
        let a = Fixture::of(catalog.clone(), "Person").with_seed(seed).create().unwrap();
        let b = Fixture::of(catalog, "Person").with_seed(seed).create().unwrap();
        prop_assert_eq!(a, b);
    }
}
