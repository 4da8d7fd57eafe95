//! String and character generators.

use std::sync::OnceLock;

use super::value_hints;
use crate::core::config::{DEFAULT_NULL_PROBABILITY, DEFAULT_STRING_LENGTH};
use crate::core::types::{TypeKey, Value};
use crate::generator::{GenerateError, Generator, GeneratorContext, Hints, Random};

/// Characters a generated string is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharClass {
    #[default]
    Upper,
    Lower,
    Mixed,
    AlphaNumeric,
    Digits,
}

impl CharClass {
    fn draw(self, random: &mut Random) -> char {
        match self {
            CharClass::Upper => random.upper_char(),
            CharClass::Lower => random.lower_char(),
            CharClass::Mixed => {
                if random.bool() {
                    random.upper_char()
                } else {
                    random.lower_char()
                }
            }
            CharClass::AlphaNumeric => random.alphanumeric_char(),
            CharClass::Digits => random.digit_char(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StringBounds {
    min: usize,
    max: usize,
    empty_probability: f64,
}

/// Random strings.
///
/// The length bounds apply to the random part only; prefix and suffix are
/// added around it.
#[derive(Debug, Clone, Default)]
pub struct StringSpec {
    min_length: Option<usize>,
    max_length: Option<usize>,
    prefix: String,
    suffix: String,
    class: CharClass,
    nullable: bool,
    allow_empty: bool,
    bounds: OnceLock<StringBounds>,
}

impl StringSpec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Exact length.
    pub fn length(self, len: usize) -> Self {
        self.min_length(len).max_length(len)
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn upper_case(mut self) -> Self {
        self.class = CharClass::Upper;
        self
    }

    pub fn lower_case(mut self) -> Self {
        self.class = CharClass::Lower;
        self
    }

    pub fn mixed_case(mut self) -> Self {
        self.class = CharClass::Mixed;
        self
    }

    pub fn alpha_numeric(mut self) -> Self {
        self.class = CharClass::AlphaNumeric;
        self
    }

    pub fn digits(mut self) -> Self {
        self.class = CharClass::Digits;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Occasionally produce an empty string, with the null probability.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    fn resolve(&self, defaults: (usize, usize), null_probability: f64) -> StringBounds {
        let (min, max) = match (self.min_length, self.max_length) {
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => (min, min.max(defaults.1)),
            (None, Some(max)) => (defaults.0.min(max), max),
            (None, None) => defaults,
        };
        StringBounds {
            min,
            max,
            empty_probability: null_probability,
        }
    }
}

impl Generator for StringSpec {
    fn init(&self, context: &GeneratorContext) {
        let settings = context.settings();
        self.bounds
            .get_or_init(|| self.resolve(settings.string_length(), settings.null_probability()));
    }

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let bounds = self
            .bounds
            .get()
            .copied()
            .unwrap_or_else(|| self.resolve(DEFAULT_STRING_LENGTH, DEFAULT_NULL_PROBABILITY));
        if bounds.min > bounds.max {
            return Err(GenerateError::InvalidRange {
                what: "string length",
                detail: format!("min {} exceeds max {}", bounds.min, bounds.max),
            });
        }
        if self.allow_empty && random.chance(bounds.empty_probability) {
            return Ok(Value::Str(String::new()));
        }

        let len = random.usize_range(bounds.min, bounds.max);
        let mut out = String::with_capacity(self.prefix.len() + len + self.suffix.len());
        out.push_str(&self.prefix);
        for _ in 0..len {
            out.push(self.class.draw(random));
        }
        out.push_str(&self.suffix);
        Ok(Value::Str(out))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::string())
    }

    fn name(&self) -> &str {
        "strings()"
    }
}

/// Single characters.
#[derive(Debug, Clone, Default)]
pub struct CharSpec {
    class: CharClass,
    nullable: bool,
}

impl CharSpec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub fn upper_case(mut self) -> Self {
        self.class = CharClass::Upper;
        self
    }

    pub fn lower_case(mut self) -> Self {
        self.class = CharClass::Lower;
        self
    }

    pub fn alpha_numeric(mut self) -> Self {
        self.class = CharClass::AlphaNumeric;
        self
    }

    pub fn digits(mut self) -> Self {
        self.class = CharClass::Digits;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

impl Generator for CharSpec {
    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        Ok(Value::Char(self.class.draw(random)))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::char())
    }

    fn name(&self) -> &str {
        "chars()"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Gen;

    fn generate_str(spec: &StringSpec, random: &mut Random) -> String {
        spec.generate(random)
            .unwrap()
            .as_str()
            .map(str::to_string)
            .unwrap()
    }

    mod strings {
        use super::*;

        #[test]
        fn default_is_upper_case_within_default_length() {
            let spec = Gen::strings();
            spec.init(&GeneratorContext::default());
            let mut random = Random::new(Some(1));
            for _ in 0..50 {
                let s = generate_str(&spec, &mut random);
                assert!((3..=10).contains(&s.len()), "{s}");
                assert!(s.chars().all(|c| c.is_ascii_uppercase()));
            }
        }

        #[test]
        fn prefix_suffix_and_exact_length() {
            let spec = Gen::strings().prefix("ID-").suffix("!").length(4).digits();
            let mut random = Random::new(Some(2));
            let s = generate_str(&spec, &mut random);
            assert!(s.starts_with("ID-"));
            assert!(s.ends_with('!'));
            assert_eq!(s.len(), 8);
            assert!(s[3..7].chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn lone_min_length_extends_max() {
            let spec = Gen::strings().min_length(20);
            spec.init(&GeneratorContext::default());
            let mut random = Random::new(Some(3));
            assert_eq!(generate_str(&spec, &mut random).len(), 20);
        }

        #[test]
        fn inverted_lengths_fail() {
            let spec = Gen::strings().min_length(5).max_length(1);
            let mut random = Random::new(Some(4));
            assert!(spec.generate(&mut random).is_err());
        }

        #[test]
        fn allow_empty_eventually_yields_empty() {
            let spec = Gen::strings().allow_empty();
            let mut random = Random::new(Some(5));
            let any_empty = (0..500).any(|_| generate_str(&spec, &mut random).is_empty());
            assert!(any_empty);
        }

        #[test]
        fn hints_and_target() {
            assert!(Gen::strings().nullable().hints().is_nullable());
            assert_eq!(Gen::strings().target_type(), Some(TypeKey::string()));
        }
    }

    mod chars {
        use super::*;

        #[test]
        fn classes() {
            let mut random = Random::new(Some(6));
            for _ in 0..50 {
                match Gen::chars().digits().generate(&mut random).unwrap() {
                    Value::Char(c) => assert!(c.is_ascii_digit()),
                    other => panic!("expected char, got {other:?}"),
                }
            }
        }
    }
}
