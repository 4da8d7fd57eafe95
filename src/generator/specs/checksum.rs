//! Digit strings carrying a check digit.

use chrono::{DateTime, Datelike};

use super::temporal::DateTimeSpec;
use super::value_hints;
use crate::core::types::{TypeKey, Value};
use crate::generator::{GenerateError, Generator, GeneratorContext, Hints, Random};

/// Payload length when no end index is given.
const DEFAULT_MOD11_DIGITS: usize = 10;

const PESEL_WEIGHTS: [u32; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// Digit strings with a MOD-11 check digit.
///
/// Without an end index the string is ten digits followed by the check
/// digit. With one, the digits in `start_index..end_index` are covered and
/// the check digit sits at `check_digit_index` (default `end_index`); other
/// positions hold random digits.
///
/// Weights run 2, 3, 4, ... from the rightmost covered digit (leftmost with
/// [`left_to_right`](Self::left_to_right)) and wrap back to 2 past the
/// threshold. The check value is `11 - sum % 11`, where 10 and 11 are
/// written as the configured characters.
#[derive(Debug, Clone)]
pub struct Mod11Spec {
    start_index: usize,
    end_index: Option<usize>,
    check_digit_index: Option<usize>,
    threshold: Option<u32>,
    treat_check10_as: char,
    treat_check11_as: char,
    left_to_right: bool,
    nullable: bool,
}

impl Default for Mod11Spec {
    fn default() -> Self {
        Self {
            start_index: 0,
            end_index: None,
            check_digit_index: None,
            threshold: None,
            treat_check10_as: 'X',
            treat_check11_as: '0',
            left_to_right: false,
            nullable: false,
        }
    }
}

impl Mod11Spec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    /// Exclusive end of the covered digits.
    pub fn end_index(mut self, index: usize) -> Self {
        self.end_index = Some(index);
        self
    }

    pub fn check_digit_index(mut self, index: usize) -> Self {
        self.check_digit_index = Some(index);
        self
    }

    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn treat_check10_as(mut self, c: char) -> Self {
        self.treat_check10_as = c;
        self
    }

    pub fn treat_check11_as(mut self, c: char) -> Self {
        self.treat_check11_as = c;
        self
    }

    pub fn left_to_right(mut self) -> Self {
        self.left_to_right = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Positions of the covered digits and the check digit.
    fn layout(&self) -> Result<(usize, usize, usize), GenerateError> {
        let Some(end) = self.end_index else {
            if self.start_index != 0 || self.check_digit_index.is_some() {
                return Err(GenerateError::InvalidRange {
                    what: "mod11",
                    detail: "start index and check digit index require an end index".into(),
                });
            }
            return Ok((0, DEFAULT_MOD11_DIGITS, DEFAULT_MOD11_DIGITS));
        };
        if self.start_index > end {
            return Err(GenerateError::InvalidRange {
                what: "mod11",
                detail: format!("start index {} exceeds end index {end}", self.start_index),
            });
        }
        let check = self.check_digit_index.unwrap_or(end);
        if (self.start_index..end).contains(&check) {
            return Err(GenerateError::InvalidRange {
                what: "mod11",
                detail: format!(
                    "check digit index {check} falls inside {}..{end}",
                    self.start_index
                ),
            });
        }
        Ok((self.start_index, end, check))
    }

    fn check_char(&self, digits: &[u32]) -> char {
        let threshold = self.threshold.unwrap_or(u32::MAX);
        let mut ordered: Vec<u32> = digits.to_vec();
        if self.left_to_right {
            ordered.reverse();
        }

        let mut sum: u64 = 0;
        let mut weight: u32 = 2;
        for digit in ordered.iter().rev() {
            sum += u64::from(*digit) * u64::from(weight);
            weight += 1;
            if weight > threshold {
                weight = 2;
            }
        }

        match 11 - (sum % 11) {
            10 => self.treat_check10_as,
            11 => self.treat_check11_as,
            // 11 - (sum % 11) lies in 1..=11
            m => char::from_digit(m as u32, 10).unwrap_or(self.treat_check11_as),
        }
    }

    /// Check a string against this configuration.
    pub fn is_valid(&self, value: &str) -> bool {
        let Ok((start, end, check)) = self.layout() else {
            return false;
        };
        let chars: Vec<char> = value.chars().collect();
        let (covered, check_char) = if self.end_index.is_none() {
            match chars.split_last() {
                Some((last, rest)) => (rest.to_vec(), *last),
                None => return false,
            }
        } else {
            match (chars.get(start..end), chars.get(check)) {
                (Some(covered), Some(c)) => (covered.to_vec(), *c),
                _ => return false,
            }
        };
        let digits: Option<Vec<u32>> = covered.iter().map(|c| c.to_digit(10)).collect();
        digits.is_some_and(|d| self.check_char(&d) == check_char)
    }
}

impl Generator for Mod11Spec {
    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let (start, end, check) = self.layout()?;
        let len = end.max(check) + 1;
        let mut chars: Vec<char> = (0..len).map(|_| random.digit_char()).collect();

        let digits: Vec<u32> = chars[start..end]
            .iter()
            .filter_map(|c| c.to_digit(10))
            .collect();
        chars[check] = self.check_char(&digits);
        Ok(Value::Str(chars.into_iter().collect()))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::string())
    }

    fn name(&self) -> &str {
        "mod11()"
    }
}

/// Sex encoded in a PESEL number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

/// Polish national identification numbers (PESEL).
///
/// Eleven digits: birth date as `YYMMDD` with the century folded into the
/// month, a three digit serial, a sex digit (odd for male, even for female)
/// and a check digit.
#[derive(Debug, Clone, Default)]
pub struct PeselSpec {
    birthdate: Option<DateTimeSpec>,
    sex: Option<Sex>,
    nullable: bool,
}

impl PeselSpec {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Draw birth dates from `spec` instead of the past.
    pub fn birthdate(mut self, spec: DateTimeSpec) -> Self {
        self.birthdate = Some(spec);
        self
    }

    pub fn male(mut self) -> Self {
        self.sex = Some(Sex::Male);
        self
    }

    pub fn female(mut self) -> Self {
        self.sex = Some(Sex::Female);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn month_offset(year: i32) -> Option<u32> {
        match year {
            1800..=1899 => Some(80),
            1900..=1999 => Some(0),
            2000..=2099 => Some(20),
            2100..=2199 => Some(40),
            2200..=2299 => Some(60),
            _ => None,
        }
    }

    /// Check digit over the first ten digits.
    pub fn check_digit(digits: &[u32]) -> u32 {
        let sum: u32 = digits
            .iter()
            .zip(PESEL_WEIGHTS)
            .map(|(d, w)| d * w)
            .sum();
        (10 - sum % 10) % 10
    }
}

impl Generator for PeselSpec {
    fn init(&self, context: &GeneratorContext) {
        if let Some(spec) = &self.birthdate {
            spec.init(context);
        }
    }

    fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        let secs = match &self.birthdate {
            Some(spec) => spec.draw_timestamp(random)?,
            None => DateTimeSpec::new().past().draw_timestamp(random)?,
        };
        let date = DateTime::from_timestamp(secs, 0)
            .map(|t| t.date_naive())
            .ok_or_else(|| GenerateError::InvalidRange {
                what: "pesel",
                detail: format!("birth timestamp {secs} is not representable"),
            })?;
        let offset = Self::month_offset(date.year()).ok_or_else(|| GenerateError::InvalidRange {
            what: "pesel",
            detail: format!("birth year {} is outside 1800..=2299", date.year()),
        })?;

        let yy = date.year().rem_euclid(100) as u32;
        let mm = date.month() + offset;
        let dd = date.day();
        let mut digits = vec![yy / 10, yy % 10, mm / 10, mm % 10, dd / 10, dd % 10];
        for _ in 0..3 {
            digits.push(random.int_range(0, 9) as u32);
        }
        let sex = match self.sex {
            Some(sex) => sex,
            None if random.bool() => Sex::Male,
            None => Sex::Female,
        };
        let base = random.int_range(0, 4) as u32 * 2;
        digits.push(match sex {
            Sex::Male => base + 1,
            Sex::Female => base,
        });
        digits.push(Self::check_digit(&digits));

        Ok(Value::Str(
            digits
                .iter()
                .filter_map(|d| char::from_digit(*d, 10))
                .collect(),
        ))
    }

    fn hints(&self) -> Hints {
        value_hints(self.nullable)
    }

    fn target_type(&self) -> Option<TypeKey> {
        Some(TypeKey::string())
    }

    fn name(&self) -> &str {
        "pesel()"
    }
}
