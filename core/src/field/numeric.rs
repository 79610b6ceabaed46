//! Integer and float fields.
//!
//! Both kinds share [`NumericRules`]: optional inclusive bounds, an optional
//! sign requirement and an optional list of inclusive ranges. Every rule is
//! an `Option`, so a bound of zero and no bound at all stay distinct.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{missing, mismatch};
use crate::kind::FieldKind;
use crate::violation::{Bound, ViolationKind, Violations};

/// Sign requirement. Zero satisfies both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

/// Inclusive `[start, end]` interval. A range with `start > end` never
/// matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange<T> {
    pub start: T,
    pub end: T,
}

/// Number types a [`NumericRules`] can hold.
pub trait Numeric: Copy + PartialOrd + Into<Bound> {
    const ZERO: Self;
}

impl Numeric for i64 {
    const ZERO: Self = 0;
}

impl Numeric for f64 {
    const ZERO: Self = 0.0;
}

/// Constraint state shared by integer and float fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRules<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub sign: Option<Sign>,
    /// `Some(vec![])` is an active constraint that nothing satisfies.
    pub ranges: Option<Vec<NumericRange<T>>>,
}

impl<T> Default for NumericRules<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            sign: None,
            ranges: None,
        }
    }
}

impl<T: Numeric> NumericRules<T> {
    /// Appends a range, enabling the range constraint.
    pub fn add_range(&mut self, start: T, end: T) {
        self.ranges
            .get_or_insert_with(Vec::new)
            .push(NumericRange { start, end });
    }

    /// Runs every configured rule against `value`, collecting all failures.
    ///
    /// `value` may be wider than the rule type, so inputs outside the range
    /// of `T` still compare correctly against its bounds.
    pub fn check<V>(&self, field: &str, value: V, violations: &mut Violations)
    where
        V: PartialOrd + From<T>,
    {
        match self.sign {
            Some(Sign::Positive) if value < V::from(T::ZERO) => {
                violations.push(field, ViolationKind::NotPositive);
            }
            Some(Sign::Negative) if value > V::from(T::ZERO) => {
                violations.push(field, ViolationKind::NotNegative);
            }
            _ => {}
        }

        if let Some(min) = self.min {
            if value < V::from(min) {
                violations.push(field, ViolationKind::BelowMinimum(min.into()));
            }
        }

        if let Some(max) = self.max {
            if value > V::from(max) {
                violations.push(field, ViolationKind::AboveMaximum(max.into()));
            }
        }

        if let Some(ranges) = &self.ranges {
            let inside = |range: &NumericRange<T>| {
                value >= V::from(range.start) && value <= V::from(range.end)
            };
            if !ranges.iter().any(inside) {
                violations.push(
                    field,
                    ViolationKind::OutOfRanges(
                        ranges
                            .iter()
                            .map(|range| (range.start.into(), range.end.into()))
                            .collect(),
                    ),
                );
            }
        }
    }
}

/// Validates whole numbers.
///
/// # Examples
///
/// ```
/// use fieldcheck_core::IntegerField;
/// use serde_json::json;
///
/// let age = IntegerField::new("age").required().range(0, 20).range(50, 60);
/// assert!(age.validate(&json!(10)).is_empty());
/// assert!(age.validate(&json!(55)).is_empty());
/// assert_eq!(age.validate(&json!(30)).len(), 1);
/// assert_eq!(age.validate(&json!(null)).len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerField {
    name: String,
    required: bool,
    rules: NumericRules<i64>,
}

impl IntegerField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            rules: NumericRules::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, min: i64) -> Self {
        self.rules.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, max: i64) -> Self {
        self.rules.max = Some(max);
        self
    }

    pub fn positive(mut self) -> Self {
        self.rules.sign = Some(Sign::Positive);
        self
    }

    pub fn negative(mut self) -> Self {
        self.rules.sign = Some(Sign::Negative);
        self
    }

    /// Adds an inclusive range. Repeatable; the value must fall in at least
    /// one of them.
    pub fn range(mut self, start: i64, end: i64) -> Self {
        self.rules.add_range(start, end);
        self
    }

    /// Replaces every numeric rule at once.
    pub fn with_rules(mut self, rules: NumericRules<i64>) -> Self {
        self.rules = rules;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn rules(&self) -> &NumericRules<i64> {
        &self.rules
    }

    pub fn validate(&self, value: &Value) -> Violations {
        if value.is_null() {
            return missing(&self.name, self.required);
        }
        let Some(number) = as_wide_whole_number(value) else {
            return mismatch(&self.name, FieldKind::Integer, value);
        };

        let mut violations = Violations::new();
        self.rules.check(&self.name, number, &mut violations);
        violations
    }
}

/// Coerces a JSON number with no fractional part to `i128`.
///
/// Every `u64` fits exactly. Whole floats beyond `i128` saturate, which still
/// lies outside any `i64` bound.
fn as_wide_whole_number(value: &Value) -> Option<i128> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n.into());
    }
    if let Some(n) = number.as_u64() {
        return Some(n.into());
    }
    number
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i128)
}

/// Coerces a JSON number with no fractional part to `i64`, or `None` when it
/// does not fit.
pub(crate) fn as_whole_number(value: &Value) -> Option<i64> {
    as_wide_whole_number(value).and_then(|n| i64::try_from(n).ok())
}

/// Validates any JSON number.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatField {
    name: String,
    required: bool,
    rules: NumericRules<f64>,
}

impl FloatField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            rules: NumericRules::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inclusive lower bound. Like every float bound, it should be finite:
    /// NaN and infinities have no schema document form.
    pub fn min(mut self, min: f64) -> Self {
        self.rules.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.rules.max = Some(max);
        self
    }

    pub fn positive(mut self) -> Self {
        self.rules.sign = Some(Sign::Positive);
        self
    }

    pub fn negative(mut self) -> Self {
        self.rules.sign = Some(Sign::Negative);
        self
    }

    pub fn range(mut self, start: f64, end: f64) -> Self {
        self.rules.add_range(start, end);
        self
    }

    /// Replaces every numeric rule at once.
    pub fn with_rules(mut self, rules: NumericRules<f64>) -> Self {
        self.rules = rules;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn rules(&self) -> &NumericRules<f64> {
        &self.rules
    }

    pub fn validate(&self, value: &Value) -> Violations {
        if value.is_null() {
            return missing(&self.name, self.required);
        }
        let Some(number) = value.as_f64() else {
            return mismatch(&self.name, FieldKind::Float, value);
        };

        let mut violations = Violations::new();
        self.rules.check(&self.name, number, &mut violations);
        violations
    }
}
