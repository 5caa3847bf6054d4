//! Scalar values with provenance.
//!
//! Every figure the engine displays is a [`ScalarValue`]: a number bundled
//! with an optional display name and the values it was derived from. The
//! derivation tree lets any total be re-explained ("show your work") without
//! re-running the calculation.

use core::fmt;

/// Arithmetic operation that produced a derived [`ScalarValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Percentage,
    Floor,
    Ceil,
    Min,
    Max,
}

/// A number with a display name and a provenance tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarValue {
    value: f64,
    name: Option<String>,
    operation: Option<Operation>,
    sources: Vec<ScalarValue>,
}

impl ScalarValue {
    /// Creates an unnamed literal.
    pub fn literal(value: f64) -> Self {
        Self {
            value,
            name: None,
            operation: None,
            sources: Vec::new(),
        }
    }

    /// Creates a named literal.
    pub fn named(value: f64, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::literal(value)
        }
    }

    /// Creates a zero literal.
    pub fn zero() -> Self {
        Self::literal(0.0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    /// Values this one was derived from, in operand order.
    pub fn sources(&self) -> &[ScalarValue] {
        &self.sources
    }

    /// Returns the same value under a new display name, keeping its provenance.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn derive(value: f64, operation: Operation, sources: Vec<ScalarValue>) -> Self {
        Self {
            value,
            name: None,
            operation: Some(operation),
            sources,
        }
    }

    pub fn add(&self, rhs: &ScalarValue) -> ScalarValue {
        Self::derive(
            self.value + rhs.value,
            Operation::Add,
            vec![self.clone(), rhs.clone()],
        )
    }

    pub fn subtract(&self, rhs: &ScalarValue) -> ScalarValue {
        Self::derive(
            self.value - rhs.value,
            Operation::Subtract,
            vec![self.clone(), rhs.clone()],
        )
    }

    pub fn multiply(&self, rhs: &ScalarValue) -> ScalarValue {
        Self::derive(
            self.value * rhs.value,
            Operation::Multiply,
            vec![self.clone(), rhs.clone()],
        )
    }

    /// Divides by `rhs`. Division by zero yields zero rather than infinity so
    /// that a missing baseline never poisons a whole total.
    pub fn divide(&self, rhs: &ScalarValue) -> ScalarValue {
        let value = if rhs.value == 0.0 {
            0.0
        } else {
            self.value / rhs.value
        };
        Self::derive(value, Operation::Divide, vec![self.clone(), rhs.clone()])
    }

    /// `percent`% of this value.
    pub fn percentage(&self, percent: &ScalarValue) -> ScalarValue {
        Self::derive(
            self.value * percent.value / 100.0,
            Operation::Percentage,
            vec![self.clone(), percent.clone()],
        )
    }

    pub fn floor(&self) -> ScalarValue {
        Self::derive(self.value.floor(), Operation::Floor, vec![self.clone()])
    }

    pub fn ceil(&self) -> ScalarValue {
        Self::derive(self.value.ceil(), Operation::Ceil, vec![self.clone()])
    }

    pub fn min(&self, rhs: &ScalarValue) -> ScalarValue {
        Self::derive(
            self.value.min(rhs.value),
            Operation::Min,
            vec![self.clone(), rhs.clone()],
        )
    }

    pub fn max(&self, rhs: &ScalarValue) -> ScalarValue {
        Self::derive(
            self.value.max(rhs.value),
            Operation::Max,
            vec![self.clone(), rhs.clone()],
        )
    }

    /// One-line formula for this value: its name if it has one, otherwise the
    /// operation applied to its sources.
    pub fn describe(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let Some(operation) = self.operation else {
            return format_number(self.value);
        };
        let operand = |index: usize| {
            self.sources
                .get(index)
                .map(ScalarValue::describe)
                .unwrap_or_default()
        };
        match operation {
            Operation::Add => format!("({} + {})", operand(0), operand(1)),
            Operation::Subtract => format!("({} - {})", operand(0), operand(1)),
            Operation::Multiply => format!("({} x {})", operand(0), operand(1)),
            Operation::Divide => format!("({} / {})", operand(0), operand(1)),
            Operation::Percentage => format!("({}% of {})", operand(1), operand(0)),
            Operation::Floor => format!("floor({})", operand(0)),
            Operation::Ceil => format!("ceil({})", operand(0)),
            Operation::Min => format!("min({}, {})", operand(0), operand(1)),
            Operation::Max => format!("max({}, {})", operand(0), operand(1)),
        }
    }

    /// Multi-line explanation of how this value was calculated.
    ///
    /// Each named value gets its own line, indented under the value that
    /// consumed it.
    ///
    /// ```
    /// # use construction_core::ScalarValue;
    /// let base = ScalarValue::named(50.0, "Receiver");
    /// let markup = ScalarValue::named(10.0, "Markup");
    /// let total = base.add(&base.percentage(&markup)).renamed("Credits");
    /// assert_eq!(
    ///     total.explain(),
    ///     "Credits = 55 = (Receiver + (Markup% of Receiver))\n  Receiver = 50\n  Markup = 10\n"
    /// );
    /// ```
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match (&self.name, self.operation) {
            (Some(name), Some(_)) => {
                let formula = Self {
                    name: None,
                    ..self.clone()
                }
                .describe();
                out.push_str(&format!(
                    "{indent}{name} = {} = {formula}\n",
                    format_number(self.value)
                ));
            }
            (Some(name), None) => {
                out.push_str(&format!("{indent}{name} = {}\n", format_number(self.value)));
            }
            (None, _) if depth == 0 => {
                out.push_str(&format!(
                    "{} = {}\n",
                    self.describe(),
                    format_number(self.value)
                ));
            }
            (None, _) => {}
        }

        let mut named = Vec::new();
        collect_named_sources(self, &mut named);
        let mut seen: Vec<&ScalarValue> = Vec::new();
        for source in named {
            if seen.iter().any(|other| *other == source) {
                continue;
            }
            seen.push(source);
            source.explain_into(out, depth + 1);
        }
    }
}

/// Gathers the nearest named descendants of `value` (looking through unnamed
/// intermediate results).
fn collect_named_sources<'a>(value: &'a ScalarValue, out: &mut Vec<&'a ScalarValue>) {
    for source in &value.sources {
        if source.name.is_some() {
            out.push(source);
        } else {
            collect_named_sources(source, out);
        }
    }
}

impl Default for ScalarValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        Self::literal(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        Self::literal(f64::from(value))
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_number(self.value))
    }
}

/// Formats a number for display: integers without a fractional part, other
/// values with at most two decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Formats a number with an explicit sign.
pub fn format_signed(value: f64) -> String {
    if value < 0.0 {
        format_number(value)
    } else {
        format!("+{}", format_number(value))
    }
}

/// A Traveller-style dice expression: `count`D6 plus a constant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceRoll {
    count: i32,
    constant: i32,
}

impl DiceRoll {
    pub const fn new(count: i32, constant: i32) -> Self {
        Self { count, constant }
    }

    pub const fn count(&self) -> i32 {
        self.count
    }

    pub const fn constant(&self) -> i32 {
        self.constant
    }

    /// Adds dice and a constant.
    #[must_use]
    pub const fn adjusted(&self, count: i32, constant: i32) -> Self {
        Self {
            count: self.count + count,
            constant: self.constant + constant,
        }
    }

    /// Average result of the roll (3.5 per die).
    pub fn average(&self) -> f64 {
        f64::from(self.count) * 3.5 + f64::from(self.constant)
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.count, self.constant) {
            (0, constant) => write!(f, "{constant}"),
            (count, 0) => write!(f, "{count}D"),
            (count, constant) if constant > 0 => write!(f, "{count}D+{constant}"),
            (count, constant) => write!(f, "{count}D{constant}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_records_provenance() {
        let a = ScalarValue::named(10.0, "Base");
        let b = ScalarValue::literal(2.0);
        let product = a.multiply(&b);

        assert_eq!(product.value(), 20.0);
        assert_eq!(product.operation(), Some(Operation::Multiply));
        assert_eq!(product.sources().len(), 2);
        assert_eq!(product.describe(), "(Base x 2)");
    }

    #[test]
    fn percentage_and_rounding() {
        let base = ScalarValue::literal(125.0);
        let pct = base.percentage(&ScalarValue::literal(10.0));
        assert_eq!(pct.value(), 12.5);
        assert_eq!(pct.floor().value(), 12.0);
        assert_eq!(pct.ceil().value(), 13.0);
    }

    #[test]
    fn divide_by_zero_is_zero() {
        let value = ScalarValue::literal(5.0).divide(&ScalarValue::zero());
        assert_eq!(value.value(), 0.0);
    }

    #[test]
    fn rename_keeps_sources() {
        let sum = ScalarValue::literal(1.0).add(&ScalarValue::literal(2.0));
        let renamed = sum.renamed("Total");
        assert_eq!(renamed.name(), Some("Total"));
        assert_eq!(renamed.sources().len(), 2);
        assert_eq!(renamed.value(), 3.0);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(55.0), "55");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.126), "0.13");
        assert_eq!(format_signed(2.0), "+2");
        assert_eq!(format_signed(-0.5), "-0.5");
    }

    #[test]
    fn dice_display() {
        assert_eq!(DiceRoll::new(3, 0).to_string(), "3D");
        assert_eq!(DiceRoll::new(2, 2).to_string(), "2D+2");
        assert_eq!(DiceRoll::new(1, -1).to_string(), "1D-1");
        assert_eq!(DiceRoll::new(0, 4).to_string(), "4");
        assert_eq!(DiceRoll::new(3, 1).adjusted(1, -2), DiceRoll::new(4, -1));
    }
}
