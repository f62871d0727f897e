use std::fmt;

use crate::{
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    stack::Stack,
};

/// Runtime tag of a [`Value`], used by operators that pick an implementation
/// by peeking at the stack before popping anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Double,
    Long,
    Char,
    String,
    Array,
    Block,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Double => "Double",
            ValueType::Long => "Long",
            ValueType::Char => "Char",
            ValueType::String => "String",
            ValueType::Array => "Array",
            ValueType::Block => "Block",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Double | ValueType::Long | ValueType::Char)
    }
}

/// A single stack entry.
///
/// Every payload is exclusively owned: cloning a `Value` is a deep copy and
/// dropping one releases its buffers and nested stacks exactly once.
#[derive(Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Long(i64),
    Char(char),
    String(String),
    Array(Stack),
    /// Unevaluated source text captured between `{` and `}`.
    Block(String),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn block(source: impl Into<String>) -> Self {
        Value::Block(source.into())
    }

    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Stack::from(values))
    }

    pub fn bool(value: bool) -> Self {
        Value::Long(i64::from(value))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Double(_) => ValueType::Double,
            Value::Long(_) => ValueType::Long,
            Value::Char(_) => ValueType::Char,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Block(_) => ValueType::Block,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Deep copy: strings and blocks get a fresh buffer, arrays are copied
    /// element by element.
    pub fn duplicate(&self) -> Value {
        self.clone()
    }

    /// A block is truthy when its source is blank. This mirrors the
    /// language as it was authored and is the opposite of the string rule.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Long(n) => *n != 0,
            Value::Char(c) => *c != '\0',
            Value::Double(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(values) => !values.is_empty(),
            Value::Block(source) => source.chars().all(char::is_whitespace),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            Value::Double(n) => Ok(*n),
            Value::Long(n) => Ok(*n as f64),
            Value::Char(c) => Ok(f64::from(u32::from(*c))),
            Value::String(text) => parse_double(text).ok_or_else(|| {
                StackGolfError::new(
                    DiagnosticKind::TypeConversionError,
                    format!("cannot convert string \"{text}\" to Double"),
                )
            }),
            other => Err(conversion_error(other, "Double")),
        }
    }

    pub fn as_long(&self) -> Result<i64> {
        match self {
            Value::Double(n) => Ok(*n as i64),
            Value::Long(n) => Ok(*n),
            Value::Char(c) => Ok(i64::from(u32::from(*c))),
            Value::String(text) => parse_long(text).ok_or_else(|| {
                StackGolfError::new(
                    DiagnosticKind::TypeConversionError,
                    format!("cannot convert string \"{text}\" to Long"),
                )
            }),
            other => Err(conversion_error(other, "Long")),
        }
    }

    /// Conversion used by the `c` operator: numbers become code points, a
    /// numeric string is read as a code point, any other string yields its
    /// first character.
    pub fn as_char(&self) -> Result<char> {
        match self {
            Value::Char(c) => Ok(*c),
            Value::Double(n) => code_point(*n as i64),
            Value::Long(n) => code_point(*n),
            Value::String(text) => match parse_long(text) {
                Some(n) => code_point(n),
                None => text.chars().next().ok_or_else(|| {
                    StackGolfError::new(
                        DiagnosticKind::TypeConversionError,
                        "cannot convert empty string to Char",
                    )
                }),
            },
            other => Err(conversion_error(other, "Char")),
        }
    }

    /// Textual form used by `s` and string concatenation. Unlike the output
    /// rendering, blocks appear without their braces.
    pub fn to_text(&self) -> String {
        match self {
            Value::Block(source) => source.clone(),
            Value::Array(values) => values.iter().map(Value::to_text).collect(),
            other => other.to_string(),
        }
    }
}

pub(crate) fn code_point(n: i64) -> Result<char> {
    u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| {
            StackGolfError::new(
                DiagnosticKind::TypeConversionError,
                format!("{n} is not a valid character code point"),
            )
        })
}

fn conversion_error(value: &Value, target: &str) -> StackGolfError {
    StackGolfError::new(
        DiagnosticKind::TypeConversionError,
        format!("cannot convert {} to {target}", value.type_name()),
    )
}

/// Whole-text base 10 integer, as accepted for literals and conversions.
pub fn parse_long(text: &str) -> Option<i64> {
    text.trim_start().parse().ok()
}

/// Whole-text floating point number (`1.5`, `.5`, `1e3`, `inf`, ...).
pub fn parse_double(text: &str) -> Option<f64> {
    text.trim_start().parse().ok()
}

/// Program output rendering: no separators, blocks re-wrapped in braces.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Double(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(values) => {
                for value in values.iter() {
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Value::Block(source) => write!(f, "{{{source}}}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Double(n) => write!(f, "{n:?}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(values) => f.debug_list().entries(values.iter()).finish(),
            Value::Block(source) => write!(f, "{{{source}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_type_rules() {
        assert!(Value::Long(3).is_truthy());
        assert!(!Value::Long(0).is_truthy());
        assert!(!Value::Char('\0').is_truthy());
        assert!(Value::Double(0.5).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::array(vec![Value::Long(0)]).is_truthy());
        assert!(!Value::array(Vec::new()).is_truthy());
    }

    #[test]
    fn blank_blocks_are_truthy() {
        assert!(Value::block("").is_truthy());
        assert!(Value::block("  \t").is_truthy());
        assert!(!Value::block("1+").is_truthy());
    }

    #[test]
    fn duplicate_does_not_alias_nested_arrays() {
        let original = Value::array(vec![
            Value::string("abc"),
            Value::array(vec![Value::Long(1), Value::block("2*")]),
        ]);
        let mut copy = original.duplicate();
        if let Value::Array(outer) = &mut copy {
            if let Value::String(text) = &mut outer.as_mut_slice()[0] {
                text.push('!');
            }
            if let Value::Array(inner) = &mut outer.as_mut_slice()[1] {
                inner.push(Value::Long(99));
            }
        }
        assert_eq!(format!("{original:?}"), "[\"abc\", [1, {2*}]]");
        assert_eq!(format!("{copy:?}"), "[\"abc!\", [1, {2*}, 99]]");
    }

    #[test]
    fn numeric_coercions_parse_strings() {
        assert_eq!(Value::string("42").as_long().unwrap(), 42);
        assert_eq!(Value::string("2.5").as_double().unwrap(), 2.5);
        assert_eq!(Value::Char('a').as_long().unwrap(), 97);
        assert_eq!(Value::Double(3.9).as_long().unwrap(), 3);
        let err = Value::string("abc").as_long().unwrap_err();
        assert_eq!(err.kind(), Some(DiagnosticKind::TypeConversionError));
        let err = Value::block("1").as_double().unwrap_err();
        assert_eq!(err.kind(), Some(DiagnosticKind::TypeConversionError));
    }

    #[test]
    fn char_conversion_prefers_numeric_strings() {
        assert_eq!(Value::string("65").as_char().unwrap(), 'A');
        assert_eq!(Value::string("xyz").as_char().unwrap(), 'x');
        assert_eq!(Value::Long(98).as_char().unwrap(), 'b');
        assert!(Value::Long(-1).as_char().is_err());
    }

    #[test]
    fn rendering_concatenates_without_separators() {
        let value = Value::array(vec![
            Value::Long(1),
            Value::Char('x'),
            Value::array(vec![Value::string("ab"), Value::Double(2.5)]),
            Value::block(" 1 + "),
        ]);
        assert_eq!(value.to_string(), "1xab2.5{ 1 + }");
        assert_eq!(value.to_text(), "1xab2.5 1 + ");
    }
}
