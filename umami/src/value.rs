//! Caller-owned storage cells and typed value conversion.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};

/// A shared, caller-owned cell an option writes into.
///
/// The caller keeps one handle and gives a clone to the option table; the
/// engine only ever writes through its clone.
pub struct Slot<T>(Rc<RefCell<T>>);

impl<T> Slot<T> {
    pub fn new(value: T) -> Self {
        Slot(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Whether both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Slot<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Slot<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Slot::new(T::default())
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Slot(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.0.borrow()).finish()
    }
}

/// Snapshot of a destination's content.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Flag(bool),
    Text(String),
    Enum(i32),
    Float(f32),
    Int(i32),
    Uint(u32),
    U8(u8),
    U16(u16),
    U64(u64),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Flag(_) => "bool",
            Value::Text(_) => "String",
            Value::Enum(_) | Value::Int(_) => "i32",
            Value::Float(_) => "f32",
            Value::Uint(_) => "u32",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U64(_) => "u64",
        }
    }
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Flag(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Uint(self)
    }
}

impl IntoValue for u8 {
    fn into_value(self) -> Value {
        Value::U8(self)
    }
}

impl IntoValue for u16 {
    fn into_value(self) -> Value {
        Value::U16(self)
    }
}

impl IntoValue for u64 {
    fn into_value(self) -> Value {
        Value::U64(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Result<Self>;
}

fn mismatch<T>(expected: &'static str, v: &Value) -> Result<T> {
    Err(Error::TypeMismatch {
        expected,
        found: v.type_name(),
    })
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Flag(b) => Ok(*b),
            _ => mismatch("bool", v),
        }
    }
}

impl FromValue for i32 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Int(n) | Value::Enum(n) => Ok(*n),
            Value::Flag(b) => Ok(i32::from(*b)),
            _ => mismatch("i32", v),
        }
    }
}

impl FromValue for u32 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Uint(n) => Ok(*n),
            _ => mismatch("u32", v),
        }
    }
}

impl FromValue for u8 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::U8(n) => Ok(*n),
            _ => mismatch("u8", v),
        }
    }
}

impl FromValue for u16 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::U16(n) => Ok(*n),
            _ => mismatch("u16", v),
        }
    }
}

impl FromValue for u64 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::U64(n) => Ok(*n),
            _ => mismatch("u64", v),
        }
    }
}

impl FromValue for f32 {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Float(n) => Ok(*n),
            _ => mismatch("f32", v),
        }
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::Text(s) => Ok(s.clone()),
            _ => mismatch("String", v),
        }
    }
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Result<Self> {
        Ok(v.clone())
    }
}

/// Copy `text` truncated to at most `capacity` characters.
pub fn bounded(text: &str, capacity: usize) -> String {
    text.chars().take(capacity).collect()
}

// ============================================================================
// Legacy numeric decoding
// ============================================================================
//
// These follow the C library routines the engine historically used: leading
// whitespace is skipped, the longest valid prefix is converted, anything
// unparseable yields zero, and the result is truncated to the target width.

fn digits_prefix(text: &str, radix: u32) -> (bool, u128) {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let s = if radix == 16 {
        s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s)
    } else {
        s
    };
    let mut acc: u128 = 0;
    for c in s.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc.saturating_mul(radix as u128).saturating_add(d as u128),
            None => break,
        }
    }
    (negative, acc)
}

/// `atoi`-style decimal conversion, two's-complement truncated to 64 bits.
pub fn lenient_decimal(text: &str) -> i64 {
    let (negative, acc) = digits_prefix(text, 10);
    let v = acc as i64;
    if negative {
        v.wrapping_neg()
    } else {
        v
    }
}

/// `strtoul(.., 16)`-style conversion.
pub fn lenient_hex(text: &str) -> u64 {
    let (negative, acc) = digits_prefix(text, 16);
    let v = acc as u64;
    if negative {
        v.wrapping_neg()
    } else {
        v
    }
}

/// `atof`-style conversion: the longest prefix that parses as a float.
pub fn lenient_float(text: &str) -> f32 {
    let s = text.trim_start();
    (1..=s.len())
        .rev()
        .filter(|&end| s.is_char_boundary(end))
        .find_map(|end| s[..end].parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Strict hexadecimal conversion accepting an optional `0x` prefix.
pub fn strict_hex<T>(
    text: &str,
    from_str_radix: fn(&str, u32) -> std::result::Result<T, std::num::ParseIntError>,
) -> Option<T> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    from_str_radix(digits, 16).ok()
}
