//! Option descriptors and their destinations.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::group::GroupId;
use crate::value::{
    bounded, lenient_decimal, lenient_float, lenient_hex, strict_hex, Slot, Value,
};

/// Maximum number of characters a string option keeps by default.
pub const MAX_PARSED_STRING_LEN: usize = 1023;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    None,
    Required,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::None => write!(f, "NO_ARGUMENT"),
            ArgKind::Required => write!(f, "REQUIRED_ARGUMENT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Flag,
    String,
    /// Stored as the given number plus one; zero means "unset".
    Enum,
    Float,
    Int,
    Uint,
    Uint32,
    Uint64,
    HexUint8,
    HexUint16,
    HexUint32,
    HexUint64,
    Function,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Flag => "FLAG",
            ValueKind::String => "STRING",
            ValueKind::Enum => "ENUM",
            ValueKind::Float => "FLOAT",
            ValueKind::Int => "INT",
            ValueKind::Uint => "UINT",
            ValueKind::Uint32 => "UINT32",
            ValueKind::Uint64 => "UINT64",
            ValueKind::HexUint8 => "HEXUINT8",
            ValueKind::HexUint16 => "HEXUINT16",
            ValueKind::HexUint32 => "HEXUINT32",
            ValueKind::HexUint64 => "HEXUINT64",
            ValueKind::Function => "FUNC_PTR",
        }
    }

    /// Whether options of this kind are written without a value.
    pub fn is_valueless(self) -> bool {
        matches!(self, ValueKind::Flag | ValueKind::Function)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a handler an option dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(&'static str);

impl HandlerId {
    pub const fn new(name: &'static str) -> Self {
        HandlerId(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// How argument text that is not a valid number is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoding {
    /// Malformed or out-of-range text is an [`Error::BadValue`].
    #[default]
    Strict,
    /// The longest numeric prefix is used, truncated to the destination
    /// width; text without one decodes as zero.
    Lenient,
}

// ============================================================================
// Destination
// ============================================================================

#[derive(Debug, Clone)]
pub enum Destination {
    Flag(Slot<bool>),
    Text { slot: Slot<String>, capacity: usize },
    Enum(Slot<i32>),
    Float(Slot<f32>),
    Int(Slot<i32>),
    Uint(Slot<u32>),
    Uint32(Slot<u32>),
    Uint64(Slot<u64>),
    Hex8(Slot<u8>),
    Hex16(Slot<u16>),
    Hex32(Slot<u32>),
    Hex64(Slot<u64>),
    Handler(HandlerId),
}

impl Destination {
    /// The value kind this destination can receive.
    pub fn kind(&self) -> ValueKind {
        match self {
            Destination::Flag(_) => ValueKind::Flag,
            Destination::Text { .. } => ValueKind::String,
            Destination::Enum(_) => ValueKind::Enum,
            Destination::Float(_) => ValueKind::Float,
            Destination::Int(_) => ValueKind::Int,
            Destination::Uint(_) => ValueKind::Uint,
            Destination::Uint32(_) => ValueKind::Uint32,
            Destination::Uint64(_) => ValueKind::Uint64,
            Destination::Hex8(_) => ValueKind::HexUint8,
            Destination::Hex16(_) => ValueKind::HexUint16,
            Destination::Hex32(_) => ValueKind::HexUint32,
            Destination::Hex64(_) => ValueKind::HexUint64,
            Destination::Handler(_) => ValueKind::Function,
        }
    }

    pub(crate) fn holds(&self) -> &'static str {
        match self {
            Destination::Flag(_) => "a bool",
            Destination::Text { .. } => "a string",
            Destination::Enum(_) | Destination::Int(_) => "an i32",
            Destination::Float(_) => "an f32",
            Destination::Uint(_) | Destination::Uint32(_) | Destination::Hex32(_) => "a u32",
            Destination::Uint64(_) | Destination::Hex64(_) => "a u64",
            Destination::Hex8(_) => "a u8",
            Destination::Hex16(_) => "a u16",
            Destination::Handler(_) => "a handler",
        }
    }

    pub fn handler(&self) -> Option<HandlerId> {
        match self {
            Destination::Handler(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether both destinations write into the same cell (or select the
    /// same handler).
    pub fn same_target(&self, other: &Destination) -> bool {
        use Destination as D;
        match (self, other) {
            (D::Flag(a), D::Flag(b)) => a.ptr_eq(b),
            (D::Text { slot: a, .. }, D::Text { slot: b, .. }) => a.ptr_eq(b),
            (D::Enum(a), D::Enum(b)) | (D::Int(a), D::Int(b)) => a.ptr_eq(b),
            (D::Float(a), D::Float(b)) => a.ptr_eq(b),
            (D::Uint(a), D::Uint(b))
            | (D::Uint32(a), D::Uint32(b))
            | (D::Hex32(a), D::Hex32(b)) => a.ptr_eq(b),
            (D::Uint64(a), D::Uint64(b)) | (D::Hex64(a), D::Hex64(b)) => a.ptr_eq(b),
            (D::Hex8(a), D::Hex8(b)) => a.ptr_eq(b),
            (D::Hex16(a), D::Hex16(b)) => a.ptr_eq(b),
            (D::Handler(a), D::Handler(b)) => a == b,
            _ => false,
        }
    }

    /// Decode `text` and write it through the destination.
    ///
    /// Handlers are not written; the dispatch loop records them.
    pub(crate) fn assign(
        &self,
        option: &str,
        text: Option<&str>,
        decoding: Decoding,
    ) -> Result<()> {
        let text = text.unwrap_or("");
        let kind = self.kind();
        let bad = || Error::BadValue {
            option: option.to_string(),
            kind,
            text: text.to_string(),
        };
        let lenient = decoding == Decoding::Lenient;

        match self {
            Destination::Flag(slot) => slot.set(true),
            Destination::Text { slot, capacity } => slot.set(bounded(text, *capacity)),
            Destination::Enum(slot) => {
                let n = if lenient {
                    (lenient_decimal(text) as i32).wrapping_add(1)
                } else {
                    parse::<i32>(text)
                        .and_then(|n| n.checked_add(1))
                        .ok_or_else(bad)?
                };
                slot.set(n);
            }
            Destination::Float(slot) => {
                let v = if lenient {
                    lenient_float(text)
                } else {
                    parse::<f32>(text).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Int(slot) => {
                let v = if lenient {
                    lenient_decimal(text) as i32
                } else {
                    parse::<i32>(text).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Uint(slot) | Destination::Uint32(slot) => {
                let v = if lenient {
                    lenient_decimal(text) as u32
                } else {
                    parse::<u32>(text).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Uint64(slot) => {
                let v = if lenient {
                    lenient_decimal(text) as u64
                } else {
                    parse::<u64>(text).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Hex8(slot) => {
                let v = if lenient {
                    lenient_hex(text) as u8
                } else {
                    strict_hex(text, u8::from_str_radix).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Hex16(slot) => {
                let v = if lenient {
                    lenient_hex(text) as u16
                } else {
                    strict_hex(text, u16::from_str_radix).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Hex32(slot) => {
                let v = if lenient {
                    lenient_hex(text) as u32
                } else {
                    strict_hex(text, u32::from_str_radix).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Hex64(slot) => {
                let v = if lenient {
                    lenient_hex(text)
                } else {
                    strict_hex(text, u64::from_str_radix).ok_or_else(bad)?
                };
                slot.set(v);
            }
            Destination::Handler(_) => {}
        }
        Ok(())
    }

    /// Current content, or `None` for handler destinations.
    pub fn load(&self) -> Option<Value> {
        Some(match self {
            Destination::Flag(s) => Value::Flag(s.get()),
            Destination::Text { slot, .. } => Value::Text(slot.get()),
            Destination::Enum(s) => Value::Enum(s.get()),
            Destination::Float(s) => Value::Float(s.get()),
            Destination::Int(s) => Value::Int(s.get()),
            Destination::Uint(s) | Destination::Uint32(s) | Destination::Hex32(s) => {
                Value::Uint(s.get())
            }
            Destination::Uint64(s) | Destination::Hex64(s) => Value::U64(s.get()),
            Destination::Hex8(s) => Value::U8(s.get()),
            Destination::Hex16(s) => Value::U16(s.get()),
            Destination::Handler(_) => return None,
        })
    }

    /// Overwrite the content with an already-typed value.
    pub fn store(&self, value: Value) -> Result<()> {
        match (self, value) {
            (Destination::Flag(s), Value::Flag(b)) => s.set(b),
            (Destination::Text { slot, capacity }, Value::Text(t)) => {
                slot.set(bounded(&t, *capacity))
            }
            (Destination::Enum(s), Value::Enum(n) | Value::Int(n)) => s.set(n),
            (Destination::Float(s), Value::Float(v)) => s.set(v),
            (Destination::Int(s), Value::Int(n)) => s.set(n),
            (
                Destination::Uint(s) | Destination::Uint32(s) | Destination::Hex32(s),
                Value::Uint(n),
            ) => s.set(n),
            (Destination::Uint64(s) | Destination::Hex64(s), Value::U64(n)) => s.set(n),
            (Destination::Hex8(s), Value::U8(n)) => s.set(n),
            (Destination::Hex16(s), Value::U16(n)) => s.set(n),
            (dest, value) => {
                return Err(Error::TypeMismatch {
                    expected: dest.holds(),
                    found: value.type_name(),
                })
            }
        }
        Ok(())
    }
}

fn parse<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

// ============================================================================
// Opt — option descriptor builder
// ============================================================================

#[derive(Debug, Clone)]
pub struct Opt {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) arg: ArgKind,
    pub(crate) kind: ValueKind,
    pub(crate) destination: Option<Destination>,
    pub(crate) defined: Option<Slot<bool>>,
    pub(crate) linked: Option<GroupId>,
}

impl Opt {
    /// A bare descriptor: no argument, flag kind, no destination.
    pub fn new(name: &str) -> Self {
        Opt {
            name: name.to_string(),
            description: String::new(),
            arg: ArgKind::None,
            kind: ValueKind::Flag,
            destination: None,
            defined: None,
            linked: None,
        }
    }

    fn bound(name: &str, destination: Destination) -> Self {
        let kind = destination.kind();
        Opt::new(name)
            .kind(kind)
            .arg(if kind.is_valueless() {
                ArgKind::None
            } else {
                ArgKind::Required
            })
            .bind(destination)
    }

    pub fn flag(name: &str, slot: &Slot<bool>) -> Self {
        Opt::bound(name, Destination::Flag(slot.clone()))
    }

    pub fn string(name: &str, slot: &Slot<String>, capacity: usize) -> Self {
        Opt::bound(
            name,
            Destination::Text {
                slot: slot.clone(),
                capacity,
            },
        )
    }

    pub fn enumeration(name: &str, slot: &Slot<i32>) -> Self {
        Opt::bound(name, Destination::Enum(slot.clone()))
    }

    pub fn float(name: &str, slot: &Slot<f32>) -> Self {
        Opt::bound(name, Destination::Float(slot.clone()))
    }

    pub fn int(name: &str, slot: &Slot<i32>) -> Self {
        Opt::bound(name, Destination::Int(slot.clone()))
    }

    pub fn uint(name: &str, slot: &Slot<u32>) -> Self {
        Opt::bound(name, Destination::Uint(slot.clone()))
    }

    pub fn uint32(name: &str, slot: &Slot<u32>) -> Self {
        Opt::bound(name, Destination::Uint32(slot.clone()))
    }

    pub fn uint64(name: &str, slot: &Slot<u64>) -> Self {
        Opt::bound(name, Destination::Uint64(slot.clone()))
    }

    pub fn hex8(name: &str, slot: &Slot<u8>) -> Self {
        Opt::bound(name, Destination::Hex8(slot.clone()))
    }

    pub fn hex16(name: &str, slot: &Slot<u16>) -> Self {
        Opt::bound(name, Destination::Hex16(slot.clone()))
    }

    pub fn hex32(name: &str, slot: &Slot<u32>) -> Self {
        Opt::bound(name, Destination::Hex32(slot.clone()))
    }

    pub fn hex64(name: &str, slot: &Slot<u64>) -> Self {
        Opt::bound(name, Destination::Hex64(slot.clone()))
    }

    /// An option that selects `handler` when given.
    pub fn handler(name: &str, handler: HandlerId) -> Self {
        Opt::bound(name, Destination::Handler(handler))
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.description = desc.to_string();
        self
    }

    pub fn arg(mut self, arg: ArgKind) -> Self {
        self.arg = arg;
        self
    }

    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn bind(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Flag set to true whenever this option is supplied.
    pub fn defined(mut self, flag: &Slot<bool>) -> Self {
        self.defined = Some(flag.clone());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help_text(&self) -> &str {
        &self.description
    }

    pub fn arg_kind(&self) -> ArgKind {
        self.arg
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn linked_group(&self) -> Option<GroupId> {
        self.linked
    }

    pub fn takes_arg(&self) -> bool {
        self.arg == ArgKind::Required
    }

    /// Check the argument/kind pairing every registered option must satisfy.
    pub(crate) fn validate(&self) -> Result<()> {
        let consistent = match self.arg {
            ArgKind::None => self.kind.is_valueless(),
            ArgKind::Required => !self.kind.is_valueless(),
        };
        if consistent {
            Ok(())
        } else {
            Err(Error::InvalidOption {
                name: self.name.clone(),
                arg: self.arg,
                kind: self.kind,
            })
        }
    }

    /// The bound handler, if this is a function option.
    pub(crate) fn handler_id(&self) -> Option<HandlerId> {
        if self.kind != ValueKind::Function {
            return None;
        }
        self.destination.as_ref().and_then(Destination::handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign(dest: &Destination, text: &str) -> Result<()> {
        dest.assign("opt", Some(text), Decoding::Strict)
    }

    #[test]
    fn shorthands_pick_consistent_kinds() {
        let flag = Slot::new(false);
        let opt = Opt::flag("verbose", &flag);
        assert_eq!(opt.arg_kind(), ArgKind::None);
        assert_eq!(opt.value_kind(), ValueKind::Flag);
        assert!(opt.validate().is_ok());

        let n = Slot::new(0u64);
        let opt = Opt::hex64("mask", &n);
        assert_eq!(opt.arg_kind(), ArgKind::Required);
        assert_eq!(opt.value_kind(), ValueKind::HexUint64);
        assert!(opt.validate().is_ok());

        let opt = Opt::handler("run", HandlerId::new("run"));
        assert_eq!(opt.arg_kind(), ArgKind::None);
        assert_eq!(opt.handler_id(), Some(HandlerId::new("run")));
    }

    #[test]
    fn mismatched_argument_kind_is_rejected() {
        let flag = Slot::new(false);
        let err = Opt::flag("verbose", &flag)
            .arg(ArgKind::Required)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));
        assert!(err.is_setup());

        let n = Slot::new(0);
        assert!(Opt::int("count", &n).arg(ArgKind::None).validate().is_err());
    }

    #[test]
    fn enum_is_offset_by_one() {
        let slot = Slot::new(0);
        assign(&Destination::Enum(slot.clone()), "2").unwrap();
        assert_eq!(slot.get(), 3);
    }

    #[test]
    fn numeric_bounds_round_trip() {
        let i = Slot::new(0i32);
        let d = Destination::Int(i.clone());
        assign(&d, &i32::MIN.to_string()).unwrap();
        assert_eq!(i.get(), i32::MIN);
        assign(&d, &i32::MAX.to_string()).unwrap();
        assert_eq!(i.get(), i32::MAX);

        let u = Slot::new(1u32);
        for d in [Destination::Uint(u.clone()), Destination::Uint32(u.clone())] {
            assign(&d, "0").unwrap();
            assert_eq!(u.get(), 0);
            assign(&d, &u32::MAX.to_string()).unwrap();
            assert_eq!(u.get(), u32::MAX);
        }

        let w = Slot::new(1u64);
        let d = Destination::Uint64(w.clone());
        assign(&d, "0").unwrap();
        assert_eq!(w.get(), 0);
        assign(&d, &u64::MAX.to_string()).unwrap();
        assert_eq!(w.get(), u64::MAX);

        let b = Slot::new(1u8);
        let d = Destination::Hex8(b.clone());
        assign(&d, "0").unwrap();
        assert_eq!(b.get(), 0);
        assign(&d, "ff").unwrap();
        assert_eq!(b.get(), u8::MAX);

        let h = Slot::new(1u16);
        let d = Destination::Hex16(h.clone());
        assign(&d, "0").unwrap();
        assert_eq!(h.get(), 0);
        assign(&d, "ffff").unwrap();
        assert_eq!(h.get(), u16::MAX);

        let h = Slot::new(1u32);
        let d = Destination::Hex32(h.clone());
        assign(&d, "0").unwrap();
        assert_eq!(h.get(), 0);
        assign(&d, "FFFFFFFF").unwrap();
        assert_eq!(h.get(), u32::MAX);

        let h = Slot::new(1u64);
        let d = Destination::Hex64(h.clone());
        assign(&d, "0").unwrap();
        assert_eq!(h.get(), 0);
        assign(&d, "0xffffffffffffffff").unwrap();
        assert_eq!(h.get(), u64::MAX);

        let f = Slot::new(0.0f32);
        let d = Destination::Float(f.clone());
        assign(&d, &f32::MAX.to_string()).unwrap();
        assert_eq!(f.get(), f32::MAX);
        assign(&d, &f32::MIN.to_string()).unwrap();
        assert_eq!(f.get(), f32::MIN);
    }

    #[test]
    fn strict_decoding_rejects_malformed_text() {
        let n = Slot::new(5i32);
        let err = assign(&Destination::Int(n.clone()), "twelve").unwrap_err();
        assert!(matches!(err, Error::BadValue { kind: ValueKind::Int, .. }));
        assert_eq!(n.get(), 5);

        let b = Slot::new(0u8);
        assert!(assign(&Destination::Hex8(b), "100").is_err());
        let e = Slot::new(0i32);
        assert!(assign(&Destination::Enum(e), &i32::MAX.to_string()).is_err());
    }

    #[test]
    fn lenient_decoding_keeps_legacy_zeroes() {
        let n = Slot::new(5i32);
        Destination::Int(n.clone())
            .assign("opt", Some("twelve"), Decoding::Lenient)
            .unwrap();
        assert_eq!(n.get(), 0);

        let e = Slot::new(9i32);
        Destination::Enum(e.clone())
            .assign("opt", Some("x"), Decoding::Lenient)
            .unwrap();
        assert_eq!(e.get(), 1);

        let b = Slot::new(0u8);
        Destination::Hex8(b.clone())
            .assign("opt", Some("1ff"), Decoding::Lenient)
            .unwrap();
        assert_eq!(b.get(), 0xff);
    }

    #[test]
    fn text_is_bounded_by_capacity() {
        let s = Slot::new(String::new());
        let d = Destination::Text {
            slot: s.clone(),
            capacity: 4,
        };
        assign(&d, "Lovelace").unwrap();
        assert_eq!(s.get(), "Love");
    }

    #[test]
    fn store_checks_types() {
        let s = Slot::new(0u16);
        let d = Destination::Hex16(s.clone());
        d.store(Value::U16(0xbeef)).unwrap();
        assert_eq!(s.get(), 0xbeef);
        assert!(d.store(Value::Flag(true)).is_err());
        assert_eq!(d.load(), Some(Value::U16(0xbeef)));
        assert_eq!(Destination::Handler(HandlerId::new("x")).load(), None);
    }
}
