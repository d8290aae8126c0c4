//! Built-in primitive value types and their numeric conversions.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    String,
    Boolean,
    Symbol,
}

/// How field values are converted to their declared primitive kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// Reject any conversion that loses information.
    #[default]
    Strict,
    /// Host-language conversions: wrap integers, truthiness, stringify.
    Lenient,
}

impl PrimitiveKind {
    /// Every kind, in the order realms pre-seed them.
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Int8,
        PrimitiveKind::Uint8,
        PrimitiveKind::Uint8Clamped,
        PrimitiveKind::Int16,
        PrimitiveKind::Uint16,
        PrimitiveKind::Int32,
        PrimitiveKind::Uint32,
        PrimitiveKind::Float32,
        PrimitiveKind::Float64,
        PrimitiveKind::String,
        PrimitiveKind::Boolean,
        PrimitiveKind::Symbol,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int8 => "int8",
            PrimitiveKind::Uint8 => "uint8",
            PrimitiveKind::Uint8Clamped => "uint8_clamped",
            PrimitiveKind::Int16 => "int16",
            PrimitiveKind::Uint16 => "uint16",
            PrimitiveKind::Int32 => "int32",
            PrimitiveKind::Uint32 => "uint32",
            PrimitiveKind::Float32 => "float32",
            PrimitiveKind::Float64 => "float64",
            PrimitiveKind::String => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Symbol => "symbol",
        }
    }

    pub fn builtin_by_name(name: &str) -> Option<Self> {
        match name.trim() {
            "int8" => Some(PrimitiveKind::Int8),
            "uint8" => Some(PrimitiveKind::Uint8),
            "uint8_clamped" | "uint8Clamped" => Some(PrimitiveKind::Uint8Clamped),
            "int16" => Some(PrimitiveKind::Int16),
            "uint16" => Some(PrimitiveKind::Uint16),
            "int32" => Some(PrimitiveKind::Int32),
            "uint32" => Some(PrimitiveKind::Uint32),
            "float32" => Some(PrimitiveKind::Float32),
            "float64" | "number" => Some(PrimitiveKind::Float64),
            "string" | "str" | "text" => Some(PrimitiveKind::String),
            "boolean" | "bool" => Some(PrimitiveKind::Boolean),
            "symbol" => Some(PrimitiveKind::Symbol),
            _ => None,
        }
    }

    pub fn is_integer(self) -> bool {
        self.int_bounds().is_some()
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::Float32 | PrimitiveKind::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Inclusive range of an integer kind.
    pub fn int_bounds(self) -> Option<(i64, i64)> {
        match self {
            PrimitiveKind::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            PrimitiveKind::Uint8 | PrimitiveKind::Uint8Clamped => Some((0, u8::MAX as i64)),
            PrimitiveKind::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            PrimitiveKind::Uint16 => Some((0, u16::MAX as i64)),
            PrimitiveKind::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            PrimitiveKind::Uint32 => Some((0, u32::MAX as i64)),
            _ => None,
        }
    }

    fn bits_signed(self) -> Option<(u32, bool)> {
        match self {
            PrimitiveKind::Int8 => Some((8, true)),
            PrimitiveKind::Uint8 | PrimitiveKind::Uint8Clamped => Some((8, false)),
            PrimitiveKind::Int16 => Some((16, true)),
            PrimitiveKind::Uint16 => Some((16, false)),
            PrimitiveKind::Int32 => Some((32, true)),
            PrimitiveKind::Uint32 => Some((32, false)),
            _ => None,
        }
    }

    /// Converts an integer to this integer kind. `None` means the value is
    /// not representable under `mode`.
    pub fn int_from_i64(self, i: i64, mode: CoercionMode) -> Option<i64> {
        let (lo, hi) = self.int_bounds()?;
        if self == PrimitiveKind::Uint8Clamped {
            return Some(i.clamp(lo, hi));
        }
        if (lo..=hi).contains(&i) {
            return Some(i);
        }
        match mode {
            CoercionMode::Strict => None,
            CoercionMode::Lenient => self.wrap(i),
        }
    }

    /// Converts a float to this integer kind.
    pub fn int_from_f64(self, f: f64, mode: CoercionMode) -> Option<i64> {
        let (lo, hi) = self.int_bounds()?;
        if self == PrimitiveKind::Uint8Clamped {
            if f.is_nan() {
                return Some(0);
            }
            return Some(f.clamp(lo as f64, hi as f64).round_ties_even() as i64);
        }
        match mode {
            CoercionMode::Strict => {
                if f.is_finite() && f.fract() == 0.0 && f >= lo as f64 && f <= hi as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
            CoercionMode::Lenient => {
                if !f.is_finite() {
                    return Some(0);
                }
                let (bits, _) = self.bits_signed()?;
                let modulus = 2f64.powi(bits as i32);
                let wrapped = f.trunc().rem_euclid(modulus) as i64;
                self.wrap(wrapped)
            }
        }
    }

    /// Rounds a float to this float kind's precision.
    pub fn float_from_f64(self, f: f64) -> Option<f64> {
        match self {
            PrimitiveKind::Float32 => Some(f as f32 as f64),
            PrimitiveKind::Float64 => Some(f),
            _ => None,
        }
    }

    fn wrap(self, i: i64) -> Option<i64> {
        let (bits, signed) = self.bits_signed()?;
        let mask = (1u64 << bits) - 1;
        let raw = (i as u64) & mask;
        if signed && raw & (1u64 << (bits - 1)) != 0 {
            Some((raw | !mask) as i64)
        } else {
            Some(raw as i64)
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
