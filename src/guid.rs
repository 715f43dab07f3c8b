use std::error::Error;
use std::fmt::{self, Write};
use std::num::ParseIntError;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Length of the canonical braced form, `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`.
pub const GUID_STRING_LEN: usize = 38;

const GUID_PATTERNS: [&str; 3] = [
    "^\\{([0-9a-fA-F]{8})-([0-9a-fA-F]{4})-\
     ([0-9a-fA-F]{4})-([0-9a-fA-F]{2})([0-9a-fA-F]{2})-\
     ([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})\
     ([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})\\}$",
    "^([0-9a-fA-F]{8})-([0-9a-fA-F]{4})-\
     ([0-9a-fA-F]{4})-([0-9a-fA-F]{2})([0-9a-fA-F]{2})-\
     ([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})\
     ([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$",
    "^([0-9a-fA-F]{8})([0-9a-fA-F]{4})\
     ([0-9a-fA-F]{4})([0-9a-fA-F]{2})([0-9a-fA-F]{2})\
     ([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})\
     ([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$",
];

lazy_static! {
    static ref GUID_REGEXES: Vec<Regex> = GUID_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect();
}

/// A 128-bit globally unique identifier.
///
/// The field layout matches the Windows `GUID` structure, so the first three
/// fields are stored in native byte order and `data4` is a plain byte array.
/// Equality is bitwise.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    /// Creates a `Guid` from its four fields.
    pub const fn from_values(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// Creates a `Guid` from a `u128` written in the same order as the canonical text.
    ///
    /// # Examples
    ///
    /// ```
    /// use devpkey::Guid;
    ///
    /// let guid = Guid::from_u128(0x4340a6c5_93fa_4706_972c_7b648208a5e2);
    /// assert_eq!(guid.data1, 0x4340a6c5);
    /// assert_eq!(guid.data4[7], 0xe2);
    /// ```
    pub const fn from_u128(uuid: u128) -> Self {
        Self {
            data1: (uuid >> 96) as u32,
            data2: (uuid >> 80 & 0xffff) as u16,
            data3: (uuid >> 64 & 0xffff) as u16,
            data4: (uuid as u64).to_be_bytes(),
        }
    }

    /// Packs the `Guid` back into a `u128`. The inverse of [`Guid::from_u128`].
    pub const fn to_u128(&self) -> u128 {
        ((self.data1 as u128) << 96)
            | ((self.data2 as u128) << 80)
            | ((self.data3 as u128) << 64)
            | u64::from_be_bytes(self.data4) as u128
    }

    /// The all-zero `Guid` (`GUID_NULL`).
    pub const fn zeroed() -> Self {
        Self::from_u128(0)
    }
}

/// Writes `guid` to `sink` in canonical braced form with uppercase hex digits.
///
/// Exactly [`GUID_STRING_LEN`] characters are written. Errors come only from
/// the sink and are passed through untouched.
pub fn write_guid<W: Write + ?Sized>(sink: &mut W, guid: &Guid) -> fmt::Result {
    write!(
        sink,
        "{{{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
        guid.data1,
        guid.data2,
        guid.data3,
        guid.data4[0],
        guid.data4[1],
        guid.data4[2],
        guid.data4[3],
        guid.data4[4],
        guid.data4[5],
        guid.data4[6],
        guid.data4[7]
    )
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_guid(f, self)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_guid(f, self)
    }
}

impl fmt::LowerHex for Guid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7]
        )
    }
}

/// Describes why a string could not be read as a [`Guid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseGuidError {
    /// The string is not in any of the accepted layouts.
    InvalidFormat(String),
    /// A field matched the layout but could not be converted.
    InvalidDigits(ParseIntError),
}

impl fmt::Display for ParseGuidError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseGuidError::InvalidFormat(ref src) => write!(f, "not a GUID: {:?}", src),
            ParseGuidError::InvalidDigits(ref err) => write!(f, "bad GUID digits: {}", err),
        }
    }
}

impl Error for ParseGuidError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ParseGuidError::InvalidFormat(_) => None,
            ParseGuidError::InvalidDigits(ref err) => Some(err),
        }
    }
}

impl From<ParseIntError> for ParseGuidError {
    fn from(err: ParseIntError) -> ParseGuidError {
        ParseGuidError::InvalidDigits(err)
    }
}

impl FromStr for Guid {
    type Err = ParseGuidError;

    /// Accepts `{8-4-4-4-12}`, `8-4-4-4-12` or 32 bare hex digits, in either case.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let trimmed = src.trim();
        let caps = GUID_REGEXES
            .iter()
            .find_map(|re| re.captures(trimmed))
            .ok_or_else(|| ParseGuidError::InvalidFormat(src.to_owned()))?;

        let mut iter = caps.iter().skip(1).flatten().map(|c| c.as_str());
        let mut next = || {
            iter.next()
                .ok_or_else(|| ParseGuidError::InvalidFormat(src.to_owned()))
        };
        let l = u32::from_str_radix(next()?, 16)?;
        let w1 = u16::from_str_radix(next()?, 16)?;
        let w2 = u16::from_str_radix(next()?, 16)?;
        let mut array = [0; 8];
        for b in array.iter_mut() {
            *b = u8::from_str_radix(next()?, 16)?;
        }

        Ok(Guid::from_values(l, w1, w2, array))
    }
}

impl Serialize for Guid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Guid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: Guid = Guid::from_u128(0x4340a6c5_93fa_4706_972c_7b648208a5e2);

    fn canonical_shape(text: &str) -> bool {
        Regex::new(r"^\{[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}\}$")
            .unwrap()
            .is_match(text)
    }

    fn samples() -> Vec<Guid> {
        let mut out = vec![
            Guid::zeroed(),
            Guid::from_u128(u128::MAX),
            PARENT,
            Guid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0000),
            Guid::from_u128(0x0123456789abcdef0123456789abcdef),
        ];
        // walk a single set bit and a simple LCG over the whole range
        out.extend((0..128).map(|bit| Guid::from_u128(1u128 << bit)));
        let mut x: u128 = 0x9e3779b97f4a7c15f39cc0605cedc834;
        for _ in 0..64 {
            x = x
                .wrapping_mul(0x2360ed051fc65da44385df649fccf645)
                .wrapping_add(0x5851f42d4c957f2d);
            out.push(Guid::from_u128(x));
        }
        out
    }

    #[test]
    fn formats_well_known_guid() {
        assert_eq!(
            PARENT.to_string(),
            "{4340A6C5-93FA-4706-972C-7B648208A5E2}"
        );
    }

    #[test]
    fn formats_to_fixed_length_uppercase() {
        for guid in samples() {
            let text = guid.to_string();
            assert_eq!(text.len(), GUID_STRING_LEN, "{}", text);
            assert!(canonical_shape(&text), "{}", text);
        }
    }

    #[test]
    fn round_trips_through_text() {
        for guid in samples() {
            assert_eq!(guid.to_string().parse::<Guid>(), Ok(guid));
        }
    }

    #[test]
    fn u128_conversion_is_reversible() {
        for guid in samples() {
            assert_eq!(Guid::from_u128(guid.to_u128()), guid);
        }
    }

    #[test]
    fn formatting_is_repeatable() {
        let mut first = String::new();
        let mut second = String::new();
        write_guid(&mut first, &PARENT).unwrap();
        write_guid(&mut second, &PARENT).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn write_guid_appends() {
        let mut sink = String::from("key=");
        write_guid(&mut sink, &Guid::zeroed()).unwrap();
        assert_eq!(sink, "key={00000000-0000-0000-0000-000000000000}");
    }

    #[test]
    fn lower_hex_is_lowercase() {
        assert_eq!(
            format!("{:x}", PARENT),
            "{4340a6c5-93fa-4706-972c-7b648208a5e2}"
        );
    }

    #[test]
    fn parses_all_layouts() {
        for text in [
            "{4340A6C5-93FA-4706-972C-7B648208A5E2}",
            "{4340a6c5-93fa-4706-972c-7b648208a5e2}",
            "4340a6c5-93fa-4706-972c-7b648208a5e2",
            "4340A6C593FA4706972C7B648208A5E2",
            "  {4340A6C5-93FA-4706-972C-7B648208A5E2}\n",
        ] {
            assert_eq!(text.parse::<Guid>(), Ok(PARENT), "{:?}", text);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for text in [
            "",
            "{}",
            "{4340A6C5-93FA-4706-972C-7B648208A5E2",
            "4340A6C5-93FA-4706-972C-7B648208A5E2}",
            "{4340A6C5-93FA-4706-972C-7B648208A5E}",
            "{4340A6C5-93FA-4706-972C-7B648208A5EG}",
            "{4340A6C5-93FA4706-972C-7B648208A5E2}",
            "4340A6C593FA4706972C7B648208A5E2FF",
        ] {
            assert!(
                matches!(text.parse::<Guid>(), Err(ParseGuidError::InvalidFormat(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn each_layout_has_its_own_pattern() {
        let forms = [
            "{4340A6C5-93FA-4706-972C-7B648208A5E2}",
            "4340A6C5-93FA-4706-972C-7B648208A5E2",
            "4340A6C593FA4706972C7B648208A5E2",
        ];
        assert_eq!(GUID_REGEXES.len(), forms.len());
        for (i, re) in GUID_REGEXES.iter().enumerate() {
            for (j, form) in forms.iter().enumerate() {
                assert_eq!(re.is_match(form), i == j, "pattern {} on {:?}", i, form);
            }
        }
        // parsing many times reuses the same compiled set
        for _ in 0..1000 {
            assert_eq!(forms[2].parse::<Guid>(), Ok(PARENT));
        }
    }

    #[test]
    fn serializes_as_text() {
        let json = serde_json::to_string(&PARENT).unwrap();
        assert_eq!(json, "\"{4340A6C5-93FA-4706-972C-7B648208A5E2}\"");
        assert_eq!(serde_json::from_str::<Guid>(&json).unwrap(), PARENT);
        assert!(serde_json::from_str::<Guid>("\"nope\"").is_err());
    }
}
