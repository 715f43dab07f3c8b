//! Property keys: a format id [`Guid`] paired with a property id.
//!
//! Windows has two structurally identical key types, `PROPERTYKEY` (shell
//! property system) and `DEVPROPKEY` (device properties). They are kept as
//! separate types here too, and share one formatter through [`CompositeKey`].

use std::error::Error;
use std::fmt::{self, Write};
use std::num::ParseIntError;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::guid::{write_guid, Guid, ParseGuidError};

/// Anything shaped like `{ fmtid: GUID, pid: u32 }`.
pub trait CompositeKey {
    /// The format id, identifying the property set.
    fn fmtid(&self) -> Guid;
    /// The property id within the set.
    fn pid(&self) -> u32;
}

/// Writes `key` as `<fmtid>,<pid>`, e.g. `{4340A6C5-93FA-4706-972C-7B648208A5E2},8`.
pub fn write_key<W, K>(sink: &mut W, key: &K) -> fmt::Result
where
    W: Write + ?Sized,
    K: CompositeKey + ?Sized,
{
    write_guid(sink, &key.fmtid())?;
    sink.write_char(',')?;
    write!(sink, "{}", key.pid())
}

/// A shell property key (`PROPERTYKEY`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    pub fmtid: Guid,
    pub pid: u32,
}

/// A device property key (`DEVPROPKEY`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DevPropKey {
    pub fmtid: Guid,
    pub pid: u32,
}

macro_rules! composite_key {
    ($name:ident, $other:ident) => {
        impl $name {
            pub const fn new(fmtid: Guid, pid: u32) -> Self {
                Self { fmtid, pid }
            }
        }

        impl CompositeKey for $name {
            fn fmtid(&self) -> Guid {
                self.fmtid
            }
            fn pid(&self) -> u32 {
                self.pid
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write_key(f, self)
            }
        }

        impl From<$other> for $name {
            fn from(key: $other) -> Self {
                Self::new(key.fmtid, key.pid)
            }
        }

        impl PartialEq<$other> for $name {
            fn eq(&self, other: &$other) -> bool {
                self.fmtid == other.fmtid && self.pid == other.pid
            }
        }

        impl FromStr for $name {
            type Err = ParseKeyError;

            fn from_str(src: &str) -> Result<Self, Self::Err> {
                let (fmtid, pid) = parse_key(src)?;
                Ok(Self::new(fmtid, pid))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(de::Error::custom)
            }
        }
    };
}

composite_key!(PropertyKey, DevPropKey);
composite_key!(DevPropKey, PropertyKey);

/// Either kind of key, tagged with which one it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnyKey {
    Property(PropertyKey),
    Device(DevPropKey),
}

impl AnyKey {
    /// Short name of the variant, as used in the platform headers.
    pub fn kind(&self) -> &'static str {
        match *self {
            AnyKey::Property(_) => "PROPERTYKEY",
            AnyKey::Device(_) => "DEVPROPKEY",
        }
    }
}

impl CompositeKey for AnyKey {
    fn fmtid(&self) -> Guid {
        match *self {
            AnyKey::Property(ref key) => key.fmtid,
            AnyKey::Device(ref key) => key.fmtid,
        }
    }
    fn pid(&self) -> u32 {
        match *self {
            AnyKey::Property(ref key) => key.pid,
            AnyKey::Device(ref key) => key.pid,
        }
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_key(f, self)
    }
}

impl From<PropertyKey> for AnyKey {
    fn from(key: PropertyKey) -> Self {
        AnyKey::Property(key)
    }
}

impl From<DevPropKey> for AnyKey {
    fn from(key: DevPropKey) -> Self {
        AnyKey::Device(key)
    }
}

/// Describes why a string could not be read as a property key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseKeyError {
    /// There is no `,` between the format id and the property id.
    MissingSeparator,
    /// The format id is not a GUID.
    Fmtid(ParseGuidError),
    /// The property id contains something other than decimal digits.
    NotDecimal(String),
    /// The property id is empty or does not fit in a `u32`.
    Pid(ParseIntError),
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseKeyError::MissingSeparator => write!(f, "expected <fmtid>,<pid>"),
            ParseKeyError::Fmtid(ref err) => write!(f, "bad fmtid: {}", err),
            ParseKeyError::NotDecimal(ref pid) => write!(f, "pid is not decimal: {:?}", pid),
            ParseKeyError::Pid(ref err) => write!(f, "bad pid: {}", err),
        }
    }
}

impl Error for ParseKeyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ParseKeyError::MissingSeparator | ParseKeyError::NotDecimal(_) => None,
            ParseKeyError::Fmtid(ref err) => Some(err),
            ParseKeyError::Pid(ref err) => Some(err),
        }
    }
}

impl From<ParseGuidError> for ParseKeyError {
    fn from(err: ParseGuidError) -> ParseKeyError {
        ParseKeyError::Fmtid(err)
    }
}

fn parse_key(src: &str) -> Result<(Guid, u32), ParseKeyError> {
    let (fmtid, pid) = src
        .rsplit_once(',')
        .ok_or(ParseKeyError::MissingSeparator)?;
    let fmtid = fmtid.parse()?;
    let pid = pid.trim();
    // u32::from_str would also take a leading '+'
    if !pid.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseKeyError::NotDecimal(pid.to_owned()));
    }
    let pid = pid.parse().map_err(ParseKeyError::Pid)?;
    Ok((fmtid, pid))
}
