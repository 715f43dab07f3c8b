//! Formats Windows property keys (`PROPERTYKEY` and `DEVPROPKEY`) as text.
//!
//! A key is a format id [`Guid`] plus a property id, written as
//! `{4340A6C5-93FA-4706-972C-7B648208A5E2},8`. Both key types share one
//! formatter through the [`CompositeKey`] trait.

mod config;
mod consts;
mod guid;
mod key;
mod output;
#[cfg(windows)]
mod winapiext;

use std::error::Error;
use std::fmt;

use tracing::{debug, instrument};

pub use config::{ConfigError, KeyFile};
pub use consts::*;
pub use guid::{write_guid, Guid, ParseGuidError, GUID_STRING_LEN};
pub use key::{write_key, AnyKey, CompositeKey, DevPropKey, ParseKeyError, PropertyKey};
pub use output::{render_key, render_table, OutputFormat, RenderError};
#[cfg(windows)]
pub use winapiext::{string_from_guid2, Win32Error};

/// Describes a key argument that could not be resolved.
#[derive(Debug)]
pub enum LookupError {
    /// The argument is neither a known name nor `<fmtid>,<pid>` text.
    Unknown(String, ParseKeyError),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LookupError::Unknown(ref name, ref err) => {
                write!(f, "{} is not a known key name ({})", name, err)
            }
        }
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            LookupError::Unknown(_, ref err) => Some(err),
        }
    }
}

/// Resolves a key argument to a name and key.
///
/// Names from `extra` are tried first, then the well-known table, and finally
/// the argument is parsed as `<fmtid>,<pid>`. A literal key equal to a
/// well-known key takes that key's name and type; any other literal keeps the
/// argument as its name and is treated as a device property key.
#[instrument(level = "debug", skip(extra))]
pub fn resolve_key(arg: &str, extra: Option<&KeyFile>) -> Result<(String, AnyKey), LookupError> {
    if let Some((name, key)) = extra.and_then(|file| file.find(arg)) {
        debug!(name, "found in key file");
        return Ok((name.to_owned(), *key));
    }
    if let Some(entry) = find_well_known(arg) {
        debug!(name = entry.name, "found well-known key");
        return Ok((entry.name.to_owned(), entry.key));
    }
    let key = arg
        .parse::<DevPropKey>()
        .map_err(|err| LookupError::Unknown(arg.to_owned(), err))?;
    match find_by_key(&key) {
        Some(entry) => {
            debug!(name = entry.name, "literal key is well-known");
            Ok((entry.name.to_owned(), entry.key))
        }
        None => Ok((arg.trim().to_owned(), AnyKey::Device(key))),
    }
}

/// Lists every named key: the well-known table followed by `extra`.
///
/// A name in `extra` that matches a well-known name replaces that entry in place.
pub fn all_keys(extra: Option<&KeyFile>) -> Vec<(&str, AnyKey)> {
    let mut keys: Vec<(&str, AnyKey)> = WELL_KNOWN_KEYS
        .iter()
        .map(|entry| (entry.name, entry.key))
        .collect();
    for (name, key) in extra.into_iter().flat_map(|file| file.iter()) {
        match keys
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name, *key),
            None => keys.push((name, *key)),
        }
    }
    keys
}
