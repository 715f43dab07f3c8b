//! Interop with the native types from the `windows` crate.

use std::error::Error;
use std::fmt;

use tracing::trace;
use windows::core::{GUID, PWSTR};
use windows::Win32::Devices::Properties::DEVPROPKEY;
use windows::Win32::System::Com::StringFromGUID2;
use windows::Win32::UI::Shell::PropertiesSystem::PROPERTYKEY;

use crate::guid::{Guid, GUID_STRING_LEN};
use crate::key::{CompositeKey, DevPropKey, PropertyKey};

/// `HRESULT_FROM_WIN32(ERROR_INSUFFICIENT_BUFFER)`
const E_INSUFFICIENT_BUFFER: i32 = 0x8007007a_u32 as i32;

/// Represents an error thrown from Win32 code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Win32Error {
    /// The original `HRESULT` value.
    pub code: i32,
}

impl Win32Error {
    pub fn new(code: i32) -> Win32Error {
        Win32Error { code }
    }
}

impl fmt::Display for Win32Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unexpected HRESULT: {:X}", self.code)
    }
}

impl Error for Win32Error {}

impl From<GUID> for Guid {
    fn from(guid: GUID) -> Self {
        Guid::from_values(guid.data1, guid.data2, guid.data3, guid.data4)
    }
}

impl From<Guid> for GUID {
    fn from(guid: Guid) -> Self {
        GUID {
            data1: guid.data1,
            data2: guid.data2,
            data3: guid.data3,
            data4: guid.data4,
        }
    }
}

macro_rules! native_key {
    ($native:ident, $ours:ident) => {
        impl CompositeKey for $native {
            fn fmtid(&self) -> Guid {
                self.fmtid.into()
            }
            fn pid(&self) -> u32 {
                self.pid
            }
        }

        impl From<$native> for $ours {
            fn from(key: $native) -> Self {
                $ours::new(key.fmtid.into(), key.pid)
            }
        }

        impl From<$ours> for $native {
            fn from(key: $ours) -> Self {
                $native {
                    fmtid: key.fmtid.into(),
                    pid: key.pid,
                }
            }
        }
    };
}

native_key!(PROPERTYKEY, PropertyKey);
native_key!(DEVPROPKEY, DevPropKey);

/// Formats `guid` with the system's `StringFromGUID2`.
///
/// The buffer holds exactly the canonical form plus its terminator, so a zero
/// return means something is badly wrong and is reported rather than retried.
pub fn string_from_guid2(guid: &Guid) -> Result<String, Win32Error> {
    let native = GUID::from(*guid);
    let mut buffer = [0u16; GUID_STRING_LEN + 1];
    let written = unsafe {
        StringFromGUID2(
            &native,
            PWSTR(buffer.as_mut_ptr()),
            buffer.len() as i32,
        )
    };
    trace!(written, "StringFromGUID2");
    match written {
        0 => Err(Win32Error::new(E_INSUFFICIENT_BUFFER)),
        // the count includes the terminator
        len => Ok(String::from_utf16_lossy(&buffer[..len as usize - 1])),
    }
}
