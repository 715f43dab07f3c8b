#![allow(missing_docs)]
#![allow(non_upper_case_globals)]
#![allow(unknown_lints)]
#![allow(clippy::unreadable_literal)]

use tracing::{instrument, trace};

use crate::guid::Guid;
use crate::key::{AnyKey, CompositeKey, DevPropKey, PropertyKey};

const FMTID_DeviceName: Guid = Guid::from_u128(0xb725f130_47ef_101a_a5f1_02608c9eebac);
const FMTID_Device: Guid = Guid::from_u128(0xa45c254e_df1c_4efd_8020_67d146a850e0);
const FMTID_DeviceInstance: Guid = Guid::from_u128(0x78c34fc8_104a_4aca_9ea4_524d52996e57);
const FMTID_DeviceRelations: Guid = Guid::from_u128(0x4340a6c5_93fa_4706_972c_7b648208a5e2);
const FMTID_DeviceStatus: Guid = Guid::from_u128(0x540b947e_8b40_45bc_a8a2_6a0b894cbda2);
const FMTID_DeviceDriver: Guid = Guid::from_u128(0xa8b865dd_2e3d_4094_ad97_e593a70c75d6);
const FMTID_DeviceContainer: Guid = Guid::from_u128(0x8c7ed206_3f8a_4827_b3ab_ae9e1faefc6c);
const FMTID_DeviceInterface: Guid = Guid::from_u128(0x026e516e_b814_414b_83cd_856d6fef4822);
const FMTID_AudioEndpoint: Guid = Guid::from_u128(0x1da5d803_d492_4edd_8c23_e0c0ffee7f0e);
const FMTID_AudioEngine: Guid = Guid::from_u128(0xf19f064d_082c_4e27_bc73_6882a1bb8e4c);
const FMTID_FX: Guid = Guid::from_u128(0xd04e05a6_594b_4fb6_a80d_01af5eed7d1d);
const FMTID_FX_ProcessingModes: Guid = Guid::from_u128(0xd3993a3f_99c2_4402_b5ec_a92a0367664b);

pub const DEVPKEY_NAME: DevPropKey = DevPropKey::new(FMTID_DeviceName, 10);
pub const DEVPKEY_Device_DeviceDesc: DevPropKey = DevPropKey::new(FMTID_Device, 2);
pub const DEVPKEY_Device_HardwareIds: DevPropKey = DevPropKey::new(FMTID_Device, 3);
pub const DEVPKEY_Device_CompatibleIds: DevPropKey = DevPropKey::new(FMTID_Device, 4);
pub const DEVPKEY_Device_Service: DevPropKey = DevPropKey::new(FMTID_Device, 6);
pub const DEVPKEY_Device_Class: DevPropKey = DevPropKey::new(FMTID_Device, 9);
pub const DEVPKEY_Device_ClassGuid: DevPropKey = DevPropKey::new(FMTID_Device, 10);
pub const DEVPKEY_Device_Driver: DevPropKey = DevPropKey::new(FMTID_Device, 11);
pub const DEVPKEY_Device_Manufacturer: DevPropKey = DevPropKey::new(FMTID_Device, 13);
pub const DEVPKEY_Device_FriendlyName: DevPropKey = DevPropKey::new(FMTID_Device, 14);
pub const DEVPKEY_Device_LocationInfo: DevPropKey = DevPropKey::new(FMTID_Device, 15);
pub const DEVPKEY_Device_InstallState: DevPropKey = DevPropKey::new(FMTID_Device, 36);
pub const DEVPKEY_Device_InstanceId: DevPropKey = DevPropKey::new(FMTID_DeviceInstance, 256);
pub const DEVPKEY_Device_ProblemCode: DevPropKey = DevPropKey::new(FMTID_DeviceRelations, 3);
pub const DEVPKEY_Device_Parent: DevPropKey = DevPropKey::new(FMTID_DeviceRelations, 8);
pub const DEVPKEY_Device_Children: DevPropKey = DevPropKey::new(FMTID_DeviceRelations, 9);
pub const DEVPKEY_Device_Siblings: DevPropKey = DevPropKey::new(FMTID_DeviceRelations, 10);
pub const DEVPKEY_Device_ProblemStatus: DevPropKey = DevPropKey::new(FMTID_DeviceRelations, 12);
pub const DEVPKEY_Device_IsPresent: DevPropKey = DevPropKey::new(FMTID_DeviceStatus, 5);
pub const DEVPKEY_Device_HasProblem: DevPropKey = DevPropKey::new(FMTID_DeviceStatus, 6);
pub const DEVPKEY_Device_ExtendedConfigurationIds: DevPropKey =
    DevPropKey::new(FMTID_DeviceStatus, 15);
pub const DEVPKEY_Device_IsRebootRequired: DevPropKey = DevPropKey::new(FMTID_DeviceStatus, 16);
pub const DEVPKEY_Device_DriverDesc: DevPropKey = DevPropKey::new(FMTID_DeviceDriver, 3);
pub const DEVPKEY_Device_DriverInfPath: DevPropKey = DevPropKey::new(FMTID_DeviceDriver, 5);
pub const DEVPKEY_Device_DriverProvider: DevPropKey = DevPropKey::new(FMTID_DeviceDriver, 9);
pub const DEVPKEY_Device_ContainerId: DevPropKey = DevPropKey::new(FMTID_DeviceContainer, 2);

pub const PKEY_Device_DeviceDesc: PropertyKey = PropertyKey::new(FMTID_Device, 2);
pub const PKEY_Device_FriendlyName: PropertyKey = PropertyKey::new(FMTID_Device, 14);
pub const PKEY_DeviceInterface_FriendlyName: PropertyKey =
    PropertyKey::new(FMTID_DeviceInterface, 2);
pub const PKEY_AudioEndpoint_FormFactor: PropertyKey = PropertyKey::new(FMTID_AudioEndpoint, 0);
pub const PKEY_AudioEndpoint_GUID: PropertyKey = PropertyKey::new(FMTID_AudioEndpoint, 4);
pub const PKEY_AudioEndpoint_Association: PropertyKey = PropertyKey::new(FMTID_AudioEndpoint, 2);
pub const PKEY_AudioEngine_DeviceFormat: PropertyKey = PropertyKey::new(FMTID_AudioEngine, 0);

pub const PKEY_FX_Association: PropertyKey = PropertyKey::new(FMTID_FX, 0);
pub const PKEY_CompositeFX_StreamEffectClsid: PropertyKey = PropertyKey::new(FMTID_FX, 13);
pub const PKEY_CompositeFX_ModeEffectClsid: PropertyKey = PropertyKey::new(FMTID_FX, 14);
pub const PKEY_CompositeFX_EndpointEffectClsid: PropertyKey = PropertyKey::new(FMTID_FX, 15);
pub const PKEY_CompositeFX_Offload_StreamEffectClsid: PropertyKey = PropertyKey::new(FMTID_FX, 16);
pub const PKEY_CompositeFX_Offload_ModeEffectClsid: PropertyKey = PropertyKey::new(FMTID_FX, 17);
pub const PKEY_SFX_ProcessingModes_Supported_For_Streaming: PropertyKey =
    PropertyKey::new(FMTID_FX_ProcessingModes, 5);
pub const PKEY_MFX_ProcessingModes_Supported_For_Streaming: PropertyKey =
    PropertyKey::new(FMTID_FX_ProcessingModes, 6);
pub const PKEY_EFX_ProcessingModes_Supported_For_Streaming: PropertyKey =
    PropertyKey::new(FMTID_FX_ProcessingModes, 7);
pub const PKEY_SFX_Offload_ProcessingModes_Supported_For_Streaming: PropertyKey =
    PropertyKey::new(FMTID_FX_ProcessingModes, 11);
pub const PKEY_MFX_Offload_ProcessingModes_Supported_For_Streaming: PropertyKey =
    PropertyKey::new(FMTID_FX_ProcessingModes, 12);

/// The key printed when no other key is asked for.
pub const DEFAULT_KEY: DevPropKey = DEVPKEY_Device_Parent;

/// A key with the name it has in the Windows SDK headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownKey {
    pub name: &'static str,
    pub key: AnyKey,
}

macro_rules! well_known {
    ($($kind:ident $name:ident),* $(,)?) => {
        &[$(WellKnownKey {
            name: stringify!($name),
            key: AnyKey::$kind($name),
        }),*]
    };
}

/// Every key this crate knows by name, in header order.
pub const WELL_KNOWN_KEYS: &[WellKnownKey] = well_known![
    Device DEVPKEY_NAME,
    Device DEVPKEY_Device_DeviceDesc,
    Device DEVPKEY_Device_HardwareIds,
    Device DEVPKEY_Device_CompatibleIds,
    Device DEVPKEY_Device_Service,
    Device DEVPKEY_Device_Class,
    Device DEVPKEY_Device_ClassGuid,
    Device DEVPKEY_Device_Driver,
    Device DEVPKEY_Device_Manufacturer,
    Device DEVPKEY_Device_FriendlyName,
    Device DEVPKEY_Device_LocationInfo,
    Device DEVPKEY_Device_InstallState,
    Device DEVPKEY_Device_InstanceId,
    Device DEVPKEY_Device_ProblemCode,
    Device DEVPKEY_Device_Parent,
    Device DEVPKEY_Device_Children,
    Device DEVPKEY_Device_Siblings,
    Device DEVPKEY_Device_ProblemStatus,
    Device DEVPKEY_Device_IsPresent,
    Device DEVPKEY_Device_HasProblem,
    Device DEVPKEY_Device_ExtendedConfigurationIds,
    Device DEVPKEY_Device_IsRebootRequired,
    Device DEVPKEY_Device_DriverDesc,
    Device DEVPKEY_Device_DriverInfPath,
    Device DEVPKEY_Device_DriverProvider,
    Device DEVPKEY_Device_ContainerId,
    Property PKEY_Device_DeviceDesc,
    Property PKEY_Device_FriendlyName,
    Property PKEY_DeviceInterface_FriendlyName,
    Property PKEY_AudioEndpoint_FormFactor,
    Property PKEY_AudioEndpoint_GUID,
    Property PKEY_AudioEndpoint_Association,
    Property PKEY_AudioEngine_DeviceFormat,
    Property PKEY_FX_Association,
    Property PKEY_CompositeFX_StreamEffectClsid,
    Property PKEY_CompositeFX_ModeEffectClsid,
    Property PKEY_CompositeFX_EndpointEffectClsid,
    Property PKEY_CompositeFX_Offload_StreamEffectClsid,
    Property PKEY_CompositeFX_Offload_ModeEffectClsid,
    Property PKEY_SFX_ProcessingModes_Supported_For_Streaming,
    Property PKEY_MFX_ProcessingModes_Supported_For_Streaming,
    Property PKEY_EFX_ProcessingModes_Supported_For_Streaming,
    Property PKEY_SFX_Offload_ProcessingModes_Supported_For_Streaming,
    Property PKEY_MFX_Offload_ProcessingModes_Supported_For_Streaming,
];

/// Looks up a well-known key by name, ignoring ASCII case.
#[instrument(level = "trace")]
pub fn find_well_known(name: &str) -> Option<&'static WellKnownKey> {
    let found = WELL_KNOWN_KEYS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name));
    trace!(found = found.is_some(), "looked up well-known key");
    found
}

/// Finds the name of a key by value.
///
/// Either key type matches an entry of the other type with the same format id
/// and property id. Where the shell and device tables share a key, the
/// `DEVPKEY_*` name comes first.
pub fn find_by_key<K: CompositeKey + ?Sized>(key: &K) -> Option<&'static WellKnownKey> {
    let (fmtid, pid) = (key.fmtid(), key.pid());
    WELL_KNOWN_KEYS
        .iter()
        .find(|entry| entry.key.fmtid() == fmtid && entry.key.pid() == pid)
}

/// A GUID with the name it has in the Windows SDK headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownGuid {
    pub name: &'static str,
    pub guid: Guid,
}

macro_rules! ksnodetypes {
    ($($name:ident = $data1:literal),* $(,)?) => {
        &[$(WellKnownGuid {
            name: stringify!($name),
            guid: Guid::from_values(
                $data1,
                0xf70f,
                0x11d0,
                [0xb9, 0x17, 0x00, 0xa0, 0xc9, 0x22, 0x31, 0x96],
            ),
        }),*]
    };
}

/// Endpoint form factors (`KSNODETYPE_*`). These show up as values of the
/// effect association keys.
pub const KSNODETYPES: &[WellKnownGuid] = ksnodetypes![
    KSNODETYPE_INPUT_UNDEFINED = 0xdff21be0,
    KSNODETYPE_MICROPHONE = 0xdff21be1,
    KSNODETYPE_DESKTOP_MICROPHONE = 0xdff21be2,
    KSNODETYPE_PERSONAL_MICROPHONE = 0xdff21be3,
    KSNODETYPE_OMNI_DIRECTIONAL_MICROPHONE = 0xdff21be4,
    KSNODETYPE_MICROPHONE_ARRAY = 0xdff21be5,
    KSNODETYPE_PROCESSING_MICROPHONE_ARRAY = 0xdff21be6,
    KSNODETYPE_OUTPUT_UNDEFINED = 0xdff21ce0,
    KSNODETYPE_SPEAKER = 0xdff21ce1,
    KSNODETYPE_HEADPHONES = 0xdff21ce2,
    KSNODETYPE_HEAD_MOUNTED_DISPLAY_AUDIO = 0xdff21ce3,
    KSNODETYPE_DESKTOP_SPEAKER = 0xdff21ce4,
    KSNODETYPE_ROOM_SPEAKER = 0xdff21ce5,
    KSNODETYPE_COMMUNICATION_SPEAKER = 0xdff21ce6,
    KSNODETYPE_BIDIRECTIONAL_UNDEFINED = 0xdff21de0,
    KSNODETYPE_HANDSET = 0xdff21de1,
    KSNODETYPE_HEADSET = 0xdff21de2,
    KSNODETYPE_SPEAKERPHONE_NO_ECHO_REDUCTION = 0xdff21de3,
    KSNODETYPE_ECHO_SUPPRESSING_SPEAKERPHONE = 0xdff21de4,
    KSNODETYPE_ECHO_CANCELING_SPEAKERPHONE = 0xdff21de5,
    KSNODETYPE_TELEPHONY_UNDEFINED = 0xdff21ee0,
    KSNODETYPE_PHONE_LINE = 0xdff21ee1,
    KSNODETYPE_TELEPHONE = 0xdff21ee2,
];

/// Audio signal processing modes, as listed by the
/// `*_ProcessingModes_Supported_For_Streaming` keys.
pub const PROCESSING_MODES: &[WellKnownGuid] = &[
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_DEFAULT",
        guid: Guid::from_u128(0xc18e2f7e_933d_4965_b7d1_1eef228d2af3),
    },
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_RAW",
        guid: Guid::from_u128(0x9e90ea20_b493_4fd1_a1a8_7e1361a956cf),
    },
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_MOVIE",
        guid: Guid::from_u128(0xb26feb0d_ec94_477c_9494_d1ab8e753f6e),
    },
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_MEDIA",
        guid: Guid::from_u128(0x4780004e_7133_41d8_8c74_660dadd2c0ee),
    },
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_SPEECH",
        guid: Guid::from_u128(0xfc1cfc9b_b9d6_4cfa_b5e0_4bb2166878b2),
    },
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_COMMUNICATIONS",
        guid: Guid::from_u128(0x98951333_b9cd_48b1_a0a3_ff40682d73f7),
    },
    WellKnownGuid {
        name: "AUDIO_SIGNALPROCESSINGMODE_NOTIFICATION",
        guid: Guid::from_u128(0x9cf2a70b_f377_403b_bd6b_360863e0355c),
    },
];

/// Names a GUID from the form factor or processing mode tables.
///
/// `GUID_NULL` is `KSNODETYPE_ANY`.
pub fn find_guid_name(guid: &Guid) -> Option<&'static str> {
    if *guid == Guid::zeroed() {
        return Some("KSNODETYPE_ANY");
    }
    KSNODETYPES
        .iter()
        .chain(PROCESSING_MODES)
        .find(|entry| entry.guid == *guid)
        .map(|entry| entry.name)
}
