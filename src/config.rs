//! Loading extra named keys from a file.
//!
//! A key file is a table of shell property keys under `keys` and device
//! property keys under `device_keys`, each mapping a name to `<fmtid>,<pid>`:
//!
//! ```toml
//! [keys]
//! PKEY_SOUNDCORECTL_CLSID_Z = "{C949C6AA-132B-4511-BB1B-35261A2A6333},0"
//!
//! [device_keys]
//! DEVPKEY_Device_Parent = "{4340A6C5-93FA-4706-972C-7B648208A5E2},8"
//! ```
//!
//! The same shape is accepted as YAML or JSON; the file extension decides.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_derive::Deserialize;
use tracing::{debug, instrument};

use crate::key::{AnyKey, DevPropKey, PropertyKey};

/// Describes an error that occurred while loading a key file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not valid TOML, or does not have the expected shape.
    Toml(toml::de::Error),
    /// The file is not valid YAML, or does not have the expected shape.
    Yaml(serde_yaml::Error),
    /// The file is not valid JSON, or does not have the expected shape.
    Json(serde_json::Error),
    /// The extension is not one of `toml`, `yaml`, `yml` or `json`.
    UnsupportedFormat(PathBuf),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref err) => write!(f, "could not read key file: {}", err),
            ConfigError::Toml(ref err) => write!(f, "invalid TOML key file: {}", err),
            ConfigError::Yaml(ref err) => write!(f, "invalid YAML key file: {}", err),
            ConfigError::Json(ref err) => write!(f, "invalid JSON key file: {}", err),
            ConfigError::UnsupportedFormat(ref path) => {
                write!(f, "unsupported key file format: {}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ConfigError::Io(ref err) => Some(err),
            ConfigError::Toml(ref err) => Some(err),
            ConfigError::Yaml(ref err) => Some(err),
            ConfigError::Json(ref err) => Some(err),
            ConfigError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> ConfigError {
        ConfigError::Toml(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> ConfigError {
        ConfigError::Yaml(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct KeyFileContents {
    keys: IndexMap<String, PropertyKey>,
    device_keys: IndexMap<String, DevPropKey>,
}

/// Named keys read from a key file, in file order.
///
/// Names are matched without regard to ASCII case. When two entries differ
/// only in case, the later one wins and takes the earlier one's position, so
/// `device_keys` overrides `keys`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyFile {
    // lowercased name -> (name as written, key)
    entries: IndexMap<String, (String, AnyKey)>,
}

impl KeyFile {
    /// Reads a key file, picking the parser from the file extension.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let text = match extension.as_deref() {
            Some("toml") | Some("yaml") | Some("yml") | Some("json") => {
                fs::read_to_string(path)?
            }
            _ => return Err(ConfigError::UnsupportedFormat(path.to_owned())),
        };
        // an empty document means no keys, whatever the format
        let contents: KeyFileContents = match extension.as_deref() {
            _ if text.trim().is_empty() => KeyFileContents::default(),
            Some("toml") => toml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            _ => serde_yaml::from_str(&text)?,
        };
        let file = Self::from_contents(contents);
        debug!(count = file.len(), "loaded key file");
        Ok(file)
    }

    fn from_contents(contents: KeyFileContents) -> Self {
        let mut file = Self::default();
        for (name, key) in contents.keys {
            file.insert(name, AnyKey::Property(key));
        }
        for (name, key) in contents.device_keys {
            file.insert(name, AnyKey::Device(key));
        }
        file
    }

    fn insert(&mut self, name: String, key: AnyKey) {
        if let Some((previous, _)) = self
            .entries
            .insert(name.to_ascii_lowercase(), (name.clone(), key))
        {
            debug!(%previous, %name, "key file entry replaced");
        }
    }

    /// Looks up a key by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<(&str, &AnyKey)> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(entry, key)| (entry.as_str(), key))
    }

    /// Iterates over the keys in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnyKey)> {
        self.entries.values().map(|(name, key)| (name.as_str(), key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;
    use crate::consts::DEVPKEY_Device_Parent;
    use crate::guid::Guid;

    const CLSID_Z: PropertyKey =
        PropertyKey::new(Guid::from_u128(0xc949c6aa_132b_4511_bb1b_35261a2a6333), 0);

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn check(file: &KeyFile) {
        assert_eq!(file.len(), 2);
        let (name, key) = file.find("pkey_soundcorectl_clsid_z").unwrap();
        assert_eq!(name, "PKEY_SOUNDCORECTL_CLSID_Z");
        assert_eq!(*key, AnyKey::Property(CLSID_Z));
        let (_, key) = file.find("MyParent").unwrap();
        assert_eq!(*key, AnyKey::Device(DEVPKEY_Device_Parent));
        assert!(file.find("missing").is_none());
    }

    #[test]
    fn loads_toml() {
        let file = write_temp(
            ".toml",
            r#"
[keys]
PKEY_SOUNDCORECTL_CLSID_Z = "{C949C6AA-132B-4511-BB1B-35261A2A6333},0"

[device_keys]
MyParent = "{4340a6c5-93fa-4706-972c-7b648208a5e2},8"
"#,
        );
        check(&KeyFile::load(file.path()).unwrap());
    }

    #[test]
    fn loads_yaml() {
        let file = write_temp(
            ".yml",
            "keys:\n  PKEY_SOUNDCORECTL_CLSID_Z: \"{C949C6AA-132B-4511-BB1B-35261A2A6333},0\"\n\
             device_keys:\n  MyParent: \"4340A6C5-93FA-4706-972C-7B648208A5E2,8\"\n",
        );
        check(&KeyFile::load(file.path()).unwrap());
    }

    #[test]
    fn loads_json() {
        let file = write_temp(
            ".json",
            r#"{
                "keys": {"PKEY_SOUNDCORECTL_CLSID_Z": "{C949C6AA-132B-4511-BB1B-35261A2A6333},0"},
                "device_keys": {"MyParent": "{4340A6C5-93FA-4706-972C-7B648208A5E2},8"}
            }"#,
        );
        check(&KeyFile::load(file.path()).unwrap());
    }

    #[test]
    fn keeps_file_order() {
        let file = write_temp(
            ".toml",
            "[keys]\nb = \"{00000000-0000-0000-0000-000000000000},2\"\n\
             a = \"{00000000-0000-0000-0000-000000000000},1\"\n",
        );
        let file = KeyFile::load(file.path()).unwrap();
        let names: Vec<_> = file.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn empty_file_has_no_keys() {
        for suffix in [".toml", ".yaml", ".yml", ".json"] {
            for contents in ["", "  \n\t\n"] {
                let file = write_temp(suffix, contents);
                let keys = KeyFile::load(file.path()).unwrap();
                assert!(keys.is_empty(), "{} {:?}", suffix, contents);
            }
        }
    }

    #[test]
    fn device_keys_override_keys_regardless_of_case() {
        let file = write_temp(
            ".toml",
            r#"
[keys]
Foo = "{4340A6C5-93FA-4706-972C-7B648208A5E2},1"
Bar = "{4340A6C5-93FA-4706-972C-7B648208A5E2},3"

[device_keys]
foo = "{4340A6C5-93FA-4706-972C-7B648208A5E2},2"
"#,
        );
        let file = KeyFile::load(file.path()).unwrap();
        assert_eq!(file.len(), 2);
        let expected = AnyKey::Device(DevPropKey::new(DEVPKEY_Device_Parent.fmtid, 2));
        for name in ["foo", "Foo", "FOO"] {
            assert_eq!(file.find(name), Some(("foo", &expected)), "{}", name);
        }
        // the replacement keeps the first entry's position
        let names: Vec<_> = file.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["foo", "Bar"]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let file = write_temp(".ini", "keys=1");
        assert!(matches!(
            KeyFile::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn rejects_bad_keys() {
        let file = write_temp(".toml", "[keys]\nbroken = \"{not-a-guid},1\"\n");
        assert!(matches!(
            KeyFile::load(file.path()),
            Err(ConfigError::Toml(_))
        ));
        let file = write_temp(".json", r#"{"extra": {}}"#);
        assert!(matches!(
            KeyFile::load(file.path()),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            KeyFile::load(&dir.path().join("absent.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
