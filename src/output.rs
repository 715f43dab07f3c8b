use std::error::Error;
use std::fmt::{self, Write};
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::instrument;

use crate::key::{write_key, AnyKey};

/// How keys are written to standard output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// `<fmtid>,<pid>` for one key, `NAME = <fmtid>,<pid>` per line for many.
    Text,
    Json,
    Yaml,
    Toml,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["text", "json", "yaml", "toml"];
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "toml" => Ok(OutputFormat::Toml),
            other => Err(RenderError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Describes an error that occurred while rendering keys.
#[derive(Debug)]
pub enum RenderError {
    UnknownFormat(String),
    Fmt(fmt::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Toml(toml::ser::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RenderError::UnknownFormat(ref name) => write!(f, "unknown output format: {}", name),
            RenderError::Fmt(ref err) => write!(f, "formatting failed: {}", err),
            RenderError::Json(ref err) => write!(f, "JSON output failed: {}", err),
            RenderError::Yaml(ref err) => write!(f, "YAML output failed: {}", err),
            RenderError::Toml(ref err) => write!(f, "TOML output failed: {}", err),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            RenderError::UnknownFormat(_) => None,
            RenderError::Fmt(ref err) => Some(err),
            RenderError::Json(ref err) => Some(err),
            RenderError::Yaml(ref err) => Some(err),
            RenderError::Toml(ref err) => Some(err),
        }
    }
}

impl From<fmt::Error> for RenderError {
    fn from(err: fmt::Error) -> RenderError {
        RenderError::Fmt(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> RenderError {
        RenderError::Json(err)
    }
}

impl From<serde_yaml::Error> for RenderError {
    fn from(err: serde_yaml::Error) -> RenderError {
        RenderError::Yaml(err)
    }
}

impl From<toml::ser::Error> for RenderError {
    fn from(err: toml::ser::Error) -> RenderError {
        RenderError::Toml(err)
    }
}

fn to_table<'a, I>(entries: I) -> Result<IndexMap<&'a str, String>, fmt::Error>
where
    I: IntoIterator<Item = (&'a str, &'a AnyKey)>,
{
    let mut table = IndexMap::new();
    for (name, key) in entries {
        let mut text = String::new();
        write_key(&mut text, key)?;
        table.insert(name, text);
    }
    Ok(table)
}

fn serialize(table: &IndexMap<&str, String>, format: OutputFormat) -> Result<String, RenderError> {
    let mut out = match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for (name, key) in table {
                writeln!(out, "{} = {}", name, key)?;
            }
            return Ok(out);
        }
        OutputFormat::Json => serde_json::to_string_pretty(table)?,
        OutputFormat::Yaml => serde_yaml::to_string(table)?,
        OutputFormat::Toml => toml::to_string(table)?,
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Renders a single key. Plain text is just the key; the structured formats
/// wrap it in a one-entry table keyed by `name`.
///
/// The result always ends in a newline.
#[instrument(level = "debug", skip(key), fields(key = %key))]
pub fn render_key(name: &str, key: &AnyKey, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::with_capacity(crate::guid::GUID_STRING_LEN + 12);
            write_key(&mut out, key)?;
            out.push('\n');
            Ok(out)
        }
        _ => serialize(&to_table([(name, key)])?, format),
    }
}

/// Renders a list of named keys, keeping their order.
#[instrument(level = "debug", skip(entries))]
pub fn render_table<'a, I>(entries: I, format: OutputFormat) -> Result<String, RenderError>
where
    I: IntoIterator<Item = (&'a str, &'a AnyKey)>,
{
    serialize(&to_table(entries)?, format)
}
