use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::{command, Arg, ArgMatches};
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

use devpkey::{
    all_keys, render_key, render_table, resolve_key, AnyKey, KeyFile, OutputFormat, DEFAULT_KEY,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = command!()
        .about("Prints Windows property keys as {fmtid},pid")
        .arg(
            Arg::new("key")
                .value_name("KEY")
                .help("A well-known key name such as DEVPKEY_Device_Children, or {fmtid},pid")
                .conflicts_with("list"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .help("Prints the key's name alongside it, as NAME = key")
                .conflicts_with("list"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("Prints every known key"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .possible_values(OutputFormat::NAMES)
                .default_value("text")
                .help("The output format")
                .takes_value(true),
        )
        .arg(
            Arg::new("keys")
                .short('k')
                .long("keys")
                .value_name("FILE")
                .help("A TOML, YAML, or JSON file of extra named keys")
                .takes_value(true),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        error!("{}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            debug!("caused by: {}", cause);
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let format: OutputFormat = matches.value_of("format").unwrap_or("text").parse()?;
    let extra = matches
        .value_of("keys")
        .map(|path| KeyFile::load(Path::new(path)))
        .transpose()?;

    let text = if matches.is_present("list") {
        let keys = all_keys(extra.as_ref());
        render_table(keys.iter().map(|(name, key)| (*name, key)), format)?
    } else {
        let (name, key) = match matches.value_of("key") {
            Some(arg) => resolve_key(arg, extra.as_ref())?,
            None => ("DEVPKEY_Device_Parent".to_owned(), AnyKey::Device(DEFAULT_KEY)),
        };
        debug!(%name, kind = key.kind(), "printing key");
        if matches.is_present("name") {
            render_table(Some((name.as_str(), &key)), format)?
        } else {
            render_key(&name, &key, format)?
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    trace!("done");
    Ok(())
}
