//! Operator helper that resolves an installation record from a catalog file.
//!
//! Loads the catalog named by `--catalog` (or `INSTALLATION_CATALOG_PATH`),
//! builds query parameters from the flags, and prints the matched record,
//! image or metadata. `--dump` prints the whole catalog as YAML instead.

use anyhow::{Context, Result, anyhow, bail};
use installation_catalog::{
    CatalogWatch, ContainerRuntime, LOG_FILTER_ENV, MachineRole, QueryParameters, VersionSpec,
    default_catalog_path, parse_roles,
};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args = CliArgs::parse(env::args_os().skip(1))?;
    let catalog_path = match args.catalog.clone().or_else(default_catalog_path) {
        Some(path) => path,
        None => bail!("no catalog given; pass --catalog PATH or set INSTALLATION_CATALOG_PATH"),
    };

    let watch = CatalogWatch::new(&catalog_path)?;
    let catalog = watch
        .load()
        .with_context(|| format!("loading {}", catalog_path.display()))?;

    let params = match args.mode {
        Mode::Dump => {
            print!("{}", catalog.to_yaml()?);
            return Ok(());
        }
        Mode::Lookup(params) => params,
    };

    match args.field {
        Field::Record => {
            let record = catalog.find(&params)?;
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        Field::Image => println!("{}", catalog.image(&params)?),
        Field::Metadata => {
            let metadata = catalog.metadata(&params)?;
            println!("{}", serde_json::to_string_pretty(metadata)?);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Record,
    Image,
    Metadata,
}

impl Field {
    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "record" => Ok(Self::Record),
            "image" => Ok(Self::Image),
            "metadata" => Ok(Self::Metadata),
            other => bail!("unknown field '{other}' (expected record|image|metadata)"),
        }
    }
}

#[derive(Debug)]
enum Mode {
    Dump,
    Lookup(QueryParameters),
}

#[derive(Debug)]
struct CliArgs {
    catalog: Option<PathBuf>,
    field: Field,
    mode: Mode,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Self> {
        let mut catalog: Option<PathBuf> = None;
        let mut field = Field::Record;
        let mut dump = false;
        let mut os: Option<String> = None;
        let mut roles: Vec<MachineRole> = Vec::new();
        let mut kubelet: Option<String> = None;
        let mut control_plane = String::new();
        let mut runtime_name: Option<String> = None;
        let mut runtime_version: Option<String> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?)),
                "--os" => os = Some(next_value(&mut args, "--os")?),
                "--role" => roles.extend(parse_roles(&next_value(&mut args, "--role")?)),
                "--kubelet" => kubelet = Some(next_value(&mut args, "--kubelet")?),
                "--control-plane" => control_plane = next_value(&mut args, "--control-plane")?,
                "--runtime-name" => runtime_name = Some(next_value(&mut args, "--runtime-name")?),
                "--runtime-version" => {
                    runtime_version = Some(next_value(&mut args, "--runtime-version")?)
                }
                "--field" => field = Field::from_str(&next_value(&mut args, "--field")?)?,
                "--dump" => dump = true,
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}"),
            }
        }

        if dump {
            return Ok(Self {
                catalog,
                field,
                mode: Mode::Dump,
            });
        }

        let os = os.ok_or_else(|| anyhow!("missing --os\n{}", usage()))?;
        if roles.is_empty() {
            bail!("at least one --role is required\n{}", usage());
        }
        let kubelet = kubelet.ok_or_else(|| anyhow!("missing --kubelet\n{}", usage()))?;
        let runtime_name =
            runtime_name.ok_or_else(|| anyhow!("missing --runtime-name\n{}", usage()))?;
        let runtime_version =
            runtime_version.ok_or_else(|| anyhow!("missing --runtime-version\n{}", usage()))?;

        let version = VersionSpec::new(
            kubelet,
            control_plane,
            ContainerRuntime::new(runtime_name, runtime_version),
        );
        Ok(Self {
            catalog,
            field,
            mode: Mode::Lookup(QueryParameters::new(os, roles, version)),
        })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: installation-lookup [--catalog PATH] --os OS --role ROLE [--role ROLE ...] --kubelet VERSION [--control-plane VERSION] --runtime-name NAME --runtime-version VERSION [--field record|image|metadata]\n\
       installation-lookup [--catalog PATH] --dump\n\
Resolves the first installation record matching the OS, roles and exact versions. The catalog defaults to $INSTALLATION_CATALOG_PATH.\n"
}
