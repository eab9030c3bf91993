//! Parses one `-s` stream spec: `<transport-url>[,OPT=val]…`.
//!
//! Options consumed by the core (`ER`, `EW`, `FR`, `FW`) are stripped;
//! everything else — including the transport's own `N=`, `H=`, `R=`, `C=`,
//! `S=`, bare `RO`/`WO` — is retained verbatim in `residual_opts` and
//! handed to the transport layer. That residual is also what the report
//! file's `strs[].opts` field reports (§6.1).

use crate::config::error::ConfigError;
use crate::filter::Filter;
use crate::transport::Mode;

#[derive(Debug, Clone)]
pub struct StreamSpec {
    pub scheme: String,
    pub target: String,
    pub name: Option<String>,
    pub ena_read: bool,
    pub ena_write: bool,
    pub filter_read: Filter,
    pub filter_write: Filter,
    pub mode_override: Option<Mode>,
    pub residual_opts: String,
}

pub fn parse_stream_spec(spec: &str) -> Result<StreamSpec, ConfigError> {
    let mut parts = spec.split(',');
    let url = parts.next().ok_or_else(|| ConfigError::InvalidSpec(spec.to_owned()))?;
    let (scheme, target) = url
        .split_once("://")
        .ok_or_else(|| ConfigError::InvalidSpec(spec.to_owned()))?;

    let mut name = None;
    let mut ena_read = true;
    let mut ena_write = true;
    let mut filter_read = Filter::parse("").expect("empty filter spec always parses");
    let mut filter_write = Filter::parse("").expect("empty filter spec always parses");
    let mut mode_override = None;
    let mut residual: Vec<String> = Vec::new();

    for token in parts {
        if token.is_empty() {
            continue;
        }
        if let Some((key, val)) = token.split_once('=') {
            match key.to_ascii_uppercase().as_str() {
                "ER" => ena_read = parse_on_off(key, val)?,
                "EW" => ena_write = parse_on_off(key, val)?,
                "FR" => {
                    filter_read = Filter::parse(val).map_err(|_| ConfigError::InvalidFilter(val.to_owned()))?
                }
                "FW" => {
                    filter_write = Filter::parse(val).map_err(|_| ConfigError::InvalidFilter(val.to_owned()))?
                }
                "N" => {
                    name = Some(val.to_owned());
                    residual.push(token.to_owned());
                }
                _ => residual.push(token.to_owned()),
            }
        } else {
            match token.to_ascii_uppercase().as_str() {
                "RO" => mode_override = Some(Mode::Ro),
                "WO" => mode_override = Some(Mode::Wo),
                _ => {}
            }
            residual.push(token.to_owned());
        }
    }

    Ok(StreamSpec {
        scheme: scheme.to_ascii_lowercase(),
        target: target.to_owned(),
        name,
        ena_read,
        ena_write,
        filter_read,
        filter_write,
        mode_override,
        residual_opts: residual.join(","),
    })
}

fn parse_on_off(key: &str, val: &str) -> Result<bool, ConfigError> {
    match val {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ConfigError::InvalidOption {
            key: key.to_owned(),
            value: val.to_owned(),
        }),
    }
}
