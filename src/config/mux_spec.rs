//! Parses one `-m` mux spec: `<src>=<dst>[,OPT=val]…`. `src`/`dst` are
//! either a stream name or a 1-based numeric index, resolved later by the
//! supervisor once every stream spec has been parsed.

use crate::config::error::ConfigError;
use crate::filter::Filter;

#[derive(Debug, Clone)]
pub struct MuxSpec {
    pub src_key: String,
    pub dst_key: String,
    pub name: Option<String>,
    pub ena_fwd: bool,
    pub ena_rev: bool,
    pub filter_fwd: Filter,
    pub filter_rev: Filter,
}

pub fn parse_mux_spec(spec: &str) -> Result<MuxSpec, ConfigError> {
    let mut parts = spec.split(',');
    let head = parts.next().ok_or_else(|| ConfigError::InvalidSpec(spec.to_owned()))?;
    let (src_key, dst_key) = head
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidSpec(spec.to_owned()))?;
    if src_key.is_empty() || dst_key.is_empty() {
        return Err(ConfigError::InvalidSpec(spec.to_owned()));
    }

    let mut name = None;
    let mut ena_fwd = true;
    let mut ena_rev = true;
    let mut filter_fwd = Filter::parse("").expect("empty filter spec always parses");
    let mut filter_rev = Filter::parse("").expect("empty filter spec always parses");

    for token in parts {
        if token.is_empty() {
            continue;
        }
        let (key, val) = token
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidSpec(spec.to_owned()))?;
        match key.to_ascii_uppercase().as_str() {
            "N" => name = Some(val.to_owned()),
            "EF" => ena_fwd = parse_on_off(key, val)?,
            "ER" => ena_rev = parse_on_off(key, val)?,
            "FF" => {
                filter_fwd = Filter::parse(val).map_err(|_| ConfigError::InvalidFilter(val.to_owned()))?
            }
            "FR" => {
                filter_rev = Filter::parse(val).map_err(|_| ConfigError::InvalidFilter(val.to_owned()))?
            }
            _ => {}
        }
    }

    Ok(MuxSpec {
        src_key: src_key.to_owned(),
        dst_key: dst_key.to_owned(),
        name,
        ena_fwd,
        ena_rev,
        filter_fwd,
        filter_rev,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_src_dst_and_options() {
        let m = parse_mux_spec("a=b,N=mux1,ER=off,FF=NMEA-GN-GGA").unwrap();
        assert_eq!(m.src_key, "a");
        assert_eq!(m.dst_key, "b");
        assert_eq!(m.name.as_deref(), Some("mux1"));
        assert!(!m.ena_rev);
        assert!(m.filter_fwd.pass("NMEA-GN-GGA"));
        assert!(!m.filter_fwd.pass("NMEA-GN-RMC"));
    }

    #[test]
    fn accepts_numeric_indices() {
        let m = parse_mux_spec("1=2").unwrap();
        assert_eq!(m.src_key, "1");
        assert_eq!(m.dst_key, "2");
    }

    #[test]
    fn rejects_missing_equals() {
        assert!(parse_mux_spec("a-b").is_err());
    }
}
