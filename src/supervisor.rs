//! Owns the flat Streams and Muxes collections and builds them from parsed
//! CLI specs, enforcing the invariants in §3. All configuration errors are
//! collected and reported together (§7) — the program never opens a
//! transport until every spec has validated.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::error::is_valid_name;
use crate::config::{parse_mux_spec, parse_stream_spec, ConfigError, MuxSpec, StreamSpec};
use crate::mux::Mux;
use crate::stream::Stream;
use crate::transport::file_io::{FileInTransport, FileOutTransport};
use crate::transport::ntrip_client::NtripClientTransport;
use crate::transport::tcp_client::TcpClientTransport;
use crate::transport::tcp_server::TcpServerTransport;
use crate::transport::{Mode, Transport};

pub struct Supervisor {
    pub streams: Vec<Arc<Stream>>,
    pub muxes: Vec<Arc<Mux>>,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("streams", &self.streams.iter().map(|s| &s.name).collect::<Vec<_>>())
            .field("muxes", &self.muxes.iter().map(|m| &m.name).collect::<Vec<_>>())
            .finish()
    }
}

impl Supervisor {
    pub fn find_stream(&self, key: &str) -> Option<&Arc<Stream>> {
        self.streams
            .iter()
            .find(|s| s.name == key)
            .or_else(|| resolve_index(key, &self.streams))
    }

    pub fn find_mux(&self, key: &str) -> Option<&Arc<Mux>> {
        self.muxes
            .iter()
            .find(|m| m.name == key)
            .or_else(|| resolve_index(key, &self.muxes))
    }

    pub fn build(stream_specs: &[String], mux_specs: &[String]) -> Result<Arc<Supervisor>, Vec<ConfigError>> {
        let mut errors = Vec::new();

        if stream_specs.is_empty() {
            errors.push(ConfigError::MissingStreams);
        }
        if mux_specs.is_empty() {
            errors.push(ConfigError::MissingMuxes);
        }

        let mut parsed_streams = Vec::new();
        for spec in stream_specs {
            match parse_stream_spec(spec) {
                Ok(p) => parsed_streams.push(p),
                Err(e) => errors.push(e),
            }
        }

        let stream_names = assign_stream_names(&parsed_streams, &mut errors);

        let mut streams = Vec::new();
        for (spec, name) in parsed_streams.iter().zip(stream_names.iter()) {
            match build_stream(spec, name.clone()) {
                Ok(s) => streams.push(s),
                Err(e) => errors.push(e),
            }
        }

        let mut parsed_muxes = Vec::new();
        for spec in mux_specs {
            match parse_mux_spec(spec) {
                Ok(p) => parsed_muxes.push(p),
                Err(e) => errors.push(e),
            }
        }

        let mux_names = assign_mux_names(&parsed_muxes, &streams, &mut errors);

        let mut muxes = Vec::new();
        for (spec, name) in parsed_muxes.iter().zip(mux_names.iter()) {
            let src = resolve_endpoint(&spec.src_key, &streams, name, &mut errors);
            let dst = resolve_endpoint(&spec.dst_key, &streams, name, &mut errors);
            let (Some(src), Some(dst)) = (src, dst) else { continue };
            if src.name == dst.name {
                errors.push(ConfigError::IdenticalSrcDst(name.clone()));
                continue;
            }
            match Mux::new(name.clone(), src, dst, spec.filter_fwd.clone(), spec.filter_rev.clone()) {
                Ok(mux) => {
                    mux.set_ena_fwd(spec.ena_fwd);
                    mux.set_ena_rev(spec.ena_rev);
                    muxes.push(mux);
                }
                Err(e) => errors.push(ConfigError::IdenticalSrcDst(e.to_string())),
            }
        }

        for stream in &streams {
            let referenced = muxes.iter().any(|m| m.src.name == stream.name || m.dst.name == stream.name);
            if !referenced {
                errors.push(ConfigError::UnusedStream(stream.name.clone()));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Arc::new(Supervisor { streams, muxes }))
    }
}

fn resolve_index<'a, T: Named>(key: &str, items: &'a [Arc<T>]) -> Option<&'a Arc<T>> {
    let idx: usize = key.parse().ok()?;
    idx.checked_sub(1).and_then(|i| items.get(i))
}

trait Named {
    fn name(&self) -> &str;
}

impl Named for Stream {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Mux {
    fn name(&self) -> &str {
        &self.name
    }
}

fn resolve_endpoint(
    key: &str,
    streams: &[Arc<Stream>],
    mux_name: &str,
    errors: &mut Vec<ConfigError>,
) -> Option<Arc<Stream>> {
    if let Some(s) = streams.iter().find(|s| s.name == key) {
        return Some(s.clone());
    }
    if let Ok(idx) = key.parse::<usize>() {
        if idx >= 1 {
            if let Some(s) = streams.get(idx - 1) {
                return Some(s.clone());
            }
        }
    }
    errors.push(ConfigError::UnresolvedMuxEndpoint {
        mux: mux_name.to_owned(),
        key: key.to_owned(),
    });
    None
}

fn assign_stream_names(specs: &[StreamSpec], errors: &mut Vec<ConfigError>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        let name = spec
            .name
            .clone()
            .unwrap_or_else(|| format!("{}{}", spec.scheme, idx + 1));
        if !is_valid_name(&name) {
            errors.push(ConfigError::InvalidName(name.clone()));
        }
        if !seen.insert(name.clone()) {
            errors.push(ConfigError::DuplicateName(name.clone()));
        }
        names.push(name);
    }
    names
}

fn assign_mux_names(specs: &[MuxSpec], streams: &[Arc<Stream>], errors: &mut Vec<ConfigError>) -> Vec<String> {
    let mut seen: HashSet<String> = streams.iter().map(|s| s.name.clone()).collect();
    let mut names = Vec::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        let name = spec.name.clone().unwrap_or_else(|| format!("mux{}", idx + 1));
        if !is_valid_name(&name) {
            errors.push(ConfigError::InvalidName(name.clone()));
        }
        if !seen.insert(name.clone()) {
            errors.push(ConfigError::DuplicateName(name.clone()));
        }
        names.push(name);
    }
    names
}

fn build_stream(spec: &StreamSpec, name: String) -> Result<Arc<Stream>, ConfigError> {
    let (transport, default_mode): (Arc<dyn Transport>, Mode) = match spec.scheme.as_str() {
        "tcpsvr" => (TcpServerTransport::new(normalize_bind(&spec.target)), Mode::Rw),
        "tcpcli" => (TcpClientTransport::new(spec.target.clone()), Mode::Rw),
        "filein" => (FileInTransport::new(spec.target.clone()), Mode::Ro),
        "fileout" => (FileOutTransport::new(spec.target.clone()), Mode::Wo),
        "ntripcli" => {
            let (host, port, mountpoint, auth) = parse_ntrip_target(&spec.target)?;
            (NtripClientTransport::new(host, port, mountpoint, auth), Mode::Ro)
        }
        other => return Err(ConfigError::UnknownScheme(other.to_owned())),
    };
    let mode = spec.mode_override.unwrap_or(default_mode);
    let disp = format!("{}://{}", spec.scheme, spec.target);

    let stream = Stream::new(
        name,
        mode,
        spec.residual_opts.clone(),
        disp,
        transport,
        spec.filter_read.clone(),
        spec.filter_write.clone(),
    );
    stream.set_ena_read(spec.ena_read);
    stream.set_ena_write(spec.ena_write);
    Ok(stream)
}

fn normalize_bind(target: &str) -> String {
    if let Some(port) = target.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        target.to_owned()
    }
}

type NtripTarget = (String, u16, String, Option<(String, String)>);

fn parse_ntrip_target(target: &str) -> Result<NtripTarget, ConfigError> {
    let (auth, rest) = match target.split_once('@') {
        Some((creds, rest)) => {
            let (user, pass) = creds.split_once(':').unwrap_or((creds, ""));
            (Some((user.to_owned(), pass.to_owned())), rest)
        }
        None => (None, target),
    };
    let (host_port, mountpoint) = rest.split_once('/').unwrap_or((rest, ""));
    let (host, port_str) = host_port
        .rsplit_once(':')
        .ok_or_else(|| ConfigError::InvalidSpec(target.to_owned()))?;
    let port: u16 = port_str
        .parse()
        .map_err(|_| ConfigError::InvalidSpec(target.to_owned()))?;
    Ok((host.to_owned(), port, mountpoint.to_owned(), auth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_two_streams_and_one_mux() {
        let sup = Supervisor::build(
            &["tcpsvr://:0,N=a".to_owned(), "tcpsvr://:0,N=b".to_owned()],
            &["a=b".to_owned()],
        )
        .unwrap();
        assert_eq!(sup.streams.len(), 2);
        assert_eq!(sup.muxes.len(), 1);
        assert_eq!(sup.muxes[0].name, "mux1");
    }

    #[test]
    fn duplicate_stream_names_are_rejected_before_opening_anything() {
        let err = Supervisor::build(
            &["tcpsvr://:0,N=x".to_owned(), "tcpsvr://:0,N=x".to_owned()],
            &["x=x".to_owned()],
        )
        .unwrap_err();
        assert!(err.iter().any(|e| matches!(e, ConfigError::DuplicateName(n) if n == "x")));
    }

    #[test]
    fn unreferenced_stream_is_a_configuration_error() {
        let err = Supervisor::build(
            &[
                "tcpsvr://:0,N=a".to_owned(),
                "tcpsvr://:0,N=b".to_owned(),
                "tcpsvr://:0,N=c".to_owned(),
            ],
            &["a=b".to_owned()],
        )
        .unwrap_err();
        assert!(err.iter().any(|e| matches!(e, ConfigError::UnusedStream(n) if n == "c")));
    }

    #[test]
    fn mux_endpoints_resolve_by_numeric_index() {
        let sup = Supervisor::build(
            &["tcpsvr://:0,N=a".to_owned(), "tcpsvr://:0,N=b".to_owned()],
            &["1=2".to_owned()],
        )
        .unwrap();
        assert_eq!(sup.muxes[0].src.name, "a");
        assert_eq!(sup.muxes[0].dst.name, "b");
    }

    #[test]
    fn unresolved_mux_endpoint_is_reported() {
        let err = Supervisor::build(
            &["tcpsvr://:0,N=a".to_owned(), "tcpsvr://:0,N=b".to_owned()],
            &["a=ghost".to_owned()],
        )
        .unwrap_err();
        assert!(err
            .iter()
            .any(|e| matches!(e, ConfigError::UnresolvedMuxEndpoint { key, .. } if key == "ghost")));
    }
}
