//! Command-line surface (§6). Flag parsing is `clap`; the grammar inside
//! each `-s`/`-m`/`-a` value is hand-parsed by the sibling `*_spec`
//! modules — that's domain syntax, not flag syntax.

use clap::{Arg, ArgAction, Command};

pub struct Args {
    pub streams: Vec<String>,
    pub muxes: Vec<String>,
    pub api: Option<String>,
    pub report: Option<String>,
    pub assets: Option<String>,
}

pub fn parse_args() -> Args {
    parse_from(std::env::args_os())
}

pub fn parse_from<I, T>(itr: I) -> Args
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_command().get_matches_from(itr);
    Args {
        streams: matches
            .get_many::<String>("stream")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        muxes: matches
            .get_many::<String>("mux")
            .map(|v| v.cloned().collect())
            .unwrap_or_default(),
        api: matches.get_one::<String>("api").cloned(),
        report: matches.get_one::<String>("report").cloned(),
        assets: matches.get_one::<String>("assets").cloned(),
    }
}

fn build_command() -> Command {
    Command::new("streammux")
        .version(crate::version::VERSION)
        .about("Routes framed GNSS messages between named streams through named muxes")
        .arg(
            Arg::new("stream")
                .short('s')
                .value_name("STREAM_SPEC")
                .help("<transport-url>[,OPT=val]… — repeatable, at least one required")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("mux")
                .short('m')
                .value_name("MUX_SPEC")
                .help("<src>=<dst>[,OPT=val]… — repeatable, at least one required")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("api")
                .short('a')
                .value_name("API_SPEC")
                .help("[<host>]:<port>[/<prefix>] — enable the control API"),
        )
        .arg(
            Arg::new("report")
                .short('r')
                .value_name("PATH")
                .help("write a periodic JSON status report to PATH"),
        )
        .arg(
            Arg::new("assets")
                .short('A')
                .value_name("DIR")
                .help("serve static web-UI assets from DIR instead of the embedded set"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_repeated_stream_and_mux_flags() {
        let args = parse_from([
            "streammux",
            "-s",
            "tcpsvr://:10001,N=a",
            "-s",
            "tcpsvr://:10002,N=b",
            "-m",
            "a=b",
        ]);
        assert_eq!(args.streams.len(), 2);
        assert_eq!(args.muxes, vec!["a=b".to_owned()]);
        assert!(args.api.is_none());
    }

    #[test]
    fn parses_singular_flags() {
        let args = parse_from([
            "streammux",
            "-s",
            "tcpsvr://:10001,N=a",
            "-m",
            "a=a",
            "-a",
            ":8080",
            "-r",
            "/tmp/status.json",
        ]);
        assert_eq!(args.api.as_deref(), Some(":8080"));
        assert_eq!(args.report.as_deref(), Some("/tmp/status.json"));
    }
}
