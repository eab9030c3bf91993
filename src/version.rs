//! Version/copyright/license text shared by `--version` and `GET /version`
//! (§6.1) so the two surfaces can never drift.

use streammux_proto::VersionInfo;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
const COPYRIGHT: &str = "Copyright (c) 2026 the streammux authors";
const LICENSE: &str = "MIT OR Apache-2.0";

pub fn info() -> VersionInfo {
    VersionInfo {
        api: "version".to_owned(),
        version: VERSION.to_owned(),
        copyright: COPYRIGHT.to_owned(),
        license: LICENSE.to_owned(),
    }
}
