pub mod api_spec;
pub mod cli;
pub mod error;
pub mod mux_spec;
pub mod stream_spec;

pub use api_spec::{parse_api_spec, ApiSpec};
pub use cli::Args;
pub use error::ConfigError;
pub use mux_spec::{parse_mux_spec, MuxSpec};
pub use stream_spec::{parse_stream_spec, StreamSpec};
