#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod cli;
pub use cli::{Cli, Command, LogFormat};

mod commands;
pub use commands::{Report, render_lookup, render_ping, render_search, render_submission, run};

mod logging;
pub use logging::{init_tracing, log_config_summary};

mod ticket;
pub use ticket::load_ticket;

// Re-export for convenience
pub use clap;
pub use eyre;
