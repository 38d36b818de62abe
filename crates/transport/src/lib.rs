#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod callback;
pub use callback::CallbackIds;

mod http;
pub use http::JsonpTransport;

mod jsonp;
pub use jsonp::{JsonpBody, decode, with_callback};

mod registry;
pub use registry::{CallbackRegistry, PendingCall};
