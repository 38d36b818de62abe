#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod clock;
pub use clock::ManualClock;

mod memory;
pub use memory::MemoryCache;

mod response;
pub use response::{Cacheable, ResponseCache};

mod signature;
pub use signature::RequestSignature;
