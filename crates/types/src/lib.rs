#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod de;

mod ejecutora;
pub use ejecutora::{Ejecutora, LookupResponse, SearchResponse};

mod error;
pub use error::SigaError;

mod outcome;
pub use outcome::{Outcome, PingResponse, UploadAck};

mod request;
pub use request::{Action, ApiRequest, UploadRequest};

mod ticket;
pub use ticket::{TicketForm, TicketReceipt};
