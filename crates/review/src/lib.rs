pub mod composer;
pub mod config;
pub mod draft;
pub mod http;
pub mod ports;

pub use composer::{ComposeError, ReviewComposer};
pub use config::{ConfigError, ServiceConfig};
pub use draft::{MenuContext, ReceiptAttachment, ReviewDraft, ReviewSubmission};
pub use http::{HttpImageHost, HttpReviewSubmitter};
pub use ports::{ImageHost, PortError, ReviewSubmitter, Session, SessionProvider, StaticSession};
