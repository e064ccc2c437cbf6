pub mod backend;
pub mod dispatcher;
pub mod outcome;
pub mod pacer;

pub use backend::{classify_response, BackendResponse, MessageBackend, SendRequest, TransportError};
pub use dispatcher::Dispatcher;
pub use outcome::{BulkSendReport, BulkSendRequest, FailureKind, SendOutcome, DEFAULT_DELAY_MS};
pub use pacer::{CancelToken, CancellablePacer, Pace, Pacer, SleepPacer};
