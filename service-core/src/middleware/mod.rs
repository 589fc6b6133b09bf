pub mod tracing;

pub use self::tracing::{REQUEST_ID_HEADER, request_id, request_id_middleware, request_span};
