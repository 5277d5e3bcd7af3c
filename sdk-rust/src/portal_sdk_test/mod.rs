mod backend;

pub use backend::{MockBackend, MockResult, TrackedRequest};
