pub mod model;
pub mod registry;
pub mod routes;

pub use registry::{LearnerSession, SessionHandle, SessionRegistry};
pub use routes::routes;
