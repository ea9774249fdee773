pub mod cors;
pub mod request_trace;
pub mod token_gate;

pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use token_gate::TokenGate;
