//! Gateway namespace: HTTP entrypoint.

mod http;

pub use http::{
    ErrorMessage, ErrorResponse, GatewayHealthResponse, GatewayState, TURN_TIMEOUT_SECS,
    UserResponse, parse_scenario_request, router, router_with_resolver, run_http,
};
