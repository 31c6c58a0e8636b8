mod gateway;

pub(crate) use gateway::{GatewayModeRequest, run_gateway_mode};
