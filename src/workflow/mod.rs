pub mod convert_ctx;
pub mod convert_flow;

pub use convert_ctx::ConvertCtx;
pub use convert_flow::{ConvertFlow, FlowOutcome};
