//! Domain entities - Objects with identity and lifecycle

mod pipeline_state;

pub use pipeline_state::PipelineState;
