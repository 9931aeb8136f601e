pub mod pipeline;

pub use pipeline::{BuildContext, SubmissionPipeline};
