//! Job request validation, environment resolution, and execution.
pub mod environment;
pub mod executor;
pub mod invocation;
pub mod request;

pub use environment::{
    device_assignment, resolve_environment, DeviceAssignment, HostEnvironment,
    ResolvedEnvironment,
};
pub use executor::{execute_plan, plan_job, LaunchContext, LaunchPlan, PROGRAM_STEP_LABEL};
pub use invocation::{build_program_args, derive_output_dir, prepare_output_dir, OutputLocation};
pub use request::{
    ExecutionMode, JobRequest, ModelPreset, MsaMode, Platform, RawJobRequest, ValidationError,
};
