//! Azure App Service provisioning demo
//!
//! Creates a resource group, an App Service plan and a web app, shows the
//! app's URL, waits for the operator, then deletes what it created. The
//! workflow only sees the `appsvc_cloud` traits, so it runs unchanged against
//! Azure or a test double.

pub mod naming;
pub mod pause;
pub mod workflow;

pub use pause::{CancelHandle, LinePause, NoWait, Pause, PauseOutcome, StdinPause};
pub use workflow::{Outcome, RollbackPolicy, Workflow, WorkflowError};
