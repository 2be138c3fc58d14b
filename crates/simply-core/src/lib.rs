pub mod config;
pub mod error;
pub mod outcome;
pub mod output;
pub mod payload;
pub mod preview;
pub mod render;
pub mod session;
pub mod transcript;
pub mod validate;

pub use config::SimplyConfig;
pub use error::{Result, SimplyError};
pub use outcome::{ApiResult, DeployData, Failure, FailureKind, GenerationData};
pub use payload::RequestPayload;
pub use session::{Session, Target};
