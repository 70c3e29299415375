//! Portal engine: probe strategies, run cancellation and the orchestrator runtime.
mod backend_oracle;
mod engine;
mod error;
mod http;
mod opaque_fetch;
mod orchestrator;
mod resource_load;
mod settings;
mod settle;
mod sink;
mod strategy;
mod target;

pub use backend_oracle::BackendOracleProbe;
pub use engine::EngineHandle;
pub use error::{EngineError, ProbeFault};
pub use opaque_fetch::OpaqueFetchProbe;
pub use orchestrator::{Driver, Orchestrator, OrchestratorHandle};
pub use resource_load::ResourceLoadProbe;
pub use settings::ProbeSettings;
pub use settle::within;
pub use sink::{ChannelStatusSink, Navigator, StatusSink};
pub use strategy::{Strategy, StrategySet};
pub use target::{backend_url, resource_url, target_url};
pub use tokio_util::sync::CancellationToken;
