//! Probabilistic creature acquisition and synthesis for Critterforge.
//!
//! Provides weighted grade sampling over declarative egg pools, per-pool
//! pity counters, the hatch flow, and the synthesis (merge) resolver with
//! recipe lookup, grade upgrades, mutation and great-success rolls. All
//! state lives behind the traits in [`ports`]; [`store`] ships in-memory and
//! file-backed implementations.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod pity;
pub mod ports;
pub mod sampler;
pub mod store;
pub mod synthesis;

pub use analytics::{AnalyticsEvent, ChannelSink, MemorySink, NullSink};
pub use config::EngineConfig;
pub use engine::{
    Engine, HatchOutcome, HatchRequest, HatchedCreature, Services, SynthesisOutcome,
    SynthesisRequest,
};
pub use error::{EngineError, EngineResult, ErrorKind, StoreError, StoreResult};
pub use pity::{PityDecision, PityFloor, PityRules};
pub use ports::{Cost, Mission};
pub use sampler::{GradeTable, PoolConfig, PoolRegistry};
pub use store::{FailPoint, FilePityStore, MemoryStore};
pub use synthesis::{MergeType, SynthesisOdds};
