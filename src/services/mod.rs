//! Link resolution and merge engine
//!
//! - `merger` / `resolver`: pure functions over link collections
//! - `baseline`: tolerant fetch of the shipped dataset
//! - `sequencer`: bootstrap → resolve → redirect / not-found / dashboard
//! - `link_service`: operations used by a presentation layer

pub mod address;
pub mod analytics;
pub mod baseline;
pub mod click_counter;
mod link_service;
pub mod merger;
pub mod resolver;
pub mod sequencer;
pub mod suggest;

pub use address::AddressContext;
pub use analytics::{AnalyticsSink, NoopAnalytics, TracingAnalytics};
pub use baseline::{
    BaselineSource, EmptyBaseline, FileBaseline, HttpBaseline, StaticBaseline, fetch_baseline,
    source_from_config,
};
pub use click_counter::ClickCounter;
pub use link_service::*;
pub use merger::merge;
pub use resolver::resolve;
pub use sequencer::{
    Bootstrapped, DashboardView, Navigator, RedirectSequencer, SequenceDriver, SequenceState,
    SequencerOptions,
};
pub use suggest::{HostnameSuggester, LinkMetadata, MetadataSuggester};
