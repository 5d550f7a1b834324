//! Persona engine. Derives a member's tags, ability scores, introduction
//! and analysis from an already-fetched profile and activity history.
//!
//! Everything here is synchronous and CPU-only. The only shared state is the
//! random source, which is passed in explicitly (or defaults to the calling
//! thread's generator).

pub mod assembler;
pub mod narrative;
pub mod policy;
pub mod random;
pub mod scores;
pub mod tags;
pub mod types;

pub use assembler::PersonaAssembler;
pub use narrative::NarrativeComposer;
pub use policy::{NarrativePolicy, PersonaPolicy, ScorePolicy, TagPolicy};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use scores::ScoreModel;
pub use tags::{TagDeriver, Tenure};
pub use types::{
    labels, ActivityMetrics, ActivityRecord, Axis, MemberProfile, MemberRole, Persona, ScoreAxis,
    Tag, TagCategory,
};
