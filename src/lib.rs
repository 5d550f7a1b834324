//! member-persona: digital personas for association members
//!
//! Turns a member's profile and activity history into a tagged,
//! scored persona with a short introduction and an engagement analysis.
//!
//! ```no_run
//! use member_persona::persona::{MemberProfile, PersonaAssembler};
//!
//! let mut profile = MemberProfile::new("m-1");
//! profile.name = Some("张三".into());
//! profile.professional_field = Some("自动化,机器人".into());
//!
//! let persona = PersonaAssembler::default()
//!     .build_persona(Some(&profile), None, None)
//!     .unwrap();
//! println!("{}", persona.introduction);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod persona;
pub mod snapshot;
pub mod version;

pub use config::AppConfig;
pub use error::{Error, ErrorCode, Result};
pub use persona::{Persona, PersonaAssembler, PersonaPolicy};
pub use snapshot::MemberSnapshot;
