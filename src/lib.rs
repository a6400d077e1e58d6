pub mod cell;
pub mod config;
pub mod error;
pub mod family;
pub mod model;
pub mod placement;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod topology;

pub use cell::{Biomass, Cell};
pub use config::{ModelConfig, SessionConfig};
pub use error::{ConfigError, ModelError};
pub use family::{Family, FamilyId, Harvester, HarvesterId};
pub use model::Model;
pub use session::{Session, SessionBuilder};
