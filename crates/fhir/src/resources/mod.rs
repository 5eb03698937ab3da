//! Resource shapes registered in [`Resource`](crate::Resource).

mod bundle;
mod observation;
mod organization;
mod patient;

pub use bundle::{Bundle, BundleEntry};
pub use observation::{Observation, ObservationComponent, ObservationEffective, ObservationValue};
pub use organization::Organization;
pub use patient::{Patient, PatientDeceased, PatientMultipleBirth};
