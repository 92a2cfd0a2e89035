pub mod provisioner;

pub use provisioner::{ProvisionPlan, ProvisionReport, Provisioner};
