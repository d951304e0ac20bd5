pub mod eligibility;
pub mod payment;
pub mod resolver;

pub use eligibility::{EligibilityOutcome, EligibilityPolicy, ExclusionReason};
pub use payment::{PaymentRequest, PaymentService};
