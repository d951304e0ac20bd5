pub mod procedure;
pub mod rate_table;
pub mod result;
pub mod rule;

pub use procedure::{normalize_physician_name, normalize_procedure_code, ProcedureBillingEntry};
pub use rate_table::{RateTable, RateTableEntry};
pub use result::{CalculatedPaymentResult, CalculatedProcedure};
pub use rule::{
    ComboRule, DoctorPaymentRule, FixedPaymentRule, MainProcedureBasis, OnlyMainProcedureRule,
    PercentageRule, ProcedureRateRule,
};
