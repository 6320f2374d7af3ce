pub mod auto_loan;
pub mod budget;
pub mod debt;
pub mod mortgage;
pub mod real_estate;
pub mod regions;
pub mod savings;
pub mod scenario;
