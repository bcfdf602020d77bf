pub mod eligibility;
pub mod loans;
pub mod salary;
