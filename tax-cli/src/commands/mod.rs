pub mod deductions;
pub mod quote;
pub mod tax;
