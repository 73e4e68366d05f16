pub mod assemble;
pub mod budgets;
pub mod chat;
pub mod status;
