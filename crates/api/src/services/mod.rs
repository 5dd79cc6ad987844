pub mod accounts;
pub mod shifts;
