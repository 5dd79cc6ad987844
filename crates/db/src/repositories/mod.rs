pub mod branches;
pub mod employees;
pub mod postings;
pub mod shifts;
pub mod signups;
pub mod skills;
pub mod users;
pub mod volunteers;
