pub mod branches;
pub mod health;
pub mod postings;
pub mod shifts;
pub mod signups;
pub mod skills;
pub mod users;
