pub mod branch;
pub mod posting;
pub mod shift;
pub mod signup;
pub mod skill;
pub mod user;
