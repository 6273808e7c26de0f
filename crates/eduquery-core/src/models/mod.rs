pub mod assessment;
pub mod question;
pub mod submission;
pub mod user;
