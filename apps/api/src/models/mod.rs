pub mod assessment;
pub mod recommendation;
pub mod resume;
pub mod user;
