pub mod movies_like;
pub mod movies_review;
pub mod session;
