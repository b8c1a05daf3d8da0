pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;

pub use bootcamp::Bootcamp;
pub use course::{Course, MinimumSkill};
pub use review::Review;
pub use user::{Role, User};
