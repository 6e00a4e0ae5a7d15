pub mod email_confirmation;
pub mod profile;
pub mod session;
pub mod subject;
pub mod teacher;
pub mod teacher_review;
pub mod teacher_subject;
pub mod user;

pub use email_confirmation as email_confirmations;
pub use profile as profiles;
pub use session as sessions;
pub use subject as subjects;
pub use teacher as teachers;
pub use teacher_review as teacher_reviews;
pub use teacher_subject as teacher_subjects;
pub use user as users;
