pub mod invite;
pub mod job;
pub mod member;
pub mod profile;

pub use invite::{Invite, PasswordResetInvite, TokenKind};
pub use job::{CareerField, ExperienceLevel, Job};
pub use member::{Member, MemberStatus};
pub use profile::Profile;
