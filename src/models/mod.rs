pub mod entries;
pub mod post;
pub mod profile;
pub mod user;

pub use entries::{Authored, Entries, EntryError, Entry, Member};
pub use post::{Comment, Like, Post, TextInput};
pub use profile::{
    Education, EducationInput, Experience, ExperienceInput, Profile, ProfileInput, ProfileView,
    SkillsInput, Social,
};
pub use user::{LoginInput, RegisterInput, User, UserSummary, UserView};
