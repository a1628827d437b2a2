use std::sync::Arc;
use uuid::Uuid;

use super::normalize::build_profile_update;
use crate::auth::IdentityClaim;
use crate::database::{DocumentStore, Repository, StoreError};
use crate::error::{ApiError, FieldError};
use crate::models::{
    EducationInput, ExperienceInput, Post, Profile, ProfileInput, ProfileView, User,
};
use crate::validation::{self, Validate};

/// Profiles, their experience and education entries, and account removal.
///
/// A profile is 1:1 with its user, so loading it by the caller's id is the
/// ownership check for every entry mutation.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Repository<Profile>,
    users: Repository<User>,
    posts: Repository<Post>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            profiles: Repository::new(Arc::clone(&store)),
            users: Repository::new(Arc::clone(&store)),
            posts: Repository::new(store),
        }
    }

    async fn view(&self, profile: Profile) -> Result<ProfileView, ApiError> {
        let user = self.users.find(profile.user_id).await?.map(|u| u.summary());
        Ok(ProfileView { profile, user })
    }

    async fn own_profile(&self, claim: &IdentityClaim) -> Result<Profile, ApiError> {
        self.profiles
            .find_by_owner(claim.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("There is no profile for this user"))
    }

    pub async fn me(&self, claim: &IdentityClaim) -> Result<ProfileView, ApiError> {
        let profile = self.own_profile(claim).await?;
        self.view(profile).await
    }

    pub async fn list(&self) -> Result<Vec<ProfileView>, ApiError> {
        let mut views = Vec::new();
        for profile in self.profiles.list().await? {
            views.push(self.view(profile).await?);
        }
        Ok(views)
    }

    pub async fn by_user(&self, user_id: Uuid) -> Result<ProfileView, ApiError> {
        let profile = self
            .profiles
            .find_by_owner(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))?;
        self.view(profile).await
    }

    /// Create the caller's profile or merge the supplied fields into it.
    /// Fields left out of `input` keep their stored values.
    pub async fn upsert(
        &self,
        claim: &IdentityClaim,
        input: ProfileInput,
    ) -> Result<Profile, ApiError> {
        input.validate()?;

        // status and skills are mandatory only for a brand new profile
        if self.profiles.find_by_owner(claim.user_id).await?.is_none() {
            validation::run([
                validation::required("status", input.status.as_deref(), "Status is required"),
                input
                    .skills
                    .is_none()
                    .then(|| FieldError::new("skills", "Skills is required")),
            ])?;
        }

        let fields = build_profile_update(input, claim.user_id)?
            .into_fields()
            .map_err(StoreError::from)?;

        let profile = self
            .profiles
            .upsert_by_owner(claim.user_id, &Profile::empty(claim.user_id), fields)
            .await?;

        tracing::debug!("Profile {} upserted for {}", profile.id, claim.user_id);
        Ok(profile)
    }

    /// Remove the caller's profile, posts and account
    pub async fn delete_account(&self, claim: &IdentityClaim) -> Result<(), ApiError> {
        let profiles = self.profiles.delete_by_owner(claim.user_id).await?;
        let posts = self.posts.delete_by_owner(claim.user_id).await?;
        let removed = self.users.delete(claim.user_id).await?;

        if !removed {
            return Err(ApiError::not_found("User not found"));
        }

        tracing::info!(
            "Account {} deleted ({} profile, {} posts)",
            claim.user_id,
            profiles,
            posts
        );
        Ok(())
    }

    pub async fn add_experience(
        &self,
        claim: &IdentityClaim,
        input: ExperienceInput,
    ) -> Result<Profile, ApiError> {
        let entry = input.into_entry()?;
        let mut profile = self.own_profile(claim).await?;

        profile.experience.insert_front(entry);
        self.profiles.save(&profile).await?;

        Ok(profile)
    }

    pub async fn remove_experience(
        &self,
        claim: &IdentityClaim,
        exp_id: Uuid,
    ) -> Result<Profile, ApiError> {
        let mut profile = self.own_profile(claim).await?;

        profile
            .experience
            .remove(exp_id)
            .map_err(|e| e.describe("Experience"))?;
        self.profiles.save(&profile).await?;

        Ok(profile)
    }

    pub async fn add_education(
        &self,
        claim: &IdentityClaim,
        input: EducationInput,
    ) -> Result<Profile, ApiError> {
        let entry = input.into_entry()?;
        let mut profile = self.own_profile(claim).await?;

        profile.education.insert_front(entry);
        self.profiles.save(&profile).await?;

        Ok(profile)
    }

    pub async fn remove_education(
        &self,
        claim: &IdentityClaim,
        edu_id: Uuid,
    ) -> Result<Profile, ApiError> {
        let mut profile = self.own_profile(claim).await?;

        profile
            .education
            .remove(edu_id)
            .map_err(|e| e.describe("Education"))?;
        self.profiles.save(&profile).await?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::{SkillsInput, TextInput};
    use crate::services::PostService;

    struct Fixture {
        store: Arc<dyn DocumentStore>,
        service: ProfileService,
    }

    impl Fixture {
        fn new() -> Self {
            let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
            Self {
                service: ProfileService::new(Arc::clone(&store)),
                store,
            }
        }

        async fn user(&self, name: &str) -> IdentityClaim {
            let user = User::new(name, format!("{}@example.com", name), None);
            Repository::<User>::new(Arc::clone(&self.store)).save(&user).await.unwrap();
            IdentityClaim { user_id: user.id }
        }
    }

    fn base_input() -> ProfileInput {
        ProfileInput {
            status: Some("dev".to_string()),
            skills: Some(SkillsInput::List(vec!["go".to_string(), "rust".to_string()])),
            ..Default::default()
        }
    }

    fn experience(title: &str) -> ExperienceInput {
        ExperienceInput {
            title: Some(title.to_string()),
            company: Some("Acme".to_string()),
            from: Some("2020-01-01".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn reupsert_merges_instead_of_replacing() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;

        let first = fx.service.upsert(&alice, base_input()).await.unwrap();
        let second = fx
            .service
            .upsert(
                &alice,
                ProfileInput {
                    company: Some("Acme".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.status.as_deref(), Some("dev"));
        assert_eq!(second.skills, vec!["go", "rust"]);
        assert_eq!(second.company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn new_profile_requires_status_and_skills() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;

        let err = fx
            .service
            .upsert(
                &alice,
                ProfileInput {
                    company: Some("Acme".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            ApiError::ValidationFailed(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn partial_social_keeps_stored_social() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let mut input = base_input();
        input.youtube = Some("youtube.com/a".to_string());
        input.twitter = Some("twitter.com/a".to_string());
        input.instagram = Some("instagram.com/a".to_string());
        input.linkedin = Some("linkedin.com/a".to_string());
        input.facebook = Some("facebook.com/a".to_string());
        let first = fx.service.upsert(&alice, input).await.unwrap();
        assert!(first.social.is_some());

        let second = fx
            .service
            .upsert(
                &alice,
                ProfileInput {
                    youtube: Some("youtube.com/b".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(second.social, first.social);
    }

    #[tokio::test]
    async fn experience_is_newest_first_and_removable() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        fx.service.upsert(&alice, base_input()).await.unwrap();

        fx.service.add_experience(&alice, experience("Junior")).await.unwrap();
        let profile = fx.service.add_experience(&alice, experience("Senior")).await.unwrap();
        let titles: Vec<&str> = profile.experience.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Senior", "Junior"]);

        let senior = profile.experience.as_slice()[0].id;
        let profile = fx.service.remove_experience(&alice, senior).await.unwrap();
        assert_eq!(profile.experience.len(), 1);

        let err = fx.service.remove_experience(&alice, senior).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn entries_need_an_existing_profile() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;

        let err = fx.service.add_experience(&alice, experience("Junior")).await.unwrap_err();
        assert_eq!(err.message(), "There is no profile for this user");
    }

    #[tokio::test]
    async fn education_cannot_be_removed_through_another_profile() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        let bob = fx.user("bob").await;
        fx.service.upsert(&alice, base_input()).await.unwrap();
        fx.service.upsert(&bob, base_input()).await.unwrap();

        let profile = fx
            .service
            .add_education(
                &alice,
                EducationInput {
                    school: Some("MIT".to_string()),
                    degree: Some("BSc".to_string()),
                    fieldofstudy: Some("CS".to_string()),
                    from: Some("2010-09-01".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let edu_id = profile.education.as_slice()[0].id;

        let err = fx.service.remove_education(&bob, edu_id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(fx.service.me(&alice).await.unwrap().profile.education.len(), 1);
    }

    #[tokio::test]
    async fn delete_account_removes_profile_posts_and_user() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        fx.service.upsert(&alice, base_input()).await.unwrap();
        let posts = PostService::new(Arc::clone(&fx.store));
        posts
            .create(&alice, TextInput { text: Some("hello".to_string()) })
            .await
            .unwrap();

        fx.service.delete_account(&alice).await.unwrap();

        assert!(fx.service.me(&alice).await.is_err());
        assert!(posts.list().await.unwrap().is_empty());
        let err = fx.service.delete_account(&alice).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn views_carry_user_summary() {
        let fx = Fixture::new();
        let alice = fx.user("alice").await;
        fx.service.upsert(&alice, base_input()).await.unwrap();

        let view = fx.service.by_user(alice.user_id).await.unwrap();
        assert_eq!(view.user.map(|u| u.name), Some("alice".to_string()));
        assert_eq!(fx.service.list().await.unwrap().len(), 1);
    }
}
