mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn first_upsert_requires_status_and_skills() -> Result<()> {
    let app = TestApp::new()?;
    let (_, token) = app.user("Ada", "ada@example.com").await?;

    let res = app.post("/api/profile", &token, json!({ "company": "Acme" })).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "VALIDATION_FAILED");
    let fields: Vec<&str> = res.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"status"));
    assert!(fields.contains(&"skills"));
    Ok(())
}

#[tokio::test]
async fn upsert_normalizes_and_merges() -> Result<()> {
    let app = TestApp::new()?;
    let (user, token) = app.user("Ada", "ada@example.com").await?;

    let res = app
        .post(
            "/api/profile",
            &token,
            json!({
                "status": "Developer",
                "skills": "rust, tokio",
                "website": "www.example.com",
                "company": "Acme",
            }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["user_id"], user.id.to_string());
    assert_eq!(res.data()["skills"], json!([" rust", " tokio"]));
    assert_eq!(res.data()["website"], "https://example.com");
    let profile_id = res.data()["id"].clone();

    // Later updates only touch the supplied fields
    let res = app.post("/api/profile", &token, json!({ "bio": "Hi" })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["id"], profile_id);
    assert_eq!(res.data()["bio"], "Hi");
    assert_eq!(res.data()["company"], "Acme");
    assert_eq!(res.data()["status"], "Developer");

    let res = app.get("/api/profile/me", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["user"]["name"], "Ada");
    Ok(())
}

#[tokio::test]
async fn social_links_are_all_or_nothing() -> Result<()> {
    let app = TestApp::new()?;
    let (_, token) = app.user("Ada", "ada@example.com").await?;

    let res = app
        .post(
            "/api/profile",
            &token,
            json!({ "status": "Developer", "skills": ["rust"], "twitter": "twitter.com/ada" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.data()["social"].is_null());

    let res = app
        .post(
            "/api/profile",
            &token,
            json!({
                "youtube": "youtube.com/ada",
                "twitter": "http://twitter.com/ada",
                "instagram": "www.instagram.com/ada",
                "linkedin": "linkedin.com/in/ada/",
                "facebook": "facebook.com/ada",
            }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["social"]["twitter"], "https://twitter.com/ada");
    assert_eq!(res.data()["social"]["instagram"], "https://instagram.com/ada");
    assert_eq!(res.data()["social"]["linkedin"], "https://linkedin.com/in/ada");

    // A partial set later leaves the stored links alone
    let res = app
        .post("/api/profile", &token, json!({ "facebook": "facebook.com/other" }))
        .await?;
    assert_eq!(res.data()["social"]["facebook"], "https://facebook.com/ada");
    Ok(())
}

#[tokio::test]
async fn missing_profile_is_not_found() -> Result<()> {
    let app = TestApp::new()?;
    let (user, token) = app.user("Ada", "ada@example.com").await?;

    let res = app.get("/api/profile/me", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "There is no profile for this user");

    let res = app.get(&format!("/api/profile/user/{}", user.id), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Profile not found");

    let res = app.get("/api/profile/user/42", None).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn experience_and_education_lifecycle() -> Result<()> {
    let app = TestApp::new()?;
    let (_, token) = app.user("Ada", "ada@example.com").await?;
    app.post("/api/profile", &token, json!({ "status": "Developer", "skills": "rust" }))
        .await?;

    let res = app
        .put("/api/profile/experience", &token, Some(json!({ "title": "Engineer" })))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .put(
            "/api/profile/experience",
            &token,
            Some(json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let res = app
        .put(
            "/api/profile/experience",
            &token,
            Some(json!({
                "title": "Lead",
                "company": "Acme",
                "from": "2022-01-01",
                "current": true,
            })),
        )
        .await?;
    let experience = res.data()["experience"].as_array().unwrap().clone();
    assert_eq!(experience.len(), 2);
    assert_eq!(experience[0]["title"], "Lead");

    let exp_id = experience[1]["id"].as_str().unwrap();
    let res = app
        .delete(&format!("/api/profile/experience/{}", exp_id), &token)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["experience"].as_array().unwrap().len(), 1);

    let res = app
        .delete(&format!("/api/profile/experience/{}", exp_id), &token)
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app
        .put(
            "/api/profile/education",
            &token,
            Some(json!({
                "school": "MIT",
                "degree": "BSc",
                "fieldofstudy": "CS",
                "from": "2014-09-01",
                "to": "2018-06-01",
            })),
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let edu_id = res.data()["education"][0]["id"].as_str().unwrap().to_string();

    let res = app
        .delete(&format!("/api/profile/education/{}", edu_id), &token)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["education"], json!([]));
    Ok(())
}

#[tokio::test]
async fn deleting_account_removes_profile_and_posts() -> Result<()> {
    let app = TestApp::new()?;
    let (user, token) = app.user("Ada", "ada@example.com").await?;
    let (_, other) = app.user("Grace", "grace@example.com").await?;

    app.post("/api/profile", &token, json!({ "status": "Developer", "skills": "rust" }))
        .await?;
    app.post("/api/posts", &token, json!({ "text": "mine" })).await?;
    app.post("/api/posts", &other, json!({ "text": "theirs" })).await?;

    let res = app.delete("/api/profile", &token).await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.get(&format!("/api/profile/user/{}", user.id), None).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get("/api/posts", Some(&other)).await?;
    let posts = res.data().as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["text"], "theirs");
    Ok(())
}

#[tokio::test]
async fn unreachable_github_is_a_bad_gateway() -> Result<()> {
    let app = TestApp::new()?;

    let res = app.get("/api/profile/github/octocat", None).await?;

    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.body["code"], "BAD_GATEWAY");
    Ok(())
}
