use crate::e2e::helpers;

use chrono::{Duration, Utc};
use helpers::assertions::assert_plan_response;
use helpers::fixtures::ProfileSeed;
use helpers::{generate_test_jwt_expiring_in, TestContext};
use hyper::StatusCode;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_resolve_free_plan_when_profile_is_missing(ctx: &TestContext) {
    let token = ctx.token_for(&Uuid::new_v4());

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_plan_response(body, "free");
    assert_eq!(body["display_name"], "FREE");
    assert_eq!(body["limits"]["generations_base"], 2);
    assert_eq!(body["voice_provider"], "browser");
    assert_eq!(body["stats_access"], false);
    assert_eq!(body["trial_days_remaining"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_null_billing_columns_as_free(ctx: &TestContext) {
    let user_id = ctx.fixtures.create_free_profile().await.unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_plan_response(body, "free");
    assert_eq!(body["is_manual"], false);
    assert_eq!(body["is_trial"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_billed_tier_for_active_subscription(ctx: &TestContext) {
    let user_id = ctx
        .fixtures
        .create_profile(ProfileSeed::subscribed("pro", "active"))
        .await
        .unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_plan_response(body, "pro");
    assert_eq!(body["limits"]["max_saved_dialogs"], 10);
    assert_eq!(body["stats_access"], true);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_grant_pro_during_a_valid_trial(ctx: &TestContext) {
    let ends_at = Utc::now() + Duration::hours(36);
    let user_id = ctx
        .fixtures
        .create_profile(ProfileSeed::trial_ending(ends_at))
        .await
        .unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_plan_response(body, "pro");
    assert_eq!(body["is_trial"], true);
    // 36 hours rounds up to two days
    assert_eq!(body["trial_days_remaining"], 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ignore_an_expired_trial(ctx: &TestContext) {
    let ends_at = Utc::now() - Duration::hours(1);
    let user_id = ctx
        .fixtures
        .create_profile(ProfileSeed::trial_ending(ends_at))
        .await
        .unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_plan_response(body, "free");
    assert_eq!(body["is_trial"], false);
    assert_eq!(body["trial_days_remaining"], 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_prefer_manual_premium_over_everything(ctx: &TestContext) {
    let seed = ProfileSeed {
        subscription_tier: Some("pro".to_string()),
        subscription_status: Some("active".to_string()),
        is_trial_active: true,
        trial_ends_at: Some(Utc::now() + Duration::days(3)),
        ..ProfileSeed::manual_premium()
    };
    let user_id = ctx.fixtures.create_profile(seed).await.unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_plan_response(body, "premium");
    assert_eq!(body["is_manual"], true);
    assert_eq!(body["voice_provider"], "elevenlabs");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_preferred_voice_provider_only_on_paid_plans(ctx: &TestContext) {
    let paid = ctx
        .fixtures
        .create_profile(ProfileSeed::subscribed("pro", "active").with_voice_provider("azure"))
        .await
        .unwrap();
    let free = ctx
        .fixtures
        .create_profile(ProfileSeed::default().with_voice_provider("azure"))
        .await
        .unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/plan", &ctx.token_for(&paid))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["voice_provider"], "azure");

    let response = ctx
        .client
        .get_with_auth("/api/plan", &ctx.token_for(&free))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["voice_provider"], "browser");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_free_for_unknown_tier_strings(ctx: &TestContext) {
    let user_id = ctx
        .fixtures
        .create_profile(ProfileSeed::subscribed("enterprise", "active"))
        .await
        .unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_plan_response(response.body.as_ref().unwrap(), "free");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reflect_tier_changes_without_cache(ctx: &TestContext) {
    let user_id = ctx.fixtures.create_free_profile().await.unwrap();
    let token = ctx.token_for(&user_id);

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();
    assert_plan_response(response.body.as_ref().unwrap(), "free");

    ctx.fixtures
        .set_tier(user_id, "premium", "active")
        .await
        .unwrap();

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();
    assert_plan_response(response.body.as_ref().unwrap(), "premium");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_plan_request_without_token(ctx: &TestContext) {
    let response = ctx.client.get("/api/plan").await.unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_expired_token(ctx: &TestContext) {
    let token = generate_test_jwt_expiring_in(
        &Uuid::new_v4(),
        &ctx.config.jwt_secret,
        Duration::hours(-2),
    );

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_token_signed_with_another_secret(ctx: &TestContext) {
    let token = helpers::generate_test_jwt(&Uuid::new_v4(), "some-other-secret");

    let response = ctx.client.get_with_auth("/api/plan", &token).await.unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
}
