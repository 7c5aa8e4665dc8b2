use super::*;
use crate::{
    actions::{authenticate, SignInError},
    stub_api::spawn_context,
    validation::RawForm,
};
use axum::http::StatusCode;
use serde_json::json;

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials::from_form(
        &RawForm::new()
            .with("email", email)
            .with("password", password),
    )
}

async fn provider_with_user() -> (CredentialsProvider, crate::stub_api::StubState) {
    let (ctx, stub) = spawn_context().await;
    stub.insert_user(json!({
        "id": "410544b2-4001-4271-9855-fec4b6a6442a",
        "name": "User",
        "email": "user@nextmail.com",
        "password": "123456"
    }))
    .await;
    (CredentialsProvider::new(ctx.client), stub)
}

#[tokio::test]
async fn matching_password_signs_in() {
    let (provider, _stub) = provider_with_user().await;

    let user = provider
        .authorize(&credentials("user@nextmail.com", "123456"))
        .await
        .expect("authorized");
    assert_eq!(user.email, "user@nextmail.com");
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let (provider, _stub) = provider_with_user().await;

    let unknown = provider
        .authorize(&credentials("nobody@nextmail.com", "123456"))
        .await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));

    let wrong = provider
        .authorize(&credentials("user@nextmail.com", "654321"))
        .await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn malformed_credentials_skip_the_lookup() {
    let (provider, stub) = provider_with_user().await;

    let short = provider.authorize(&credentials("user@nextmail.com", "123")).await;
    assert!(matches!(short, Err(AuthError::InvalidCredentials)));

    let not_email = provider.authorize(&credentials("user", "123456")).await;
    assert!(matches!(not_email, Err(AuthError::InvalidCredentials)));

    assert!(stub.requests().await.is_empty());
}

#[tokio::test]
async fn lookup_outage_is_an_internal_failure() {
    let (provider, stub) = provider_with_user().await;
    stub.fail_with(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;

    let result = provider
        .authorize(&credentials("user@nextmail.com", "123456"))
        .await;
    assert!(matches!(result, Err(AuthError::Internal(_))));
}

#[tokio::test]
async fn login_form_messages_come_from_the_provider_outcome() {
    let (provider, stub) = provider_with_user().await;
    let form = |password: &str| {
        RawForm::new()
            .with("email", "user@nextmail.com")
            .with("password", password)
    };

    assert!(authenticate(&provider, &form("123456")).await.is_ok());
    assert_eq!(
        authenticate(&provider, &form("nope-nope")).await.expect_err("denied"),
        SignInError::InvalidCredentials
    );

    stub.fail_with(StatusCode::SERVICE_UNAVAILABLE, json!({})).await;
    assert_eq!(
        authenticate(&provider, &form("123456")).await.expect_err("outage"),
        SignInError::Unavailable
    );
}
