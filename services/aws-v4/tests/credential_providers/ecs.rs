use super::{context, MockHttpSend};
use anyhow::Result;
use awssink_aws_v4::{DefaultCredentialProvider, EcsCredentialProvider, RequestSigner};
use awssink_core::{CredentialHolder, ErrorKind, ProvideCredential, Signer};
use http::StatusCode;
use std::time::Duration;

const CREDENTIALS: &str = r#"{
    "AccessKeyId": "ASIAEXAMPLE",
    "SecretAccessKey": "container-secret",
    "Token": "container-token",
    "RoleArn": "arn:aws:iam::123456789012:role/task",
    "Expiration": "2999-01-01T00:00:00Z"
}"#;

#[tokio::test]
async fn test_default_provider_falls_back_to_container() -> Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, CREDENTIALS);
    let ctx = context(
        http.clone(),
        &[("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "/v2/credentials/id")],
    );

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "ASIAEXAMPLE");
    assert_eq!(cred.session_token.as_deref(), Some("container-token"));
    assert_eq!(http.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_default_provider_surfaces_container_failure() {
    let ctx = context(
        MockHttpSend::new(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        &[("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "/v2/credentials/id")],
    );

    let err = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test]
async fn test_holder_signs_with_container_credential() -> Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, CREDENTIALS);
    let ctx = context(
        http.clone(),
        &[("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "/v2/credentials/id")],
    );

    let holder = CredentialHolder::spawn(ctx.clone(), EcsCredentialProvider::new());
    tokio::time::timeout(Duration::from_secs(5), holder.wait_for_credential())
        .await?
        .expect("credential must be published");

    let signer = Signer::new(ctx, holder, RequestSigner::new("s3", "us-east-1"));
    let mut parts = http::Request::put("https://examplebucket.s3.amazonaws.com/test.txt")
        .body(())?
        .into_parts()
        .0;
    signer.sign(&mut parts, Some(b"hello")).await?;

    assert_eq!(parts.headers["x-amz-security-token"], "container-token");
    let auth = parts.headers["authorization"].to_str()?;
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=ASIAEXAMPLE/"));
    assert!(auth.contains("x-amz-security-token"));
    Ok(())
}
