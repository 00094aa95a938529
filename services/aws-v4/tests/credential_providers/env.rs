use super::context;
use super::MockHttpSend;
use anyhow::Result;
use awssink_aws_v4::DefaultCredentialProvider;
use awssink_core::ProvideCredential;
use http::StatusCode;

#[tokio::test]
async fn test_env_takes_precedence_over_container() -> Result<()> {
    let http = MockHttpSend::new(StatusCode::OK, "{}");
    let ctx = context(
        http.clone(),
        &[
            ("AWS_ACCESS_KEY_ID", "env_ak"),
            ("AWS_SECRET_ACCESS_KEY", "env_sk"),
            ("AWS_CONTAINER_CREDENTIALS_RELATIVE_URI", "/creds"),
        ],
    );

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded");
    assert_eq!(cred.access_key_id, "env_ak");
    assert_eq!(http.calls(), 0);
    Ok(())
}
