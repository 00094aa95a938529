use super::{credential, pinned_context, s3_signer};
use anyhow::Result;
use awssink_aws_v4::CanonicalRequest;
use awssink_core::hash::EMPTY_SHA256;
use awssink_core::SignRequest;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_query_is_sorted_and_encoded() -> Result<()> {
    let ctx = pinned_context();
    let mut parts =
        http::Request::get("https://examplebucket.s3.amazonaws.com/?prefix=a%20b&list-type=2")
            .header("date", "Fri, 24 May 2013 00:00:00 GMT")
            .body(())?
            .into_parts()
            .0;

    let canonical = s3_signer()
        .sign_request(&ctx, &mut parts, None, Some(&credential("KEY", "SECRET")))
        .await?;

    assert!(canonical.starts_with("GET\n/\nlist-type=2&prefix=a%20b\n"));
    // The request itself keeps its original query.
    assert_eq!(
        parts.uri.to_string(),
        "https://examplebucket.s3.amazonaws.com/?prefix=a%20b&list-type=2"
    );
    Ok(())
}

#[tokio::test]
async fn test_plus_in_query_decodes_to_space() -> Result<()> {
    let ctx = pinned_context();
    let mut parts = http::Request::get("https://examplebucket.s3.amazonaws.com/?prefix=a+b")
        .header("date", "Fri, 24 May 2013 00:00:00 GMT")
        .body(())?
        .into_parts()
        .0;

    let canonical = s3_signer()
        .sign_request(&ctx, &mut parts, None, Some(&credential("KEY", "SECRET")))
        .await?;

    assert!(canonical.starts_with("GET\n/\nprefix=a%20b\n"));
    Ok(())
}

#[tokio::test]
async fn test_encoded_path_is_kept() -> Result<()> {
    let ctx = pinned_context();
    let mut parts = http::Request::put("https://examplebucket.s3.amazonaws.com/test%24file.text")
        .body(())?
        .into_parts()
        .0;

    let canonical = s3_signer()
        .sign_request(&ctx, &mut parts, None, Some(&credential("KEY", "SECRET")))
        .await?;

    assert!(canonical.starts_with("PUT\n/test%24file.text\n\n"));
    Ok(())
}

#[tokio::test]
async fn test_repeated_header_values_are_joined() -> Result<()> {
    let ctx = pinned_context();
    let mut parts = http::Request::get("https://examplebucket.s3.amazonaws.com/test.txt")
        .header("date", "Fri, 24 May 2013 00:00:00 GMT")
        .header("x-amz-meta-tag", " x ")
        .header("X-Amz-Meta-Tag", "y")
        .body(())?
        .into_parts()
        .0;

    let canonical = s3_signer()
        .sign_request(&ctx, &mut parts, None, Some(&credential("KEY", "SECRET")))
        .await?;

    assert!(canonical.contains("\nx-amz-meta-tag:x,y\n"));
    Ok(())
}

#[test]
fn test_empty_body_hash() {
    let creq = CanonicalRequest::new("GET", "/");
    assert_eq!(creq.payload_hash(), EMPTY_SHA256);
    assert_eq!(
        EMPTY_SHA256,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}
