mod special_chars;
mod vectors;

use awssink_aws_v4::{Credential, RequestSigner};
use awssink_core::time::FixedClock;
use awssink_core::Context;

/// Context whose clock is pinned to 2013-05-24T00:00:00Z.
pub fn pinned_context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new().with_clock(
        FixedClock::from_iso8601("20130524T000000Z").expect("fixed time must be valid"),
    )
}

pub fn credential(access_key_id: &str, secret_access_key: &str) -> Credential {
    Credential {
        access_key_id: access_key_id.to_string(),
        secret_access_key: secret_access_key.to_string(),
        ..Default::default()
    }
}

pub fn s3_signer() -> RequestSigner {
    RequestSigner::new("s3", "us-east-1")
}
