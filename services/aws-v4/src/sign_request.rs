// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::canonical::CanonicalRequest;
use crate::constants::{
    AWS4_HMAC_SHA256, AWS4_REQUEST, X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use async_trait::async_trait;
use awssink_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use awssink_core::time::{format_date, format_http_date, format_iso8601, parse_iso8601, DateTime};
use awssink_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::{debug, warn};

/// RequestSigner that implement AWS SigV4 with the `Authorization` header.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
}

/// Everything derived while signing a canonical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedParts {
    /// Rendered canonical request.
    pub canonical_request: String,
    /// String to sign built from the canonical request.
    pub string_to_sign: String,
    /// Hex encoded signature.
    pub signature: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    /// Sign a canonical request.
    ///
    /// The request time is taken from the `x-amz-date` header, which must be
    /// present and formatted as `YYYYMMDDThhmmssZ`.
    pub fn sign_canonical(&self, creq: &CanonicalRequest, cred: &Credential) -> Result<SignedParts> {
        let amz_date = creq.header(X_AMZ_DATE).ok_or_else(|| {
            Error::request_invalid("x-amz-date header is required to sign a request")
        })?;
        let request_time = parse_iso8601(amz_date)?;

        let canonical_request = creq.to_string();
        debug!("calculated canonical request: {canonical_request}");

        let scope = credential_scope(request_time, &self.region, &self.service);
        let string_to_sign = string_to_sign(amz_date, &scope, &canonical_request);
        debug!("calculated string to sign: {string_to_sign}");

        let key = signing_key(
            &cred.secret_access_key,
            request_time,
            &self.region,
            &self.service,
        );
        let signature = hex_hmac_sha256(&key, string_to_sign.as_bytes());
        let authorization = authorization_header(
            &cred.access_key_id,
            &scope,
            &creq.signed_headers(),
            &signature,
        );

        Ok(SignedParts {
            canonical_request,
            string_to_sign,
            signature,
            authorization,
        })
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut Parts,
        body: Option<&[u8]>,
        credential: Option<&Self::Credential>,
    ) -> Result<String> {
        let now = ctx.now();
        let mut signed_req = SigningRequest::build(req)?;

        let anonymous = Credential::default();
        let cred = match credential {
            Some(cred) => cred,
            None => {
                warn!("signing request without credential, it will be rejected by the server");
                &anonymous
            }
        };

        canonicalize_header(&mut signed_req, cred, body, now)?;

        let creq = CanonicalRequest::from_signing_request(&signed_req)?;
        let signed = self.sign_canonical(&creq, cred)?;

        let mut authorization = HeaderValue::from_str(&signed.authorization)?;
        authorization.set_sensitive(true);
        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)?;
        Ok(signed.canonical_request)
    }
}

/// Scope: `20220313/<region>/<service>/aws4_request`
pub fn credential_scope(date: DateTime, region: &str, service: &str) -> String {
    format!(
        "{}/{region}/{service}/{AWS4_REQUEST}",
        format_date(date)
    )
}

/// StringToSign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(amz_date: &str, scope: &str, canonical_request: &str) -> String {
    format!(
        "{AWS4_HMAC_SHA256}\n{amz_date}\n{scope}\n{}",
        hex_sha256(canonical_request.as_bytes())
    )
}

/// Derive the signing key for one day, region and service.
pub fn signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}

/// Value of the `Authorization` header. No spaces follow the commas.
pub fn authorization_header(
    access_key_id: &str,
    scope: &str,
    signed_headers: &[&str],
    signature: &str,
) -> String {
    format!(
        "{AWS4_HMAC_SHA256} Credential={access_key_id}/{scope},SignedHeaders={},Signature={signature}",
        signed_headers.join(";")
    )
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    cred: &Credential,
    body: Option<&[u8]>,
    now: DateTime,
) -> Result<()> {
    for (_, value) in ctx.headers.iter_mut() {
        header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, ctx.authority.as_str().parse()?);
    }

    // Insert DATE header if not present.
    if ctx.headers.get(header::DATE).is_none() {
        ctx.headers
            .insert(header::DATE, HeaderValue::try_from(format_http_date(now))?);
    }

    ctx.headers.insert(
        X_AMZ_CONTENT_SHA_256,
        HeaderValue::try_from(hex_sha256(body.unwrap_or_default()))?,
    );
    ctx.headers
        .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
    if let Some(token) = cred.session_token.as_deref().filter(|v| !v.is_empty()) {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn header_value_normalize(v: &mut HeaderValue) {
    let bs = v.as_bytes();
    let trimmed = bs.trim_ascii();
    if trimmed.len() == bs.len() {
        return;
    }
    // Trimming a valid value always yields a valid value.
    if let Ok(mut nv) = HeaderValue::from_bytes(trimmed) {
        nv.set_sensitive(v.is_sensitive());
        *v = nv;
    }
}
