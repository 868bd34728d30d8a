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

use std::time::Duration;

use anyhow::{Context, Result};
use http::header::{HeaderName, HeaderValue};
use http::Method;
use log::debug;
use presign_core::hash::base64_decode;
use presign_core::time::parse_rfc3339;
use presign_google::{
    resolve, string_to_sign, AddressingMode, PolicyCondition, PolicyInput, RequestSigner,
    Resource, SigningRequest,
};
use pretty_assertions::assert_eq;

use super::{credential, load_cases, signer, Case};

fn build_request(case: &Case) -> Result<SigningRequest> {
    let bucket = case.bucket.as_deref().context("url case must have bucket")?;
    let mut resource = Resource::new(bucket);
    if let Some(object) = &case.object {
        resource = resource.with_object(object);
    }

    let method: Method = case
        .method
        .as_deref()
        .context("url case must have method")?
        .parse()?;
    let timestamp = parse_rfc3339(case.timestamp.as_deref().context("missing timestamp")?)?;
    let expiration = Duration::from_secs(case.expiration.context("missing expiration")?);

    let mut req = SigningRequest::from_method(resource, &method, timestamp, expiration)?
        .with_addressing(AddressingMode::from_style(
            case.url_style.as_deref(),
            case.bucket_bound_hostname.as_deref(),
        )?);
    if let Some(scheme) = &case.scheme {
        req = req.with_scheme(scheme);
    }
    for (name, value) in &case.headers {
        req = req.with_header(
            HeaderName::from_bytes(name.as_bytes())?,
            HeaderValue::from_str(value)?,
        );
    }
    for (key, value) in &case.query_parameters {
        req = req.with_query(key, value);
    }

    Ok(req)
}

#[test]
fn test_signed_url_conformance() -> Result<()> {
    let cases = load_cases();
    let url_cases = cases
        .iter()
        .filter(|case| case.expected_url.is_some())
        .collect::<Vec<_>>();
    assert!(!url_cases.is_empty());

    for case in url_cases {
        debug!("running signed url case: {}", case.description);
        let req = build_request(case)?;

        let url = signer(case.credential).sign_url(&req)?;
        assert_eq!(
            Some(url.as_str()),
            case.expected_url.as_deref(),
            "case: {}",
            case.description
        );
    }

    Ok(())
}

#[test]
fn test_canonical_request_conformance() -> Result<()> {
    for case in load_cases()
        .iter()
        .filter(|case| case.expected_canonical_request.is_some())
    {
        let req = build_request(case)?;
        let cred = credential(case.credential);
        let address = resolve(req.resource(), req.addressing(), "storage.googleapis.com")?;
        let signer = RequestSigner::new("storage");

        let creq = signer.canonical_request(&req, &cred, &address)?;
        assert_eq!(
            Some(creq.to_string().as_str()),
            case.expected_canonical_request.as_deref(),
            "case: {}",
            case.description
        );

        let sts = string_to_sign(
            cred.algorithm(),
            req.timestamp(),
            &signer.scope(req.timestamp()),
            &creq,
        );
        assert_eq!(
            Some(sts.as_str()),
            case.expected_string_to_sign.as_deref(),
            "case: {}",
            case.description
        );
    }

    Ok(())
}

#[test]
fn test_policy_conformance() -> Result<()> {
    let cases = load_cases();
    let policy_cases = cases
        .iter()
        .filter(|case| case.policy_input.is_some())
        .collect::<Vec<_>>();
    assert!(!policy_cases.is_empty());

    for case in policy_cases {
        debug!("running policy case: {}", case.description);
        let input = case.policy_input.as_ref().context("missing policy input")?;
        let output = case
            .policy_output
            .as_ref()
            .context("missing policy output")?;

        let mut policy = PolicyInput::new(
            &input.bucket,
            &input.object,
            parse_rfc3339(&input.timestamp)?,
            Duration::from_secs(input.expiration),
        )
        .with_scheme(&input.scheme)
        .with_addressing(AddressingMode::from_style(
            input.url_style.as_deref(),
            input.bucket_bound_hostname.as_deref(),
        )?);
        if let Some((field, prefix)) = &input.conditions.starts_with {
            policy = policy.with_condition(PolicyCondition::starts_with(field, prefix));
        }
        if let Some((min, max)) = input.conditions.content_length_range {
            policy = policy.with_condition(PolicyCondition::content_length_range(min, max));
        }
        for (name, value) in &input.fields {
            policy = policy.with_field(name, value);
        }

        let doc = signer(case.credential).sign_policy(&policy)?;
        let decoded = String::from_utf8(base64_decode(&doc.policy)?)?;

        assert_eq!(doc.url, output.url, "case: {}", case.description);
        assert_eq!(
            decoded, output.expected_decoded_policy,
            "case: {}",
            case.description
        );
        assert_eq!(doc.fields, output.fields, "case: {}", case.description);
    }

    Ok(())
}
