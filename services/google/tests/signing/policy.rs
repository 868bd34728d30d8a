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

use anyhow::Result;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use chrono::{TimeZone, Utc};
use presign_core::ErrorKind;
use presign_google::{PolicyCondition, PolicyInput};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::{signer, CredentialKind};

fn input() -> PolicyInput {
    PolicyInput::new(
        "validation-bucket",
        "test.txt",
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        Duration::from_secs(600),
    )
}

fn decode_policy(policy: &str) -> Result<Value> {
    Ok(serde_json::from_slice(&BASE64_STANDARD.decode(policy)?)?)
}

#[test]
fn test_policy_content_length_range() -> Result<()> {
    let input = input().with_condition(PolicyCondition::content_length_range(0, 1024));

    for kind in [CredentialKind::Hmac, CredentialKind::ServiceAccount] {
        let doc = signer(kind).sign_policy(&input)?;
        let policy = decode_policy(&doc.fields["policy"])?;

        let conditions = policy["conditions"]
            .as_array()
            .expect("conditions must be an array");
        assert!(conditions.contains(&json!(["content-length-range", 0, 1024])));
        assert_eq!(policy["expiration"], "2020-01-01T00:10:00Z");
    }
    Ok(())
}

#[test]
fn test_policy_fields_match_conditions() -> Result<()> {
    let input = input()
        .with_field("acl", "bucket-owner-read")
        .with_field("success_action_redirect", "https://example.com/done")
        .with_field("Content-Type", "text/plain")
        .with_field("x-ignore-upload-id", "42");

    let doc = signer(CredentialKind::ServiceAccount).sign_policy(&input)?;
    let policy = decode_policy(&doc.policy)?;
    let conditions = policy["conditions"].as_array().expect("must be array");

    // Every field except the signature, the policy itself and x-ignore-
    // fields is bound by an exact condition.
    for (name, value) in &doc.fields {
        let bound = conditions.contains(&json!({ name.as_str(): value }));
        let expect_bound = !matches!(name.as_str(), "policy" | "x-goog-signature")
            && !name.starts_with("x-ignore-");
        assert_eq!(bound, expect_bound, "field {name}");
    }
    assert!(conditions.contains(&json!({"bucket": "validation-bucket"})));
    assert_eq!(
        conditions
            .iter()
            .filter(|c| c.get("acl").is_some())
            .count(),
        1
    );
    Ok(())
}

#[test]
fn test_policy_conditions_match_fields() -> Result<()> {
    let input = input()
        .with_condition(PolicyCondition::exact("acl", "public-read"))
        .with_condition(PolicyCondition::exact("x-goog-meta-owner", "alice"))
        .with_condition(PolicyCondition::starts_with("$Content-Type", "image/"))
        .with_field("Content-Type", "image/png")
        .with_success_action_status("201");

    let doc = signer(CredentialKind::Hmac).sign_policy(&input)?;
    let policy = decode_policy(&doc.policy)?;
    let conditions = policy["conditions"].as_array().expect("must be array");

    // Every exact condition except the bucket, which lives in the url, can be
    // satisfied by submitting the returned fields.
    for condition in conditions.iter().filter_map(|c| c.as_object()) {
        for (name, value) in condition {
            if name == "bucket" {
                continue;
            }
            assert_eq!(
                doc.fields.get(name).map(String::as_str),
                value.as_str(),
                "condition on {name}"
            );
        }
    }
    assert_eq!(doc.fields["acl"], "public-read");
    assert_eq!(doc.fields["x-goog-meta-owner"], "alice");
    Ok(())
}

#[test]
fn test_policy_rejects_condition_on_signer_field() {
    for name in ["key", "bucket", "x-goog-credential"] {
        let input = input().with_condition(PolicyCondition::exact(name, "other.txt"));

        let err = signer(CredentialKind::Hmac).sign_policy(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConditionInvalid, "condition on {name}");
    }
}

#[test]
fn test_policy_invalid_range() {
    let input = input().with_condition(PolicyCondition::content_length_range(1024, 0));

    let err = signer(CredentialKind::Hmac).sign_policy(&input).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConditionInvalid);
}
