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

mod conformance;
mod policy;
mod properties;

use std::collections::BTreeMap;

use presign_google::{Config, Credential, Signer};
use serde::Deserialize;

const SERVICE_ACCOUNT: &[u8] = include_bytes!("../../testdata/service_account.json");
const HMAC_CREDENTIAL: &[u8] = include_bytes!("../../testdata/hmac_credential.json");
const FIXTURE: &[u8] = include_bytes!("../../testdata/v4_signatures.json");

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Which key of testdata signs a case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    #[default]
    ServiceAccount,
    Hmac,
}

pub fn credential(kind: CredentialKind) -> Credential {
    let content = match kind {
        CredentialKind::ServiceAccount => SERVICE_ACCOUNT,
        CredentialKind::Hmac => HMAC_CREDENTIAL,
    };
    Credential::from_slice(content).expect("testdata credential must be valid")
}

pub fn signer(kind: CredentialKind) -> Signer {
    init_logger();
    Signer::new(Config::default(), credential(kind))
}

/// A case of `testdata/v4_signatures.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub description: String,
    #[serde(default)]
    pub credential: CredentialKind,

    pub bucket: Option<String>,
    pub object: Option<String>,
    pub url_style: Option<String>,
    pub bucket_bound_hostname: Option<String>,
    pub scheme: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub query_parameters: BTreeMap<String, String>,
    pub method: Option<String>,
    pub expiration: Option<u64>,
    pub timestamp: Option<String>,
    pub expected_url: Option<String>,
    pub expected_canonical_request: Option<String>,
    pub expected_string_to_sign: Option<String>,

    pub policy_input: Option<PolicyInputCase>,
    pub policy_output: Option<PolicyOutputCase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyInputCase {
    pub scheme: String,
    pub bucket: String,
    pub object: String,
    pub expiration: u64,
    pub timestamp: String,
    pub url_style: Option<String>,
    pub bucket_bound_hostname: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub conditions: PolicyConditionsCase,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConditionsCase {
    pub starts_with: Option<(String, String)>,
    pub content_length_range: Option<(i64, i64)>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyOutputCase {
    pub url: String,
    pub fields: BTreeMap<String, String>,
    pub expected_decoded_policy: String,
}

pub fn load_cases() -> Vec<Case> {
    serde_json::from_slice(FIXTURE).expect("fixture must be valid")
}
