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

//! Signed POST policies for browser uploads.
//!
//! - [POST Object](https://cloud.google.com/storage/docs/xml-api/post-object-forms)
//! - [Policy document](https://cloud.google.com/storage/docs/authentication/signatures#policy-document)

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::TimeDelta;
use log::debug;
use presign_core::hash::base64_encode;
use presign_core::time::{format_iso8601, format_rfc3339, DateTime};
use presign_core::{Error, Result};
use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};

use crate::address::{resolve, AddressingMode, Resource};
use crate::config::{is_http_scheme, Config};
use crate::constants::*;
use crate::credential::{Credential, SigningKey};
use crate::request::{check_expiration, duration_to_seconds};
use crate::scope::CredentialScope;

/// A condition the uploaded form must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyCondition {
    /// The field must equal `value`: `{"acl": "public-read"}`
    Exact {
        /// Form field name.
        field: String,
        /// Expected value.
        value: String,
    },
    /// The field must start with `prefix`: `["starts-with", "$key", "uploads/"]`
    StartsWith {
        /// Form field name, the leading `$` is optional.
        field: String,
        /// Required prefix, empty matches anything.
        prefix: String,
    },
    /// Size of the upload in bytes: `["content-length-range", 0, 1024]`
    ContentLengthRange {
        /// Smallest accepted size.
        min: i64,
        /// Largest accepted size.
        max: i64,
    },
}

impl PolicyCondition {
    /// Build an exact match condition.
    ///
    /// The field is also returned as a form field of the signed document.
    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build a prefix match condition.
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::StartsWith {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    /// Build a content length range condition.
    pub fn content_length_range(min: i64, max: i64) -> Self {
        Self::ContentLengthRange { min, max }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Exact { field, .. } | Self::StartsWith { field, .. } => {
                if field.trim_start_matches('$').is_empty() {
                    return Err(Error::condition_invalid("condition field must not be empty"));
                }
            }
            Self::ContentLengthRange { min, max } => {
                if *min < 0 || *max < 0 {
                    return Err(Error::condition_invalid(format!(
                        "content-length-range bounds must not be negative, got [{min}, {max}]"
                    )));
                }
                if min > max {
                    return Err(Error::condition_invalid(format!(
                        "content-length-range min must not exceed max, got [{min}, {max}]"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Serialize for PolicyCondition {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Exact { field, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field.trim_start_matches('$'), value)?;
                map.end()
            }
            Self::StartsWith { field, prefix } => {
                let mut seq = serializer.serialize_tuple(3)?;
                seq.serialize_element("starts-with")?;
                if field.starts_with('$') {
                    seq.serialize_element(field)?;
                } else {
                    seq.serialize_element(&format!("${field}"))?;
                }
                seq.serialize_element(prefix)?;
                seq.end()
            }
            Self::ContentLengthRange { min, max } => {
                let mut seq = serializer.serialize_tuple(3)?;
                seq.serialize_element("content-length-range")?;
                seq.serialize_element(min)?;
                seq.serialize_element(max)?;
                seq.end()
            }
        }
    }
}

/// The JSON document, field order is significant.
#[derive(Serialize)]
struct Policy<'a> {
    conditions: &'a [PolicyCondition],
    expiration: String,
}

/// PolicyInput describes an upload to authorize.
#[derive(Debug, Clone)]
pub struct PolicyInput {
    resource: Resource,
    timestamp: DateTime,
    expires_in: i64,
    conditions: Vec<PolicyCondition>,
    fields: BTreeMap<String, String>,
    acl: Option<String>,
    success_action_status: Option<String>,
    success_action_redirect: Option<String>,
    addressing: AddressingMode,
    scheme: Option<String>,
}

impl PolicyInput {
    /// Authorize uploading `key` into `bucket` for `expires_in` from `timestamp`.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        timestamp: DateTime,
        expires_in: Duration,
    ) -> Self {
        Self {
            resource: Resource::new(bucket).with_object(key),
            timestamp,
            expires_in: duration_to_seconds(expires_in),
            conditions: Vec::new(),
            fields: BTreeMap::new(),
            acl: None,
            success_action_status: None,
            success_action_redirect: None,
            addressing: AddressingMode::default(),
            scheme: None,
        }
    }

    /// Expire at an absolute time instead of a duration.
    pub fn with_expires_at(mut self, expires_at: DateTime) -> Self {
        self.expires_in = (expires_at - self.timestamp).num_seconds();
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: PolicyCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add a form field that must be submitted as is.
    ///
    /// `acl`, `success_action_status` and `success_action_redirect` are the
    /// same as their dedicated setters. Fields prefixed with `x-ignore-` are
    /// returned as form fields but never enter the policy.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.to_ascii_lowercase().as_str() {
            POLICY_FIELD_ACL => self.acl = Some(value),
            POLICY_FIELD_SUCCESS_ACTION_STATUS => self.success_action_status = Some(value),
            POLICY_FIELD_SUCCESS_ACTION_REDIRECT => self.success_action_redirect = Some(value),
            _ => {
                self.fields.insert(name, value);
            }
        }
        self
    }

    /// Set the acl of the uploaded object.
    pub fn with_acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = Some(acl.into());
        self
    }

    /// Set the status code returned after a successful upload.
    pub fn with_success_action_status(mut self, status: impl Into<String>) -> Self {
        self.success_action_status = Some(status.into());
        self
    }

    /// Set where to redirect after a successful upload.
    pub fn with_success_action_redirect(mut self, url: impl Into<String>) -> Self {
        self.success_action_redirect = Some(url.into());
        self
    }

    /// Set the addressing mode of the form action url.
    pub fn with_addressing(mut self, addressing: AddressingMode) -> Self {
        self.addressing = addressing;
        self
    }

    /// Override the scheme of the config.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Fields bound by a caller exact condition, lower-cased.
    fn exact_fields(&self) -> BTreeSet<String> {
        self.conditions
            .iter()
            .filter_map(|c| match c {
                PolicyCondition::Exact { field, .. } => {
                    Some(field.trim_start_matches('$').to_ascii_lowercase())
                }
                _ => None,
            })
            .collect()
    }

    /// Typed options in the order they enter the policy.
    fn typed_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (POLICY_FIELD_ACL, self.acl.as_deref()),
            (
                POLICY_FIELD_SUCCESS_ACTION_REDIRECT,
                self.success_action_redirect.as_deref(),
            ),
            (
                POLICY_FIELD_SUCCESS_ACTION_STATUS,
                self.success_action_status.as_deref(),
            ),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    fn validate(&self) -> Result<u64> {
        let expires = check_expiration(self.expires_in)?;

        if self.resource.object().is_none() {
            return Err(Error::request_invalid("policy requires an object key"));
        }
        for name in self.fields.keys() {
            if name.is_empty() || is_signer_field(name) {
                return Err(Error::condition_invalid(format!(
                    "form field {name:?} is set by the signer"
                )));
            }
        }

        let mut exact: BTreeMap<String, &str> = BTreeMap::new();
        for condition in &self.conditions {
            condition.validate()?;

            let PolicyCondition::Exact { field, value } = condition else {
                continue;
            };
            let name = field.trim_start_matches('$');
            if is_signer_field(name) {
                return Err(Error::condition_invalid(format!(
                    "condition on {name:?} is set by the signer"
                )));
            }
            if is_ignored_field(name) {
                return Err(Error::condition_invalid(format!(
                    "{name:?} never enters the policy and can't be matched"
                )));
            }

            let bound = self
                .typed_fields()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
                .or_else(|| {
                    self.fields
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(name))
                        .map(|(_, v)| v.as_str())
                });
            let previous = exact.insert(name.to_ascii_lowercase(), value.as_str());
            if bound.into_iter().chain(previous).any(|v| v != value.as_str()) {
                return Err(Error::condition_invalid(format!(
                    "conflicting values for {name:?}"
                )));
            }
        }
        if let Some(scheme) = &self.scheme {
            if !is_http_scheme(scheme) {
                return Err(Error::request_invalid(format!(
                    "scheme must be http or https, got {scheme}"
                )));
            }
        }

        Ok(expires)
    }
}

/// PolicyDocument is everything a html form needs to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    /// Form action url.
    pub url: String,
    /// Base64 encoded policy.
    pub policy: String,
    /// Lowercase hex signature of `policy`.
    pub signature: String,
    /// Hidden form fields.
    pub fields: BTreeMap<String, String>,
}

/// Build and sign the POST policy of `input`.
pub fn sign_policy(
    input: &PolicyInput,
    credential: &Credential,
    config: &Config,
) -> Result<PolicyDocument> {
    config.validate()?;
    let expires = input.validate()?;

    let bucket = input.resource.bucket();
    let key = input.resource.object().unwrap_or_default();
    let address = resolve(&Resource::new(bucket), &input.addressing, &config.endpoint)?;

    let now = input.timestamp;
    let expiration = TimeDelta::try_seconds(expires as i64)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| {
            Error::expiration_out_of_range(format!("{now} + {expires}s is not a valid time"))
        })?;

    let scope = CredentialScope::new(now, &config.location, &config.service);
    debug!("calculated scope: {scope}");

    let signing_key = SigningKey::new(credential, &scope)?;
    let x_goog_algorithm = signing_key.algorithm();
    let x_goog_credential = format!("{}/{scope}", credential.client_email);
    let x_goog_date = format_iso8601(now);

    // Typed options and fields already matched by a caller condition are
    // not repeated.
    let bound = input.exact_fields();
    let mut conditions = input.conditions.clone();
    conditions.push(PolicyCondition::exact(POLICY_FIELD_BUCKET, bucket));
    conditions.push(PolicyCondition::exact(POLICY_FIELD_KEY, key));
    for (field, value) in input.typed_fields() {
        if !bound.contains(field) {
            conditions.push(PolicyCondition::exact(field, value));
        }
    }
    for (field, value) in &input.fields {
        if !is_ignored_field(field) && !bound.contains(&field.to_ascii_lowercase()) {
            conditions.push(PolicyCondition::exact(field, value));
        }
    }
    conditions.push(PolicyCondition::exact(POLICY_FIELD_DATE, &x_goog_date));
    conditions.push(PolicyCondition::exact(POLICY_FIELD_CREDENTIAL, &x_goog_credential));
    conditions.push(PolicyCondition::exact(POLICY_FIELD_ALGORITHM, x_goog_algorithm));

    let document = serde_json::to_string(&Policy {
        conditions: &conditions,
        expiration: format_rfc3339(expiration),
    })
    .map_err(|e| Error::unexpected("failed to serialize policy document").with_source(e))?;
    let document = escape_non_ascii(&document);
    debug!("calculated policy document: {document}");

    let policy = base64_encode(document.as_bytes());
    let signature = signing_key.sign(&policy);

    let mut fields = BTreeMap::new();
    fields.insert(POLICY_FIELD_KEY.to_string(), key.to_string());
    for condition in &input.conditions {
        if let PolicyCondition::Exact { field, value } = condition {
            fields.insert(field.trim_start_matches('$').to_string(), value.clone());
        }
    }
    for (field, value) in input.typed_fields() {
        fields.insert(field.to_string(), value.to_string());
    }
    for (field, value) in &input.fields {
        fields.insert(field.clone(), value.clone());
    }
    fields.insert(POLICY_FIELD_ALGORITHM.to_string(), x_goog_algorithm.to_string());
    fields.insert(POLICY_FIELD_CREDENTIAL.to_string(), x_goog_credential);
    fields.insert(POLICY_FIELD_DATE.to_string(), x_goog_date);
    fields.insert(POLICY_FIELD_SIGNATURE.to_string(), signature.clone());
    fields.insert(POLICY_FIELD_POLICY.to_string(), policy.clone());

    let scheme = address
        .scheme
        .as_deref()
        .or(input.scheme.as_deref())
        .unwrap_or(config.scheme.as_str());
    let mut url = format!("{scheme}://{}{}", address.host, address.path);
    if !url.ends_with('/') {
        url.push('/');
    }

    Ok(PolicyDocument {
        url,
        policy,
        signature,
        fields,
    })
}

/// Fields the signer fills in itself.
fn is_signer_field(name: &str) -> bool {
    [
        POLICY_FIELD_POLICY,
        POLICY_FIELD_KEY,
        POLICY_FIELD_BUCKET,
        POLICY_FIELD_ALGORITHM,
        POLICY_FIELD_CREDENTIAL,
        POLICY_FIELD_DATE,
        POLICY_FIELD_SIGNATURE,
    ]
    .iter()
    .any(|f| f.eq_ignore_ascii_case(name))
}

/// `x-ignore-` fields are submitted with the form but skipped by the policy
/// check. Matched case-insensitively.
fn is_ignored_field(name: &str) -> bool {
    name.get(..POLICY_IGNORED_FIELD_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(POLICY_IGNORED_FIELD_PREFIX))
}

/// Escape every non-ASCII character as `\uXXXX` UTF-16 code units.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut buf = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut buf) {
            out.push_str(&format!("\\u{unit:04x}"));
        }
    }
    out
}
