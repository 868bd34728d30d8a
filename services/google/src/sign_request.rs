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

use std::fmt;

use http::header::{HeaderName, HeaderValue, HOST};
use http::Method;
use log::debug;
use presign_core::hash::hex_sha256;
use presign_core::time::{format_iso8601, DateTime};
use presign_core::Result;

use crate::address::ResolvedAddress;
use crate::constants::*;
use crate::credential::{Credential, SigningKey};
use crate::encode::{canonical_query, canonicalize_headers, CanonicalHeaders};
use crate::request::{Action, SigningRequest};
use crate::scope::CredentialScope;

/// CanonicalRequest is the exact content hashed into the string to sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    method: Method,
    path: String,
    query: String,
    headers: CanonicalHeaders,
}

impl CanonicalRequest {
    /// Method of the request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Encoded path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical query without `X-Goog-Signature`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Canonical headers.
    pub fn headers(&self) -> &CanonicalHeaders {
        &self.headers
    }
}

impl fmt::Display for CanonicalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;
        // Headers end with a newline already, the blank line is intended.
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.headers.signed_headers())?;
        write!(f, "{UNSIGNED_PAYLOAD}")
    }
}

/// QuerySignature is the result of signing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySignature {
    /// Canonical query with auth parameters and caller parameters.
    pub query: String,
    /// Lowercase hex signature.
    pub signature: String,
}

/// RequestSigner builds V4 query signatures for cloud storage.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    location: String,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl RequestSigner {
    /// Create a new signer for the given service.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }

    /// Set the location of the credential scope.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// The credential scope of a request signed at `timestamp`.
    pub fn scope(&self, timestamp: DateTime) -> CredentialScope {
        CredentialScope::new(timestamp, &self.location, &self.service)
    }

    /// Build the canonical request of `req` to be sent to `address`.
    ///
    /// The request is validated first, no key material is touched.
    pub fn canonical_request(
        &self,
        req: &SigningRequest,
        credential: &Credential,
        address: &ResolvedAddress,
    ) -> Result<CanonicalRequest> {
        let expires = req.validate()?;
        let now = req.timestamp();
        let scope = self.scope(now);

        let headers = {
            let mut headers = req.headers().clone();
            headers.insert(HOST, HeaderValue::from_str(&address.host)?);
            if req.action() == Action::Resumable {
                let name = HeaderName::from_static(X_GOOG_RESUMABLE);
                if !headers.contains_key(&name) {
                    headers.insert(name, HeaderValue::from_static("start"));
                }
            }
            canonicalize_headers(&headers)?
        };

        let query = {
            let mut params = vec![
                (X_GOOG_ALGORITHM.to_string(), credential.algorithm().to_string()),
                (
                    X_GOOG_CREDENTIAL.to_string(),
                    format!("{}/{scope}", credential.client_email),
                ),
                (X_GOOG_DATE.to_string(), format_iso8601(now)),
                (X_GOOG_EXPIRES.to_string(), expires.to_string()),
                (X_GOOG_SIGNED_HEADERS.to_string(), headers.signed_headers()),
            ];
            params.extend(req.query().iter().cloned());
            canonical_query(params)
        };

        Ok(CanonicalRequest {
            method: req.action().method(),
            path: address.path.clone(),
            query,
            headers,
        })
    }

    /// Sign `req` to be sent to `address`.
    pub fn sign(
        &self,
        req: &SigningRequest,
        credential: &Credential,
        address: &ResolvedAddress,
    ) -> Result<QuerySignature> {
        let creq = self.canonical_request(req, credential, address)?;
        debug!("calculated canonical request: {creq}");

        let now = req.timestamp();
        let scope = self.scope(now);
        debug!("calculated scope: {scope}");

        let key = SigningKey::new(credential, &scope)?;

        let string_to_sign = string_to_sign(key.algorithm(), now, &scope, &creq);
        debug!("calculated string to sign: {string_to_sign}");

        Ok(QuerySignature {
            signature: key.sign(&string_to_sign),
            query: creq.query,
        })
    }
}

/// Build the string to sign of a canonical request.
pub fn string_to_sign(
    algorithm: &str,
    now: DateTime,
    scope: &CredentialScope,
    creq: &CanonicalRequest,
) -> String {
    let mut f = String::with_capacity(128);
    f.push_str(algorithm);
    f.push('\n');
    f.push_str(&format_iso8601(now));
    f.push('\n');
    f.push_str(&scope.to_string());
    f.push('\n');
    f.push_str(&hex_sha256(creq.to_string().as_bytes()));
    f
}
