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

use presign_core::hash::hmac_sha256;
use presign_core::time::{format_date, DateTime};
use presign_core::Result;

use crate::constants::{GOOG4_KEY_PREFIX, GOOG4_REQUEST};
use crate::Credential;

/// CredentialScope binds a signature to a date, a location and a service.
///
/// Rendered as `20200101/auto/storage/goog4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date: String,
    location: String,
    service: String,
}

impl CredentialScope {
    /// Build the scope for the UTC date of `timestamp`.
    pub fn new(
        timestamp: DateTime,
        location: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            date: format_date(timestamp),
            location: location.into(),
            service: service.into(),
        }
    }

    /// Date part of the scope: `YYYYMMDD`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Location part of the scope, `auto` for most requests.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Service part of the scope, `storage` for cloud storage.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.date, self.location, self.service, GOOG4_REQUEST
        )
    }
}

/// Derive the HMAC signing key of `credential` for `scope`.
///
/// Fails with `CredentialInvalid` if the private key is not an HMAC secret.
pub fn derive_signing_key(credential: &Credential, scope: &CredentialScope) -> Result<Vec<u8>> {
    let secret = credential.hmac_secret()?;
    Ok(derive_hmac_signing_key(secret, scope))
}

pub(crate) fn derive_hmac_signing_key(secret: &str, scope: &CredentialScope) -> Vec<u8> {
    // Sign secret
    let secret = format!("{GOOG4_KEY_PREFIX}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), scope.date.as_bytes());
    // Sign location
    let sign_location = hmac_sha256(sign_date.as_slice(), scope.location.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_location.as_slice(), scope.service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), GOOG4_REQUEST.as_bytes())
}
