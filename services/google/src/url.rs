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

use http::Uri;
use presign_core::{Error, Result};

use crate::address::ResolvedAddress;
use crate::constants::X_GOOG_SIGNATURE;
use crate::sign_request::QuerySignature;

/// SignedUrl grants its bearer time limited access to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedUrl(String);

impl SignedUrl {
    /// The url as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the url string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse the url into an [`http::Uri`].
    pub fn to_uri(&self) -> Result<Uri> {
        self.0
            .parse()
            .map_err(|e| Error::unexpected("signed url is not a valid uri").with_source(e))
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SignedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Assemble the signed url, `X-Goog-Signature` is always the last parameter.
///
/// The address scheme wins over `scheme`.
pub fn assemble(scheme: &str, address: &ResolvedAddress, signed: &QuerySignature) -> SignedUrl {
    let scheme = address.scheme.as_deref().unwrap_or(scheme);
    SignedUrl(format!(
        "{scheme}://{}{}?{}&{X_GOOG_SIGNATURE}={}",
        address.host, address.path, signed.query, signed.signature
    ))
}
