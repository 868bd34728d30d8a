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

use presign_core::{Error, Result};

use crate::config::is_http_scheme;
use crate::encode::{encode_object_name, encode_path};

/// Resource points to a bucket or an object inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    bucket: String,
    object: Option<String>,
}

impl Resource {
    /// Refer to a bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            object: None,
        }
    }

    /// Refer to an object in this bucket.
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Name of the bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Name of the object, `None` for bucket level resources.
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::request_invalid("bucket name must not be empty"));
        }
        if self.object.as_deref() == Some("") {
            return Err(Error::request_invalid("object name must not be empty"));
        }
        Ok(())
    }
}

/// A host bound to a bucket, usually a CNAME or a load balancer in front
/// of storage.
///
/// Accepts `cdn.example.com` or `https://cdn.example.com`. When the scheme
/// is given it overrides the scheme of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundHostname {
    scheme: Option<String>,
    authority: String,
}

impl BoundHostname {
    /// Parse a bound hostname.
    ///
    /// Fails with `AddressingInvalid` if the host is empty or carries a path.
    pub fn new(host: &str) -> Result<Self> {
        let host = host.trim();

        let (scheme, authority) = match host.split_once("://") {
            Some((scheme, authority)) => {
                let scheme = scheme.to_ascii_lowercase();
                if !is_http_scheme(&scheme) {
                    return Err(Error::addressing_invalid(format!(
                        "bound hostname {host} must use http or https"
                    )));
                }
                (Some(scheme), authority)
            }
            None => (None, host),
        };
        let authority = authority.trim_end_matches('/');

        if authority.is_empty() {
            return Err(Error::addressing_invalid("bound hostname must not be empty"));
        }
        if authority.contains('/') {
            return Err(Error::addressing_invalid(format!(
                "bound hostname {host} must not contain a path"
            )));
        }

        Ok(Self {
            scheme,
            authority: authority.to_string(),
        })
    }

    /// Scheme embedded in the hostname, if any.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Host and optional port, used as the `host` header.
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

impl fmt::Display for BoundHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scheme {
            Some(scheme) => write!(f, "{scheme}://{}", self.authority),
            None => write!(f, "{}", self.authority),
        }
    }
}

/// AddressingMode decides how the bucket is placed in the url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AddressingMode {
    /// `https://storage.googleapis.com/bucket/object`
    #[default]
    PathStyle,
    /// `https://bucket.storage.googleapis.com/object`
    VirtualHostedStyle,
    /// `https://cdn.example.com/object`
    BoundHostname(BoundHostname),
}

impl AddressingMode {
    /// Build a bound hostname mode.
    pub fn bound_hostname(host: &str) -> Result<Self> {
        Ok(Self::BoundHostname(BoundHostname::new(host)?))
    }

    /// Parse the textual url style used by client libraries.
    ///
    /// `None` falls back to path style. `BUCKET_BOUND_HOSTNAME` requires `host`.
    pub fn from_style(style: Option<&str>, host: Option<&str>) -> Result<Self> {
        match style {
            None | Some("PATH_STYLE") => Ok(Self::PathStyle),
            Some("VIRTUAL_HOSTED_STYLE") => Ok(Self::VirtualHostedStyle),
            Some("BUCKET_BOUND_HOSTNAME") => {
                let host = host.ok_or_else(|| {
                    Error::addressing_invalid("BUCKET_BOUND_HOSTNAME requires a bound hostname")
                })?;
                Self::bound_hostname(host)
            }
            Some(v) => Err(Error::addressing_invalid(format!("unknown url style: {v}"))),
        }
    }
}

/// ResolvedAddress is where the signed request will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// Scheme dictated by the address itself, overrides the request scheme.
    pub scheme: Option<String>,
    /// Value of the `host` header.
    pub host: String,
    /// Encoded absolute path.
    pub path: String,
}

/// Resolve host and path of `resource`.
pub fn resolve(
    resource: &Resource,
    mode: &AddressingMode,
    endpoint: &str,
) -> Result<ResolvedAddress> {
    resource.validate()?;

    let object_path = match resource.object() {
        Some(object) => format!("/{}", encode_object_name(object)),
        None => String::new(),
    };

    let address = match mode {
        AddressingMode::PathStyle => ResolvedAddress {
            scheme: None,
            host: endpoint.to_string(),
            path: format!("/{}{object_path}", encode_path(resource.bucket())),
        },
        AddressingMode::VirtualHostedStyle => ResolvedAddress {
            scheme: None,
            host: format!("{}.{endpoint}", resource.bucket()),
            path: root_or(object_path),
        },
        AddressingMode::BoundHostname(bound) => ResolvedAddress {
            scheme: bound.scheme().map(str::to_string),
            host: bound.authority().to_string(),
            path: root_or(object_path),
        },
    };

    Ok(address)
}

fn root_or(path: String) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}
