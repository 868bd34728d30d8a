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
use std::time::Duration;

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use presign_core::time::DateTime;
use presign_core::{Error, Result};

use crate::address::{AddressingMode, Resource};
use crate::config::is_http_scheme;
use crate::constants::{CONTENT_MD5, MAX_EXPIRATION_SECONDS, RESERVED_QUERY_PARAMS};

/// Action is what a signed url allows its bearer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Download an object.
    Read,
    /// List objects of a bucket.
    List,
    /// Upload an object in one request.
    Write,
    /// Delete an object.
    Delete,
    /// Start a resumable upload session.
    Resumable,
}

impl Action {
    /// Map an http method to an action.
    ///
    /// `GET` on a bucket lists it, `GET` on an object reads it.
    pub fn from_method(method: &Method, has_object: bool) -> Result<Self> {
        let action = if *method == Method::GET {
            if has_object {
                Action::Read
            } else {
                Action::List
            }
        } else if *method == Method::PUT {
            Action::Write
        } else if *method == Method::DELETE {
            Action::Delete
        } else if *method == Method::POST {
            Action::Resumable
        } else {
            return Err(Error::request_invalid(format!(
                "http method {method} can't be signed"
            )));
        };

        Ok(action)
    }

    /// The http method of this action.
    pub fn method(&self) -> Method {
        match self {
            Action::Read | Action::List => Method::GET,
            Action::Write => Method::PUT,
            Action::Delete => Method::DELETE,
            Action::Resumable => Method::POST,
        }
    }

    fn requires_object(&self) -> bool {
        !matches!(self, Action::List)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Read => write!(f, "read"),
            Action::List => write!(f, "list"),
            Action::Write => write!(f, "write"),
            Action::Delete => write!(f, "delete"),
            Action::Resumable => write!(f, "resumable"),
        }
    }
}

/// SigningRequest carries everything about a url to sign.
///
/// The signing time is part of the request: signers never read the clock.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    resource: Resource,
    action: Action,
    timestamp: DateTime,
    expires_in: i64,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    addressing: AddressingMode,
    scheme: Option<String>,
}

impl SigningRequest {
    /// Create a request valid for `expires_in` from `timestamp`.
    pub fn new(
        resource: Resource,
        action: Action,
        timestamp: DateTime,
        expires_in: Duration,
    ) -> Self {
        Self {
            resource,
            action,
            timestamp,
            expires_in: duration_to_seconds(expires_in),
            headers: HeaderMap::new(),
            query: Vec::new(),
            addressing: AddressingMode::default(),
            scheme: None,
        }
    }

    /// Create a request from an http method.
    pub fn from_method(
        resource: Resource,
        method: &Method,
        timestamp: DateTime,
        expires_in: Duration,
    ) -> Result<Self> {
        let action = Action::from_method(method, resource.object().is_some())?;
        Ok(Self::new(resource, action, timestamp, expires_in))
    }

    /// Expire at an absolute time instead of a duration.
    pub fn with_expires_at(mut self, expires_at: DateTime) -> Self {
        self.expires_in = (expires_at - self.timestamp).num_seconds();
        self
    }

    /// Sign an extra header, repeated names are kept.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sign all headers in `headers`.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// Require the `content-type` the client will send.
    pub fn with_content_type(mut self, value: HeaderValue) -> Self {
        self.headers.insert(CONTENT_TYPE, value);
        self
    }

    /// Require the `content-md5` the client will send.
    pub fn with_content_md5(mut self, value: HeaderValue) -> Self {
        self.headers
            .insert(HeaderName::from_static(CONTENT_MD5), value);
        self
    }

    /// Add a query parameter to the signed url.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the addressing mode, path style by default.
    pub fn with_addressing(mut self, addressing: AddressingMode) -> Self {
        self.addressing = addressing;
        self
    }

    /// Override the scheme of the config.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Resource to sign.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Action granted by the signature.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Signing time.
    pub fn timestamp(&self) -> DateTime {
        self.timestamp
    }

    /// Extension headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Caller query parameters in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Addressing mode.
    pub fn addressing(&self) -> &AddressingMode {
        &self.addressing
    }

    /// Scheme override.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Lifetime of the signature in seconds.
    ///
    /// Fails with `ExpirationOutOfRange` unless it's within `(0, 604800]`.
    pub fn expiration_seconds(&self) -> Result<u64> {
        check_expiration(self.expires_in)
    }

    /// Check the request before any signing work.
    ///
    /// Returns the expiration seconds.
    pub(crate) fn validate(&self) -> Result<u64> {
        let expires = self.expiration_seconds()?;

        for (key, _) in &self.query {
            if RESERVED_QUERY_PARAMS
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(key))
            {
                return Err(Error::query_param_collision(format!(
                    "query parameter {key} is reserved for the signature"
                )));
            }
        }

        match (self.action.requires_object(), self.resource.object()) {
            (true, None) => {
                return Err(Error::request_invalid(format!(
                    "{} requires an object",
                    self.action
                )))
            }
            (false, Some(_)) => {
                return Err(Error::request_invalid(format!(
                    "{} applies to a bucket, not an object",
                    self.action
                )))
            }
            _ => {}
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

pub(crate) fn duration_to_seconds(d: Duration) -> i64 {
    i64::try_from(d.as_secs()).unwrap_or(i64::MAX)
}

pub(crate) fn check_expiration(secs: i64) -> Result<u64> {
    match u64::try_from(secs) {
        Ok(v) if v > 0 && v <= MAX_EXPIRATION_SECONDS => Ok(v),
        _ => Err(Error::expiration_out_of_range(format!(
            "expiration must be within 1 and {MAX_EXPIRATION_SECONDS} seconds, got {secs}"
        ))),
    }
}
