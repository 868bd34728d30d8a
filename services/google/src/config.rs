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

use presign_core::{Env, Error, Result};

use crate::constants::*;

/// Config for google cloud storage signing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Storage endpoint without scheme, `storage.googleapis.com` by default.
    pub endpoint: String,
    /// Location of the credential scope, `auto` by default.
    pub location: String,
    /// Service of the credential scope, `storage` by default.
    pub service: String,
    /// Scheme of signed urls, `https` by default.
    pub scheme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            service: DEFAULT_SERVICE.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl Config {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Set the scheme, `http` or `https`.
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Load config from environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env(env: &impl Env) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = env.var(GOOGLE_STORAGE_ENDPOINT) {
            cfg.endpoint = v;
        }

        if let Some(v) = env.var(GOOGLE_STORAGE_LOCATION) {
            cfg.location = v;
        }

        if let Some(v) = env.var(GOOGLE_STORAGE_SCHEME) {
            cfg.scheme = v;
        }

        cfg
    }

    /// Check the config can be used to sign.
    pub fn validate(&self) -> Result<()> {
        if !is_http_scheme(&self.scheme) {
            return Err(Error::config_invalid(format!(
                "scheme must be http or https, got {}",
                self.scheme
            )));
        }
        if self.endpoint.is_empty() || self.endpoint.contains("://") || self.endpoint.contains('/')
        {
            return Err(Error::config_invalid(format!(
                "endpoint must be a bare host, got {:?}",
                self.endpoint
            )));
        }
        if self.location.is_empty() {
            return Err(Error::config_invalid("location must not be empty"));
        }
        if self.service.is_empty() {
            return Err(Error::config_invalid("service must not be empty"));
        }
        Ok(())
    }
}

pub(crate) fn is_http_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https")
}
