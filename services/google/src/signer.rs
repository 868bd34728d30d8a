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

use std::sync::Arc;

use log::debug;
use presign_core::Result;

use crate::address::resolve;
use crate::policy::{sign_policy, PolicyDocument, PolicyInput};
use crate::request::SigningRequest;
use crate::sign_request::RequestSigner;
use crate::url::{assemble, SignedUrl};
use crate::{Config, Credential};

/// Signer ties a config and a credential together.
///
/// Cloning is cheap, the credential is shared and never mutated.
#[derive(Debug, Clone)]
pub struct Signer {
    config: Arc<Config>,
    credential: Arc<Credential>,
    request_signer: RequestSigner,
}

impl Signer {
    /// Create a new signer.
    pub fn new(config: Config, credential: Credential) -> Self {
        let request_signer =
            RequestSigner::new(config.service.clone()).with_location(config.location.clone());

        Self {
            config: Arc::new(config),
            credential: Arc::new(credential),
            request_signer,
        }
    }

    /// The config of this signer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign `req` into a url.
    pub fn sign_url(&self, req: &SigningRequest) -> Result<SignedUrl> {
        self.config.validate()?;

        let address = resolve(req.resource(), req.addressing(), &self.config.endpoint)?;
        let signed = self.request_signer.sign(req, &self.credential, &address)?;

        let scheme = req.scheme().unwrap_or(self.config.scheme.as_str());
        let url = assemble(scheme, &address, &signed);
        debug!("signed {} url for {}{}", req.action(), address.host, address.path);
        Ok(url)
    }

    /// Sign a POST policy for `input`.
    pub fn sign_policy(&self, input: &PolicyInput) -> Result<PolicyDocument> {
        sign_policy(input, &self.credential, &self.config)
    }
}
