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

//! Google Cloud Storage V4 signer
//!
//! Builds signed urls and signed POST policies with either an HMAC key
//! (`GOOG4-HMAC-SHA256`) or a service account RSA key (`GOOG4-RSA-SHA256`).
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use chrono::{TimeZone, Utc};
//! use presign_google::{Action, Config, Credential, Resource, Signer, SigningRequest};
//!
//! # fn main() -> presign_core::Result<()> {
//! let credential = Credential::new(
//!     "GOOG1EXAMPLEHMACACCESSIDFORTESTS",
//!     "n2Dpj2mx8j9ypk6ZG5niSQopFwRaGY9fb0e0/ac+",
//! );
//! let signer = Signer::new(Config::default(), credential);
//!
//! let req = SigningRequest::new(
//!     Resource::new("validation-bucket").with_object("test.txt"),
//!     Action::Read,
//!     Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
//!     Duration::from_secs(600),
//! );
//! let url = signer.sign_url(&req)?;
//! assert!(url
//!     .as_str()
//!     .starts_with("https://storage.googleapis.com/validation-bucket/test.txt?"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod constants;
pub use constants::MAX_EXPIRATION_SECONDS;

mod address;
pub use address::{resolve, AddressingMode, BoundHostname, ResolvedAddress, Resource};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

pub mod encode;

mod policy;
pub use policy::{sign_policy, PolicyCondition, PolicyDocument, PolicyInput};

mod request;
pub use request::{Action, SigningRequest};

mod scope;
pub use scope::{derive_signing_key, CredentialScope};

mod sign_request;
pub use sign_request::{string_to_sign, CanonicalRequest, QuerySignature, RequestSigner};

mod signer;
pub use signer::Signer;

mod url;
pub use url::{assemble, SignedUrl};
