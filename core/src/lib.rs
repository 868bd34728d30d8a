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

//! Core components for presigning object storage requests.
//!
//! This crate provides the building blocks shared by the service signers of
//! the presign ecosystem. Service crates (for example `presign-google`) build
//! canonical requests on top of these primitives.
//!
//! ## Overview
//!
//! - **Error**: a single [`Error`] type carrying an [`ErrorKind`], so callers can
//!   tell request-configuration mistakes apart from unexpected failures.
//! - **Env**: an abstraction over environment variables used by service configs.
//!   [`OsEnv`] reads the process environment, [`StaticEnv`] is handy in tests.
//!
//! ## Example
//!
//! ```
//! use presign_core::hash::hex_hmac_sha256;
//! use presign_core::time::{format_date, parse_rfc3339};
//!
//! let now = parse_rfc3339("2020-01-01T00:00:00Z").unwrap();
//! assert_eq!(format_date(now), "20200101");
//!
//! let sig = hex_hmac_sha256(b"key", b"content");
//! assert_eq!(sig.len(), 64);
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time formatting and parsing utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod env;
pub use env::{Env, OsEnv, StaticEnv};
mod error;
pub use error::{Error, ErrorKind, Result};
