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

//! Canonical encoding rules of V4 signing.
//!
//! - [Canonical requests](https://cloud.google.com/storage/docs/authentication/canonical-requests)

use std::collections::BTreeMap;
use std::fmt;

use http::HeaderMap;
use percent_encoding::utf8_percent_encode;
use presign_core::Result;

use crate::constants::{GOOG_QUERY_ENCODE_SET, GOOG_URI_ENCODE_SET};

/// Percent-encode a single path segment.
///
/// Unreserved characters are kept, everything else, `/` included, is
/// encoded as UTF-8 bytes with uppercase hex.
pub fn encode_path(segment: &str) -> String {
    utf8_percent_encode(segment, &GOOG_URI_ENCODE_SET).to_string()
}

/// Percent-encode an object name segment by segment, keeping the `/`
/// separators.
///
/// `folder/my file.txt` becomes `folder/my%20file.txt`.
pub fn encode_object_name(name: &str) -> String {
    name.split('/').map(encode_path).collect::<Vec<_>>().join("/")
}

/// Percent-encode a query key or value.
pub fn encode_query_component(value: &str) -> String {
    utf8_percent_encode(value, &GOOG_QUERY_ENCODE_SET).to_string()
}

/// Build the canonical query string.
///
/// Keys and values are encoded independently, then sorted by encoded key
/// and encoded value.
///
/// ```shell
/// [(b, 2), (a, x y)] => "a=x%20y&b=2"
/// ```
pub fn canonical_query<K, V>(params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs = params
        .into_iter()
        .map(|(k, v)| {
            (
                encode_query_component(k.as_ref()),
                encode_query_component(v.as_ref()),
            )
        })
        .collect::<Vec<_>>();
    pairs.sort();

    let mut s = String::with_capacity(pairs.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (idx, (k, v)) in pairs.iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

/// Canonical form of the signed headers.
///
/// Names are lower-cased and sorted, values are trimmed with internal
/// whitespace runs collapsed to a single space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHeaders {
    headers: Vec<(String, String)>,
}

impl CanonicalHeaders {
    /// Iterate over `(name, value)` pairs sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the canonical value of a header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Names of all headers joined with `;`: `content-type;host`.
    pub fn signed_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Render as `name:value\n` for every header.
impl fmt::Display for CanonicalHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.headers {
            writeln!(f, "{k}:{v}")?;
        }
        Ok(())
    }
}

/// Canonicalize headers.
///
/// Repeated headers are merged into one comma-joined value, keeping the
/// insertion order of their values.
pub fn canonicalize_headers(headers: &HeaderMap) -> Result<CanonicalHeaders> {
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers.iter() {
        merged
            .entry(name.as_str().to_ascii_lowercase())
            .or_default()
            .push(normalize_header_value(value.to_str()?));
    }

    Ok(CanonicalHeaders {
        headers: merged
            .into_iter()
            .map(|(k, values)| (k, values.join(",")))
            .collect(),
    })
}

fn normalize_header_value(value: &str) -> String {
    value.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}
