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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Env values used in google storage signing.
pub const GOOGLE_STORAGE_ENDPOINT: &str = "GOOGLE_STORAGE_ENDPOINT";
pub const GOOGLE_STORAGE_LOCATION: &str = "GOOGLE_STORAGE_LOCATION";
pub const GOOGLE_STORAGE_SCHEME: &str = "GOOGLE_STORAGE_SCHEME";

// Defaults of the signing config.
pub const DEFAULT_ENDPOINT: &str = "storage.googleapis.com";
pub const DEFAULT_LOCATION: &str = "auto";
pub const DEFAULT_SERVICE: &str = "storage";
pub const DEFAULT_SCHEME: &str = "https";

// Signing algorithms and scope constants.
pub const GOOG4_HMAC_SHA256: &str = "GOOG4-HMAC-SHA256";
pub const GOOG4_RSA_SHA256: &str = "GOOG4-RSA-SHA256";
pub const GOOG4_KEY_PREFIX: &str = "GOOG4";
pub const GOOG4_REQUEST: &str = "goog4_request";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Longest lifetime of a V4 signature: 7 days.
pub const MAX_EXPIRATION_SECONDS: u64 = 7 * 24 * 60 * 60;

// Query parameters used in signed urls.
pub const X_GOOG_ALGORITHM: &str = "X-Goog-Algorithm";
pub const X_GOOG_CREDENTIAL: &str = "X-Goog-Credential";
pub const X_GOOG_DATE: &str = "X-Goog-Date";
pub const X_GOOG_EXPIRES: &str = "X-Goog-Expires";
pub const X_GOOG_SIGNED_HEADERS: &str = "X-Goog-SignedHeaders";
pub const X_GOOG_SIGNATURE: &str = "X-Goog-Signature";

/// Query parameters owned by the signer, callers can't set them.
pub const RESERVED_QUERY_PARAMS: [&str; 6] = [
    X_GOOG_ALGORITHM,
    X_GOOG_CREDENTIAL,
    X_GOOG_DATE,
    X_GOOG_EXPIRES,
    X_GOOG_SIGNED_HEADERS,
    X_GOOG_SIGNATURE,
];

// Headers used in google storage signing.
pub const X_GOOG_RESUMABLE: &str = "x-goog-resumable";
pub const CONTENT_MD5: &str = "content-md5";

// Form fields used in POST policies.
pub const POLICY_FIELD_POLICY: &str = "policy";
pub const POLICY_FIELD_KEY: &str = "key";
pub const POLICY_FIELD_BUCKET: &str = "bucket";
pub const POLICY_FIELD_ACL: &str = "acl";
pub const POLICY_FIELD_SUCCESS_ACTION_STATUS: &str = "success_action_status";
pub const POLICY_FIELD_SUCCESS_ACTION_REDIRECT: &str = "success_action_redirect";
pub const POLICY_FIELD_ALGORITHM: &str = "x-goog-algorithm";
pub const POLICY_FIELD_CREDENTIAL: &str = "x-goog-credential";
pub const POLICY_FIELD_DATE: &str = "x-goog-date";
pub const POLICY_FIELD_SIGNATURE: &str = "x-goog-signature";

/// Form fields with this prefix are passed to the form but never enter the policy.
pub const POLICY_IGNORED_FIELD_PREFIX: &str = "x-ignore-";

/// AsciiSet for [Google UriEncode](https://cloud.google.com/storage/docs/authentication/canonical-requests)
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - Used per path segment, the '/' between segments is added back by the caller.
pub static GOOG_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for [Google UriEncode](https://cloud.google.com/storage/docs/authentication/canonical-requests)
///
/// But used in query.
pub static GOOG_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
