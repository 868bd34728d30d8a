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

//! Sign a download URL and an upload policy.
//!
//! Reads the service account from `GOOGLE_APPLICATION_CREDENTIALS` and falls
//! back to the bundled test key when it is unset.
//!
//! ```shell
//! RUST_LOG=debug cargo run --example sign_url -- my-bucket path/to/object
//! ```

use std::env;
use std::fs;
use std::time::Duration;

use anyhow::Result;
use log::info;
use presign_core::{time, OsEnv};
use presign_google::{
    Action, Config, Credential, PolicyCondition, PolicyInput, Resource, Signer, SigningRequest,
};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let bucket = args.next().unwrap_or_else(|| "example-bucket".to_string());
    let object = args.next().unwrap_or_else(|| "example.txt".to_string());

    let credential = match env::var("GOOGLE_APPLICATION_CREDENTIALS") {
        Ok(path) => Credential::from_slice(&fs::read(path)?)?,
        Err(_) => Credential::from_slice(include_bytes!("../testdata/service_account.json"))?,
    };
    let signer = Signer::new(Config::from_env(&OsEnv), credential);

    let now = time::now();
    let req = SigningRequest::new(
        Resource::new(&bucket).with_object(&object),
        Action::Read,
        now,
        Duration::from_secs(15 * 60),
    );
    let url = signer.sign_url(&req)?;
    info!("signed download url for {bucket}/{object}");
    println!("GET {url}");

    let input = PolicyInput::new(&bucket, &object, now, Duration::from_secs(15 * 60))
        .with_condition(PolicyCondition::content_length_range(0, 10 * 1024 * 1024));
    let doc = signer.sign_policy(&input)?;
    println!("POST {}", doc.url);
    for (name, value) in &doc.fields {
        println!("  {name}={value}");
    }

    Ok(())
}
