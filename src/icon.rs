// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use sha2::{Digest, Sha256};

pub const DEFAULT_ICON_SIZE: u32 = 50;

pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Identicon URL derived from the normalised account name. Same name, same icon.
pub fn icon_reference(name: &str, size: u32) -> String {
    let digest = Sha256::digest(normalize(name).as_bytes());
    format!(
        "https://www.gravatar.com/avatar/{:x}?d=identicon&s={}",
        digest, size
    )
}
