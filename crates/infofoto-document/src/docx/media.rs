// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embedded media store. Parts are named by content hash so an image used in
// several places (the logo on the cover and in every header) is stored once.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Encoded image formats the package can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Jpeg,
    Png,
}

impl MediaKind {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }
}

/// One `word/media/*` part.
#[derive(Debug, Clone)]
pub struct MediaPart {
    /// Target relative to `word/`, e.g. `media/image-1a2b3c4d5e6f.jpeg`.
    pub target: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MediaStore {
    parts: Vec<MediaPart>,
    by_hash: HashMap<String, usize>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` (or find an identical earlier copy) and return its target.
    pub fn add(&mut self, bytes: &[u8], kind: MediaKind) -> String {
        let digest = hex::encode(Sha256::digest(bytes));
        let key = format!("{}.{}", digest, kind.extension());
        if let Some(&idx) = self.by_hash.get(&key) {
            return self.parts[idx].target.clone();
        }
        let target = format!("media/image-{}.{}", &digest[..12], kind.extension());
        self.by_hash.insert(key, self.parts.len());
        self.parts.push(MediaPart {
            target: target.clone(),
            bytes: bytes.to_vec(),
        });
        target
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<MediaPart> {
        self.parts
    }
}
