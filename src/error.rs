// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocialBookError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid queue key: {0}")]
    InvalidKey(String),

    #[error("{kind} {name} already exists and is not controlled by this SocialBook")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("Invalid port: {0:?}")]
    InvalidPort(String),

    #[error("Missing object key: {0}")]
    MissingObjectKey(&'static str),
}

impl SocialBookError {
    /// Whether the work queue should retry the key with backoff.
    /// Naming conflicts are retried too; they clear once the offending object is removed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SocialBookError::InvalidKey(_))
    }
}

pub type Result<T> = std::result::Result<T, SocialBookError>;
