// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::SocialBookError;
use kube::ResourceExt;
use std::fmt;
use std::str::FromStr;

/// Namespace and name of a SocialBook, rendered as `<namespace>/<name>` on the work queue.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReconcileKey {
    pub namespace: String,
    pub name: String,
}

impl ReconcileKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn from_resource<K: ResourceExt>(obj: &K) -> Self {
        Self::new(obj.namespace().unwrap_or_default(), obj.name_any())
    }
}

impl fmt::Display for ReconcileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

impl FromStr for ReconcileKey {
    type Err = SocialBookError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = key.split('/').collect();
        let (namespace, name) = match parts.as_slice() {
            [name] => ("", *name),
            [namespace, name] => (*namespace, *name),
            _ => return Err(SocialBookError::InvalidKey(key.to_string())),
        };

        if name.is_empty() {
            return Err(SocialBookError::InvalidKey(key.to_string()));
        }

        Ok(Self::new(namespace, name))
    }
}
