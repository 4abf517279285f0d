// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Labels stamped on every dependent object
pub mod labels {
    pub const APP: &str = "app";
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
    /// Namespace of the owning SocialBook, needed for cluster-scoped dependents
    pub const OWNER_NAMESPACE: &str = "socialbook.ashwin901.operators/owner-namespace";
}

/// The operator name used for field management and labels
pub const OPERATOR_NAME: &str = "socialbook-operator";

/// Name suffixes of the dependent objects
pub mod suffix {
    pub const CONFIG_MAP: &str = "-cm";
    pub const PERSISTENT_VOLUME: &str = "-pv";
    pub const PERSISTENT_VOLUME_CLAIM: &str = "-pvc";
    pub const MONGO: &str = "-mongo";
    pub const NETWORK_POLICY: &str = "-np";
    /// Frontend pod label suffix
    pub const SOCIAL_BOOK: &str = "-sb";
}

pub mod mongo {
    pub const IMAGE: &str = "mongo";
    pub const PORT: i32 = 27017;
    pub const DATA_PATH: &str = "/data/db";
}

pub mod frontend {
    pub const IMAGE: &str = "ashwin901/social-book-server";
}

pub mod storage {
    pub const CAPACITY: &str = "1Gi";
    pub const ACCESS_MODE: &str = "ReadWriteOnce";
    pub const HOST_PATH: &str = "/tmp/data";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
