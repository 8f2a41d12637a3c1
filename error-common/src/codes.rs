// Error codes implementation
// This module contains standardized error codes for the EMR portal

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod authentication {
    pub const INVALID_CREDENTIALS: &str = "AUTH_2001";
    pub const SESSION_INVALID: &str = "AUTH_2003";
}

pub mod authorization {
    pub const ACCESS_DENIED: &str = "AUTHZ_3001";
    pub const INSUFFICIENT_PERMISSIONS: &str = "AUTHZ_3002";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_4004";
}

pub mod network {
    pub const TRANSPORT_FAILED: &str = "NET_5001";
    pub const TIMEOUT: &str = "NET_5002";
}

pub mod system {
    pub const CONFIGURATION: &str = "SYS_9001";
    pub const INTERNAL: &str = "SYS_9999";
}
