//! Sample principals.
//!
//! - admin: ADMIN, USER roles + doc:read, doc:write, doc:delete permissions
//! - editor: USER role + doc:read, doc:write permissions, write on `document`
//! - owner: USER role + doc:read, may edit documents where ownerId is 42
//! - viewer: USER role + doc:read permission
//! - guest: GUEST role, no permissions

use permission_expression_core::InMemoryPermissionContext;

pub fn admin() -> InMemoryPermissionContext {
    InMemoryPermissionContext::new()
        .roles(["ADMIN", "USER"])
        .permissions(["doc:read", "doc:write", "doc:delete"])
        .resource_permission("document", "read")
        .resource_permission("document", "write")
        .resource_permission("document", "delete")
}

pub fn editor() -> InMemoryPermissionContext {
    InMemoryPermissionContext::new()
        .role("USER")
        .permissions(["doc:read", "doc:write"])
        .resource_permission("document", "read")
        .resource_permission("document", "write")
}

pub fn owner() -> InMemoryPermissionContext {
    InMemoryPermissionContext::new()
        .role("USER")
        .permission("doc:read")
        .conditional_permission("doc:edit", "ownerId", "42")
}

pub fn viewer() -> InMemoryPermissionContext {
    InMemoryPermissionContext::new()
        .role("USER")
        .permission("doc:read")
}

pub fn guest() -> InMemoryPermissionContext {
    InMemoryPermissionContext::new().role("GUEST")
}
