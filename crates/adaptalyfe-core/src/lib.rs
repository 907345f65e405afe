//! AdaptaLyfe Core - domain records, embedded storage, and object access control.
//!
//! This crate provides the storage layer and the access-policy model shared
//! by the AdaptaLyfe backend services.

pub mod acl;
pub mod error;
pub mod store;

pub use error::Error;

// ACL exports
pub use acl::{
    can_access, AccessGroup, AclError, AclGroup, AclPolicy, AclResult, AclRule, GroupRegistry,
    GroupResolver, Permission, UserListGroup, Visibility, ACL_POLICY_METADATA_KEY,
    USER_LIST_GROUP,
};

// Storage exports
pub use store::{
    AppStore, Bill, BillStore, CareGroup, CareGroupResolver, CareGroupStore, DailyTask, Frequency,
    Medication, MedicationStore, Role, SymptomEntry, SymptomStore, TaskStore, User, UserStore,
};
