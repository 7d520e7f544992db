mod category;
mod delete_policy;
mod tree;

pub use category::{
    default_icon, deserialize_optional_text, deserialize_parent_id, CategoryId, CategoryRecord,
    CategoryStatus, DEFAULT_CATEGORY_ICON,
};
pub use delete_policy::DeletePolicy;
pub use tree::{CategoryNode, FlatNode, ParentOptions, TreeAnomaly, TreeBuild, VisibleRows};
