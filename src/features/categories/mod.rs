//! Hierarchical content categories.
//!
//! Categories form a forest through their `parentId`. This feature owns the
//! tree invariants (no cycles, no self-parenting, no reparenting under one's
//! own descendant) and serves both the dashboard tree editor and the list
//! editor through the same endpoints. Records live in an external category
//! store reached through [`clients::CategoryStore`].
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | Flat list, or forest with `?tree=true` |
//! | GET | `/api/categories/flat` | Depth-annotated pre-order list |
//! | GET | `/api/categories/visible` | Tree view rows for a set of expanded ids |
//! | GET | `/api/categories/parent-options` | Legal parents for a create/edit form |
//! | GET | `/api/categories/{id}` | Get category |
//! | GET | `/api/categories/{id}/descendants` | Descendant ids |
//! | POST | `/api/categories` | Create category |
//! | PUT | `/api/categories/{id}` | Edit or reparent category |
//! | DELETE | `/api/categories/{id}` | Delete category per delete policy |
//! | POST | `/api/categories/refresh` | Refetch the category snapshot |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod tree;

pub use routes::routes;
pub use services::CategoryService;
