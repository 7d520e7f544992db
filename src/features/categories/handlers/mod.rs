pub mod category_handler;

pub use category_handler::{
    __path_create_category, __path_delete_category, __path_get_category,
    __path_get_descendants, __path_get_parent_options, __path_list_categories,
    __path_list_flat, __path_list_visible, __path_refresh_categories, __path_update_category,
    create_category, delete_category, get_category, get_descendants, get_parent_options,
    list_categories, list_flat, list_visible, refresh_categories, update_category,
};
