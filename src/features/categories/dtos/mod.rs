pub mod category_dto;

pub use category_dto::{
    CategoryEditInput, DeleteCategoryResponseDto, DescendantsResponseDto, ListCategoriesQuery,
    NewCategoryInput, ParentOptionsQuery, RefreshResponseDto, VisibleRowsQuery,
};
