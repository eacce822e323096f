//! Catalog use cases: public browsing and staff-only creation

mod companies;
mod items;

pub use companies::{
  CompanyDto, CreateCompanyCommand, CreateCompanyUseCase, GetCompanyUseCase, ListCompaniesUseCase,
};
pub use items::{
  CreateItemCommand, CreateItemUseCase, GetItemUseCase, ItemDto, ListItemsCommand,
  ListItemsUseCase,
};
