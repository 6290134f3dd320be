//! Core module containing the resolution-layer building blocks

pub mod entity;
pub mod error;
pub mod filter;
pub mod id;
pub mod input;
pub mod ordering;
pub mod store;
pub mod validation;

pub use entity::{Customer, Order, OrderDetail, Product};
pub use error::{
    CrmError, CrmResult, FilterValidationError, IdentifierError, StorageError, ValidationError,
};
pub use filter::{CustomerFilter, OrderFilter, ProductFilter};
pub use input::NormalizedInput;
pub use ordering::{OrderKey, SortValue, Sortable};
pub use store::{CrmStore, NewCustomer, NewOrder, NewProduct};
