pub mod predicate;
pub mod traits;
pub mod types;

pub use predicate::Predicate;
pub use traits::{DynListStore, ListStore};
pub use types::{
    FetchOptions, OrderBy, Projection, RelationPlan, RelationShape, SortDirection,
};
