//! Product records and the store that holds them.

pub mod entity;

use crate::domain::Product;
use crate::store_framework::Store;

/// The store the workers apply update events to.
pub type ProductStore = Store<Product>;
