use campus_catalog::{Catalog, MemoryStore, PageLimits, init_with_store};
use std::sync::Arc;

#[test]
fn init_creates_slice() {
    let slice = init_with_store(Arc::new(MemoryStore::new()), PageLimits::default());
    assert_eq!(slice.id, std::any::TypeId::of::<Catalog>());
    assert_eq!(slice.name, "Catalog");
}
