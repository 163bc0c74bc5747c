pub mod fixtures;

pub use fixtures::*;

use std::sync::Once;

use identity_store::{UserStore, connect_data_store, data_store_from_env};

fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

/// Opens an initialized store on a fresh in-memory database
pub async fn memory_store() -> UserStore {
    init_test_environment();

    let data_store =
        connect_data_store("sqlite", "sqlite::memory:").expect("Failed to create data store");
    let store = UserStore::new(data_store);
    store.init().await.expect("Failed to initialize store");
    store
}

/// Opens an initialized store on the PostgreSQL database named by
/// `GENERIC_DATA_STORE_TYPE=postgres` and `GENERIC_DATA_STORE_URL`, if any
pub async fn postgres_store() -> Option<UserStore> {
    init_test_environment();

    if std::env::var("GENERIC_DATA_STORE_TYPE").as_deref() != Ok("postgres") {
        eprintln!("Skipping PostgreSQL test: GENERIC_DATA_STORE_TYPE is not 'postgres'");
        return None;
    }

    let data_store = data_store_from_env().expect("Failed to create PostgreSQL data store");
    let store = UserStore::new(data_store);
    store
        .init()
        .await
        .expect("Failed to initialize PostgreSQL store");
    Some(store)
}
