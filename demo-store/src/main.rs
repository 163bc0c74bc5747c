use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use identity_store::{
    ApiKey, Right, User, UserError, UserStore, UserWithAttributes, ValidationToken,
    connect_data_store,
};

fn init_tracing(app_name: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        {
            format!("identity_store=debug,{app_name}=debug,info").into()
        }

        #[cfg(not(debug_assertions))]
        {
            "info".into()
        }
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Falls back to a throwaway in-memory database when no store is configured
fn open_store() -> Result<UserStore, UserError> {
    match UserStore::from_env() {
        Ok(store) => Ok(store),
        Err(e) => {
            tracing::warn!("{e}; using an in-memory SQLite database");
            Ok(UserStore::new(connect_data_store("sqlite", "sqlite::memory:")?))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("demo_store");

    let store = open_store()?;
    store.init().await?;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let user_id = format!("alice-{}", &suffix[..8]);
    let email = format!("{user_id}@example.com");

    let mut alice = UserWithAttributes::new(
        User::new(&user_id, "Alice", &email, "not-a-real-hash"),
        Default::default(),
    );
    alice
        .attributes
        .insert("locale".to_string(), "en-GB".into());
    store.create(&alice).await?;
    tracing::info!("Created {user_id}");

    let shouted = User::new(user_id.to_uppercase(), "Impostor", "other@example.com", "x");
    match store.create(&shouted).await {
        Err(UserError::UserIdTaken { user_id }) => {
            tracing::info!("Rejected duplicate id {user_id}");
        }
        other => tracing::warn!("Unexpected outcome for duplicate id: {other:?}"),
    }

    let found = store
        .get_by_email(&email.to_uppercase(), UserWithAttributes::default)
        .await?;
    tracing::info!(
        "Found {} by email with attributes {:?}",
        found.user.user_id,
        found.attributes
    );

    let token = ValidationToken::generate(3600);
    store.save_validation_token(&user_id, &token).await?;
    let token = store
        .get_validation_token(&user_id, &token.validation_token)
        .await?;
    let mut validated = found;
    validated.user.validated_at = Some(token.created_at);
    store.update(&validated).await?;
    store
        .delete_validation_token(&user_id, &token.validation_token)
        .await?;
    tracing::info!("Validated {user_id}");

    let key = ApiKey::generate("cli", vec![Right::UserInfo, Right::UserSettingsApiKeys]);
    store.save_api_key(&user_id, &key).await?;
    store
        .update_api_key(&user_id, &ApiKey::new(&key.key, "cli", vec![Right::UserInfo]))
        .await?;
    for key in store.list_api_keys(&user_id).await? {
        tracing::info!("API key {} grants {:?}", key.name, key.rights);
    }
    store.delete_api_key(&user_id, "cli").await?;

    tracing::info!("Demo finished");
    Ok(())
}
