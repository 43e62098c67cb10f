//! Service wiring: in-memory stores behind the auth and listing use cases.

use std::sync::Arc;

use anyhow::Context as _;

use chatop_auth::{AuthError, AuthenticationService, Registration, Role, TokenCodec};
use chatop_infra::{InMemoryMessageStore, InMemoryRentalStore, InMemoryUserStore};
use chatop_rentals::{MessageService, RentalService};

use crate::config::{ApiConfig, BootstrapAdmin};

pub struct AppServices {
    pub auth: AuthenticationService,
    pub rentals: RentalService,
    pub messages: MessageService,
}

pub async fn build_services(config: &ApiConfig, codec: Arc<TokenCodec>) -> anyhow::Result<AppServices> {
    let users = Arc::new(InMemoryUserStore::new());
    let rentals = Arc::new(InMemoryRentalStore::new());
    let messages = Arc::new(InMemoryMessageStore::new());

    let auth = AuthenticationService::new(users, codec, config.passwords)
        .context("failed to initialize authentication service")?;

    let services = AppServices {
        auth,
        rentals: RentalService::new(rentals.clone()),
        messages: MessageService::new(messages, rentals),
    };

    if let Some(admin) = &config.bootstrap_admin {
        seed_admin(&services.auth, admin).await?;
    }

    Ok(services)
}

async fn seed_admin(auth: &AuthenticationService, admin: &BootstrapAdmin) -> anyhow::Result<()> {
    let registration = Registration {
        email: admin.email.clone(),
        name: admin.name.clone(),
        password: admin.password.clone(),
    };
    match auth.register_with_role(registration, Role::Admin).await {
        Ok(principal) => {
            tracing::info!(user_id = %principal.id, "bootstrap admin created");
            Ok(())
        }
        Err(AuthError::DuplicateEmail(_)) => {
            tracing::info!("bootstrap admin already present");
            Ok(())
        }
        Err(e) => Err(e).context("failed to seed bootstrap admin"),
    }
}
