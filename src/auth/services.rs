use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, PublicUser, RegisterRequest},
    password::{hash_password, verify_password, MIN_PASSWORD_LEN},
};
use crate::{
    error::AppError,
    store::{ContentStore, StoreError, User, UserFilter},
    validation::{is_blank, is_valid_email, ValidationErrors},
};

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub async fn register(
    store: &dyn ContentStore,
    payload: RegisterRequest,
) -> Result<PublicUser, AppError> {
    let email = normalize_email(&payload.email);

    let mut errors = ValidationErrors::new();
    if is_blank(&payload.name) {
        errors.add("name", "Name is required.");
    }
    if !is_valid_email(&email) {
        errors.add("email", "Invalid email address.");
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
        );
    }
    errors.into_result()?;

    if store.find_user(&UserFilter::by_email(&email)).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        email,
        password_hash: hash_password(&payload.password)?,
        created_at: OffsetDateTime::now_utc(),
    };

    // a concurrent registration can still win the race
    let user = match store.insert_user(user).await {
        Ok(u) => u,
        Err(StoreError::Duplicate { field: "email" }) => return Err(AppError::DuplicateEmail),
        Err(e) => return Err(AppError::Store(e)),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user.into())
}

pub async fn login(store: &dyn ContentStore, payload: LoginRequest) -> Result<PublicUser, AppError> {
    let email = normalize_email(&payload.email);

    let mut errors = ValidationErrors::new();
    if !is_valid_email(&email) {
        errors.add("email", "Invalid email address.");
    }
    if payload.password.is_empty() {
        errors.add("password", "Password is required.");
    }
    errors.into_result()?;

    let Some(user) = store.find_user(&UserFilter::by_email(&email)).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn jane() -> RegisterRequest {
        RegisterRequest {
            name: "Jane Doe".into(),
            email: "  Jane@Example.COM ".into(),
            password: "correct-horse".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = InMemoryStore::new();
        let user = register(&store, jane()).await.unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.name, "Jane Doe");

        let stored = store
            .find_user(&UserFilter::by_email("jane@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "correct-horse");

        let logged_in = login(
            &store,
            LoginRequest {
                email: "JANE@example.com".into(),
                password: "correct-horse".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged_in, user);
    }

    #[tokio::test]
    async fn email_is_unique_case_insensitively() {
        let store = InMemoryStore::new();
        register(&store, jane()).await.unwrap();

        let mut again = jane();
        again.email = "jane@example.com".into();
        let err = register(&store, again).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_reports_every_bad_field() {
        let store = InMemoryStore::new();
        let err = register(
            &store,
            RegisterRequest {
                name: "".into(),
                email: "not-an-email".into(),
                password: "short".into(),
            },
        )
        .await
        .unwrap_err();
        for field in ["name", "email", "password"] {
            assert!(!err.field_messages(field).is_empty(), "{field}");
        }
    }

    #[tokio::test]
    async fn bad_credentials_look_the_same() {
        let store = InMemoryStore::new();
        register(&store, jane()).await.unwrap();

        let wrong_password = login(
            &store,
            LoginRequest {
                email: "jane@example.com".into(),
                password: "battery-staple".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown = login(
            &store,
            LoginRequest {
                email: "nobody@example.com".into(),
                password: "correct-horse".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }
}
