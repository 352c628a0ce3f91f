use crate::{
    database::{assert::assert_email_free, encode, Collection, RecordStore},
    error::AppError,
    gate::Role,
    models::users::StaffProfile,
    utils::{hash_password, new_salt},
};

const MIN_PASSWORD_LEN: usize = 6;

pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
}

pub fn validate_account(account: &NewAccount) -> Result<(), AppError> {
    let email = account.email.trim();
    if email.is_empty() || account.password.is_empty() || account.role.is_empty() {
        return Err(AppError::validation("Please fill all required fields."));
    }
    if !email.contains('@') {
        return Err(AppError::validation("Invalid email address."));
    }
    if account.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "Password must be at least 6 characters.",
        ));
    }
    match Role::parse(&account.role) {
        Some(Role::Admin) | None => Err(AppError::validation("Unknown role.")),
        Some(_) => Ok(()),
    }
}

pub fn create_account(store: &dyn RecordStore, account: NewAccount) -> anyhow::Result<String> {
    validate_account(&account)?;
    let email = account.email.trim().to_string();
    assert_email_free(store, &email)?;

    let salt = new_salt();
    let profile = StaffProfile {
        email,
        display_name: account.display_name.trim().to_string(),
        role: account.role,
        password_hash: hash_password(&salt, &account.password),
        password_salt: salt,
        ..Default::default()
    };
    store.insert(Collection::Users, encode(&profile)?)
}

/// Creates the first supervisor when no accounts exist yet.
pub fn seed_supervisor(store: &dyn RecordStore, email: &str, password: &str) -> anyhow::Result<bool> {
    if !store.list_all(Collection::Users)?.is_empty() {
        return Ok(false);
    }
    create_account(
        store,
        NewAccount {
            email: email.to_string(),
            password: password.to_string(),
            display_name: "Supervisor".to_string(),
            role: Role::Supervisor.as_str().to_string(),
        },
    )?;
    tracing::info!(email, "seeded supervisor account");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{fetch, MemoryStore};

    fn account(email: &str, password: &str, role: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password: password.to_string(),
            display_name: " Sam ".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn accounts_store_salted_hashes() {
        let store = MemoryStore::new();
        let id = create_account(&store, account("sam@example.com", "secret1", "staff")).unwrap();
        let profile: StaffProfile = fetch(&store, Collection::Users, &id).unwrap().unwrap();
        assert_eq!(profile.display_name, "Sam");
        assert_ne!(profile.password_hash, "secret1");
        assert_eq!(
            profile.password_hash,
            hash_password(&profile.password_salt, "secret1")
        );
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        create_account(&store, account("sam@example.com", "secret1", "staff")).unwrap();
        let err: AppError = create_account(&store, account("SAM@example.com", "secret2", "staff"))
            .unwrap_err()
            .into();
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn validation_rules() {
        assert!(validate_account(&account("sam@example.com", "secret1", "callcenter")).is_ok());
        assert!(validate_account(&account("", "secret1", "staff")).is_err());
        assert!(validate_account(&account("sam", "secret1", "staff")).is_err());
        assert!(validate_account(&account("sam@example.com", "short", "staff")).is_err());
        assert!(validate_account(&account("sam@example.com", "secret1", "admin")).is_err());
        assert!(validate_account(&account("sam@example.com", "secret1", "boss")).is_err());
    }

    #[test]
    fn seeding_only_happens_once() {
        let store = MemoryStore::new();
        assert!(seed_supervisor(&store, "boss@example.com", "secret1").unwrap());
        assert!(!seed_supervisor(&store, "boss@example.com", "secret1").unwrap());
        assert_eq!(store.list_all(Collection::Users).unwrap().len(), 1);
    }
}
