use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use tokio::sync::broadcast;

use crate::{
    database::{decode, encode, fetch, list, Collection, RecordStore},
    error::AppError,
    gate::{Principal, Role, SessionContext},
    models::{sessions::Session, users::StaffProfile},
    utils::hash_password,
};

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { uid: String },
    SignedOut { uid: String },
}

/// Email/password sign-in backed by the `users` and `sessions` collections.
/// Sign-in and sign-out are announced on a broadcast channel.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn RecordStore>,
    ttl_secs: i64,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthService {
    pub fn new(store: Arc<dyn RecordStore>, ttl_secs: i64) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            store,
            ttl_secs,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns the new session token and the signed-in principal.
    pub fn sign_in(&self, email: &str, password: &str) -> anyhow::Result<(String, Principal)> {
        let email = email.trim();
        let user = list::<StaffProfile>(self.store.as_ref(), Collection::Users)?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email));

        let user = match user {
            Some(user) if hash_password(&user.password_salt, password) == user.password_hash => {
                user
            }
            _ => bail!(AppError::validation(LOGIN_FAILED)),
        };

        self.prune_expired()?;

        let session = Session {
            id: String::new(),
            uid: user.id.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            login_time: Utc::now(),
        };
        let token = self.store.insert(Collection::Sessions, encode(&session)?)?;

        tracing::info!(uid = %user.id, "signed in");
        let _ = self.events.send(SessionEvent::SignedIn {
            uid: user.id.clone(),
        });
        Ok((token, principal_of(user)))
    }

    pub fn sign_out(&self, token: &str) -> anyhow::Result<()> {
        if token.is_empty() {
            return Ok(());
        }
        if let Some(session) = fetch::<Session>(self.store.as_ref(), Collection::Sessions, token)? {
            self.store.delete(Collection::Sessions, token)?;
            tracing::info!(uid = %session.uid, "signed out");
            let _ = self.events.send(SessionEvent::SignedOut { uid: session.uid });
        }
        Ok(())
    }

    /// Context for a bearer token. Unknown or expired tokens resolve to an
    /// anonymous context. The role is the one recorded at sign-in.
    pub fn resolve(&self, token: &str) -> anyhow::Result<SessionContext> {
        if token.is_empty() {
            return Ok(SessionContext::anonymous());
        }

        let store = self.store.as_ref();
        let session = match fetch::<Session>(store, Collection::Sessions, token)? {
            Some(session) => session,
            None => return Ok(SessionContext::anonymous()),
        };

        if self.is_expired(&session) {
            store.delete(Collection::Sessions, token)?;
            tracing::debug!(uid = %session.uid, "session expired");
            return Ok(SessionContext::anonymous());
        }

        Ok(SessionContext::signed_in(Principal {
            role: Role::parse(&session.role),
            uid: session.uid,
            display_name: session.display_name,
            email: session.email,
        }))
    }

    fn is_expired(&self, session: &Session) -> bool {
        Utc::now()
            .signed_duration_since(session.login_time)
            .num_seconds()
            > self.ttl_secs
    }

    /// Deletes every session past its TTL, abandoned ones included.
    /// Returns how many were removed.
    pub fn prune_expired(&self) -> anyhow::Result<usize> {
        let store = self.store.as_ref();
        let mut removed = 0;
        for doc in store.list_all(Collection::Sessions)? {
            let id = doc.id.clone();
            let expired = match decode::<Session>(doc) {
                Ok(session) => self.is_expired(&session),
                Err(err) => {
                    tracing::warn!(%id, "dropping unreadable session: {:#}", err);
                    true
                }
            };
            if expired {
                store.delete(Collection::Sessions, &id)?;
                removed += 1;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "pruned expired sessions");
        }
        Ok(removed)
    }
}

fn principal_of(user: StaffProfile) -> Principal {
    Principal {
        role: Role::parse(&user.role),
        uid: user.id,
        display_name: user.display_name,
        email: user.email,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::accounts::{create_account, NewAccount},
        database::MemoryStore,
    };
    use chrono::Duration;
    use serde_json::Value;

    fn backdate(store: &MemoryStore, token: &str, secs: i64) {
        let login_time = Utc::now() - Duration::seconds(secs);
        let mut fields = crate::database::Fields::new();
        fields.insert(
            "loginTime".to_string(),
            Value::String(login_time.to_rfc3339()),
        );
        store.update(Collection::Sessions, token, fields).unwrap();
    }

    fn service(ttl_secs: i64) -> (Arc<MemoryStore>, AuthService) {
        let store = Arc::new(MemoryStore::new());
        create_account(
            store.as_ref(),
            NewAccount {
                email: "dana@example.com".to_string(),
                password: "secret1".to_string(),
                display_name: "Dana".to_string(),
                role: "callcenter".to_string(),
            },
        )
        .unwrap();
        let auth = AuthService::new(store.clone(), ttl_secs);
        (store, auth)
    }

    #[test]
    fn sign_in_resolves_principal() {
        let (_store, auth) = service(3600);
        let (token, principal) = auth.sign_in("DANA@example.com ", "secret1").unwrap();
        assert_eq!(principal.role, Some(Role::CallCenter));

        let ctx = auth.resolve(&token).unwrap();
        assert_eq!(ctx.principal().unwrap().display_name, "Dana");
    }

    #[test]
    fn wrong_password_is_a_validation_error() {
        let (_store, auth) = service(3600);
        let err: AppError = auth.sign_in("dana@example.com", "nope").unwrap_err().into();
        assert_eq!(err.user_message(), LOGIN_FAILED);
        let err: AppError = auth.sign_in("who@example.com", "secret1").unwrap_err().into();
        assert_eq!(err.user_message(), LOGIN_FAILED);
    }

    #[test]
    fn sign_out_ends_session() {
        let (_store, auth) = service(3600);
        let (token, _) = auth.sign_in("dana@example.com", "secret1").unwrap();
        auth.sign_out(&token).unwrap();
        assert_eq!(auth.resolve(&token).unwrap(), SessionContext::anonymous());
        auth.sign_out(&token).unwrap();
    }

    #[test]
    fn expired_sessions_are_anonymous() {
        let (store, auth) = service(60);
        let (token, _) = auth.sign_in("dana@example.com", "secret1").unwrap();
        backdate(&store, &token, 120);

        assert_eq!(auth.resolve(&token).unwrap(), SessionContext::anonymous());
        assert!(store.get(Collection::Sessions, &token).unwrap().is_none());
    }

    #[test]
    fn sign_in_prunes_abandoned_sessions() {
        let (store, auth) = service(60);
        let (old_a, _) = auth.sign_in("dana@example.com", "secret1").unwrap();
        let (old_b, _) = auth.sign_in("dana@example.com", "secret1").unwrap();
        let (fresh, _) = auth.sign_in("dana@example.com", "secret1").unwrap();
        backdate(&store, &old_a, 120);
        backdate(&store, &old_b, 120);

        let (latest, _) = auth.sign_in("dana@example.com", "secret1").unwrap();
        let left: Vec<String> = store
            .list_all(Collection::Sessions)
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        assert_eq!(left, vec![fresh, latest]);
        assert_eq!(auth.prune_expired().unwrap(), 0);
    }

    #[test]
    fn role_is_fixed_for_the_session() {
        let (store, auth) = service(3600);
        let (token, principal) = auth.sign_in("dana@example.com", "secret1").unwrap();

        let mut fields = crate::database::Fields::new();
        fields.insert("role".to_string(), Value::from("supervisor"));
        store.update(Collection::Users, &principal.uid, fields).unwrap();

        let ctx = auth.resolve(&token).unwrap();
        assert_eq!(ctx.principal().unwrap().role, Some(Role::CallCenter));
        let (_, again) = auth.sign_in("dana@example.com", "secret1").unwrap();
        assert_eq!(again.role, Some(Role::Supervisor));
    }

    #[test]
    fn unknown_tokens_are_anonymous() {
        let (_store, auth) = service(3600);
        assert_eq!(auth.resolve("").unwrap(), SessionContext::anonymous());
        assert_eq!(auth.resolve("bogus").unwrap(), SessionContext::anonymous());
    }

    #[test]
    fn session_changes_are_broadcast() {
        let (_store, auth) = service(3600);
        let mut events = auth.subscribe();
        let (token, principal) = auth.sign_in("dana@example.com", "secret1").unwrap();
        auth.sign_out(&token).unwrap();

        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::SignedIn {
                uid: principal.uid.clone()
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::SignedOut { uid: principal.uid }
        );
    }
}
