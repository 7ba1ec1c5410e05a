use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{
    AdventureSubmission, ContactSubmission, NewAdventureSubmission, NewContactSubmission, NewUser,
    SubmissionStore, User,
};

/// Map-backed store for development and tests.
///
/// All maps and counters live behind one mutex, so id assignment and insert
/// happen atomically with respect to concurrent requests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    contacts: Vec<ContactSubmission>,
    adventures: Vec<AdventureSubmission>,
    next_user_id: i64,
    next_contact_id: i64,
    next_adventure_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn get_user(&self, id: i64) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let mut inner = self.inner.lock().await;
        if inner.users.values().any(|u| u.username == new.username) {
            anyhow::bail!("username already exists");
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: new.username,
            password_hash: new.password_hash,
            role: new.role,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn create_contact_submission(
        &self,
        new: NewContactSubmission,
    ) -> anyhow::Result<ContactSubmission> {
        let mut inner = self.inner.lock().await;
        inner.next_contact_id += 1;
        let record = ContactSubmission {
            id: inner.next_contact_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            visit_date: new.visit_date,
            interests: new.interests,
            message: new.message,
            submitted_at: OffsetDateTime::now_utc(),
        };
        inner.contacts.push(record.clone());
        Ok(record)
    }

    async fn get_contact_submissions(&self) -> anyhow::Result<Vec<ContactSubmission>> {
        let inner = self.inner.lock().await;
        Ok(inner.contacts.clone())
    }

    async fn create_adventure_submission(
        &self,
        new: NewAdventureSubmission,
    ) -> anyhow::Result<AdventureSubmission> {
        let mut inner = self.inner.lock().await;
        inner.next_adventure_id += 1;
        let record = AdventureSubmission {
            id: inner.next_adventure_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            start_date: new.start_date,
            end_date: new.end_date,
            departure_airport: new.departure_airport,
            group_size: new.group_size,
            package_ids: new.package_ids,
            accommodation_ids: new.accommodation_ids,
            activity_ids: new.activity_ids,
            additional_requests: new.additional_requests,
            language: new.language,
            submitted_at: OffsetDateTime::now_utc(),
        };
        inner.adventures.push(record.clone());
        Ok(record)
    }

    async fn get_adventure_submissions(&self) -> anyhow::Result<Vec<AdventureSubmission>> {
        let inner = self.inner.lock().await;
        Ok(inner.adventures.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(email: &str) -> NewContactSubmission {
        NewContactSubmission {
            first_name: "Anna".into(),
            last_name: "Svensson".into(),
            email: email.into(),
            interests: vec!["snowmobile-tour".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn contact_ids_are_strictly_increasing() {
        let store = MemoryStore::new();
        let a = store.create_contact_submission(contact("a@example.com")).await.unwrap();
        let b = store.create_contact_submission(contact("b@example.com")).await.unwrap();
        let c = store.create_contact_submission(contact("c@example.com")).await.unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[tokio::test]
    async fn adventure_counter_is_independent_of_contact_counter() {
        let store = MemoryStore::new();
        store.create_contact_submission(contact("a@example.com")).await.unwrap();
        let adventure = store
            .create_adventure_submission(NewAdventureSubmission {
                first_name: "Erik".into(),
                last_name: "Lund".into(),
                email: "erik@example.com".into(),
                departure_airport: "ARN".into(),
                group_size: 2,
                language: "sv".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(adventure.id, 1);
        assert!(adventure.package_ids.is_empty());
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let store = MemoryStore::new();
        let new = |hash: &str| NewUser {
            username: "anna".into(),
            password_hash: hash.into(),
            role: "user".into(),
        };
        store.create_user(new("h1")).await.unwrap();
        assert!(store.create_user(new("h2")).await.is_err());
    }

    #[tokio::test]
    async fn user_lookup_by_name_and_id() {
        let store = MemoryStore::new();
        let created = store
            .create_user(NewUser {
                username: "admin".into(),
                password_hash: "hash".into(),
                role: "admin".into(),
            })
            .await
            .unwrap();
        let by_name = store.get_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        let by_id = store.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.role, "admin");
        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
    }
}
