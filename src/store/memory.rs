use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewTask, NewUser, Task, TaskStatus, User};
use crate::store::{Store, StoreError};

/// In-process persistence gateway with the same observable semantics as
/// [`super::PgStore`]: case-insensitive email uniqueness, newest-first task
/// listing, and timestamp refresh on every update. Backs the integration
/// tests and works for local development.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    tasks: HashMap<Uuid, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let email = user.email.to_lowercase();
        if inner.users.values().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User::new(NewUser { email, ..user });
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn insert_task(&self, task: NewTask) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        let task = Task::new(task);
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn tasks_for_user(&self, user_id: Uuid) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn update_task_status(
        &self,
        id: Uuid,
        status: Option<TaskStatus>,
    ) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.get_mut(&id).map(|task| {
            if let Some(status) = status {
                task.status = status;
            }
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Test".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role: Role::User,
        }
    }

    #[actix_rt::test]
    async fn test_email_uniqueness_is_case_insensitive() {
        let store = MemoryStore::new();
        store.insert_user(new_user("user@example.com")).await.unwrap();

        match store.insert_user(new_user("USER@example.com")).await {
            Err(StoreError::DuplicateEmail) => {}
            other => panic!("expected DuplicateEmail, got {:?}", other.map(|u| u.email)),
        }

        let found = store
            .find_user_by_email("User@Example.com")
            .await
            .unwrap()
            .expect("lookup should be case-insensitive");
        assert_eq!(found.email, "user@example.com");
    }

    #[actix_rt::test]
    async fn test_update_refreshes_timestamp_even_without_status() {
        let store = MemoryStore::new();
        let task = store
            .insert_task(NewTask {
                user_id: Uuid::new_v4(),
                title: "Buy milk".to_string(),
                description: "2 liters".to_string(),
            })
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let touched = store
            .update_task_status(task.id, None)
            .await
            .unwrap()
            .expect("task exists");
        assert_eq!(touched.status, TaskStatus::Pending);
        assert!(touched.updated_at > task.updated_at);

        let completed = store
            .update_task_status(task.id, Some(TaskStatus::Completed))
            .await
            .unwrap()
            .expect("task exists");
        assert_eq!(completed.status, TaskStatus::Completed);
    }

    #[actix_rt::test]
    async fn test_listing_is_scoped_and_newest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        for title in ["first", "second"] {
            store
                .insert_task(NewTask {
                    user_id: owner,
                    title: title.to_string(),
                    description: "d".to_string(),
                })
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        store
            .insert_task(NewTask {
                user_id: stranger,
                title: "other".to_string(),
                description: "d".to_string(),
            })
            .await
            .unwrap();

        let tasks = store.tasks_for_user(owner).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "second");
        assert!(tasks.iter().all(|t| t.user_id == owner));
    }

    #[actix_rt::test]
    async fn test_delete_is_idempotent_at_the_gateway() {
        let store = MemoryStore::new();
        let task = store
            .insert_task(NewTask {
                user_id: Uuid::new_v4(),
                title: "t".to_string(),
                description: "d".to_string(),
            })
            .await
            .unwrap();

        assert!(store.delete_task(task.id).await.unwrap());
        assert!(!store.delete_task(task.id).await.unwrap());
        assert!(store.find_task_by_id(task.id).await.unwrap().is_none());
    }
}
