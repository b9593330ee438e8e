//! User registry
//!
//! Creating, reading and managing back-office users under the role hierarchy.
//! The hierarchy is re-checked on every call against the target's current
//! role, not the role it had when it was created.

use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use bankoffice_core::policy::{Actor, Operation, Target};
use bankoffice_core::{Role, User};
use bankoffice_persistence::UserRepo;
use tracing::{debug, info};
use uuid::Uuid;

/// Data for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Applied only when the actor is an ADMIN
    pub role: Option<Role>,
}

fn user_target(user: &User) -> Target {
    Target::User {
        id: user.id,
        role: user.role,
    }
}

/// User Service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn get_user_by_email(&self, email: &str) -> BusinessResult<Option<User>> {
        Ok(UserRepo::find_by_email(self.ctx.pool(), email).await?)
    }

    /// Create a user. BANKER creates CLIENTs, ADMIN creates BANKERs.
    pub async fn create_user(&self, actor: &Actor, data: NewUser) -> BusinessResult<User> {
        if self.get_user_by_email(&data.email).await?.is_some() {
            return Err(BusinessError::conflict("Email already registered"));
        }

        self.ctx
            .authorize(actor, Operation::CreateUser, Target::NewUser(data.role))?;

        let user = self.insert(data).await?;
        info!(actor = %actor, user = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    /// Create the first ADMIN. Only possible while no ADMIN exists.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> BusinessResult<User> {
        if UserRepo::count_by_role(self.ctx.pool(), Role::Admin).await? > 0 {
            return Err(BusinessError::conflict("An admin user already exists"));
        }
        if self.get_user_by_email(email).await?.is_some() {
            return Err(BusinessError::conflict("Email already registered"));
        }

        let user = self
            .insert(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role: Role::Admin,
            })
            .await?;
        info!(user = %user.id, "admin bootstrapped");
        Ok(user)
    }

    async fn insert(&self, data: NewUser) -> BusinessResult<User> {
        if UserRepo::find_by_username(self.ctx.pool(), &data.username)
            .await?
            .is_some()
        {
            return Err(BusinessError::conflict("Username already taken"));
        }

        let password_hash = self.ctx.hasher().hash(&data.password);
        let user = User::new(&data.username, &data.email, password_hash, data.role);
        UserRepo::insert(self.ctx.pool(), &user).await?;
        Ok(user)
    }

    pub async fn get_user(&self, actor: &Actor, id: Uuid) -> BusinessResult<User> {
        let user = UserRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::ReadUser, user_target(&user))?;
        Ok(user)
    }

    /// All users visible to the actor. BANKER does not see ADMINs.
    pub async fn list_users(&self, actor: &Actor) -> BusinessResult<Vec<User>> {
        self.ctx
            .authorize(actor, Operation::ListUsers, Target::Collection)?;

        let users = UserRepo::get_all(self.ctx.pool()).await?;
        Ok(users
            .into_iter()
            .filter(|u| {
                bankoffice_core::policy::authorize(actor, Operation::ListUsers, user_target(u))
                    .is_allowed()
            })
            .collect())
    }

    pub async fn update_user(
        &self,
        actor: &Actor,
        id: Uuid,
        update: UserUpdate,
    ) -> BusinessResult<User> {
        let mut user = UserRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::UpdateUser, user_target(&user))?;

        if let Some(username) = update.username {
            user.username = username;
        }
        if let Some(email) = update.email {
            if email != user.email && self.get_user_by_email(&email).await?.is_some() {
                return Err(BusinessError::conflict("Email already registered"));
            }
            user.email = email;
        }
        if let Some(password) = update.password {
            user.password_hash = self.ctx.hasher().hash(&password);
        }
        match update.role {
            Some(role) if actor.role != Role::Admin => {
                debug!(actor = %actor, ?role, "role change ignored for non-admin")
            }
            Some(Role::Admin) if user.role != Role::Admin => {
                return Err(BusinessError::forbidden(
                    "ADMIN role is only granted by bootstrap",
                ))
            }
            Some(role) => user.role = role,
            None => {}
        }

        UserRepo::update(self.ctx.pool(), &user).await?;
        info!(actor = %actor, user = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete_user(&self, actor: &Actor, id: Uuid) -> BusinessResult<()> {
        let user = UserRepo::get_by_id(self.ctx.pool(), id).await?;
        self.ctx
            .authorize(actor, Operation::DeleteUser, user_target(&user))?;

        // Owned accounts are left in place
        UserRepo::delete(self.ctx.pool(), id).await?;
        info!(actor = %actor, user = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;

    fn new_user(name: &str, role: Role) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "secret".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_hierarchy_on_create() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        let admin = users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();

        let banker = users
            .create_user(&admin.actor(), new_user("bob", Role::Banker))
            .await
            .unwrap();
        assert_eq!(banker.role, Role::Banker);
        assert_ne!(banker.password_hash, "secret");

        let err = users
            .create_user(&admin.actor(), new_user("carol", Role::Client))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Admin can only create BANKER users");

        let client = users
            .create_user(&banker.actor(), new_user("carol", Role::Client))
            .await
            .unwrap();
        let err = users
            .create_user(&client.actor(), new_user("dave", Role::Client))
            .await
            .unwrap_err();
        assert!(matches!(err, BusinessError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_duplicate_email_checked_before_role() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        let admin = users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();

        // ADMIN creating a CLIENT is forbidden, but the email clash wins
        let mut data = new_user("other", Role::Client);
        data.email = "root@example.com".to_string();
        let err = users.create_user(&admin.actor(), data).await.unwrap_err();
        assert!(matches!(err, BusinessError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_single_bootstrap() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();

        let err = users
            .bootstrap_admin("root2", "root2@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, BusinessError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_banker_does_not_see_admins() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        let admin = users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();
        let banker = users
            .create_user(&admin.actor(), new_user("bob", Role::Banker))
            .await
            .unwrap();

        let visible = users.list_users(&banker.actor()).await.unwrap();
        assert!(visible.iter().all(|u| u.role != Role::Admin));
        assert_eq!(visible.len(), 1);
        assert_eq!(users.list_users(&admin.actor()).await.unwrap().len(), 2);

        let err = users.get_user(&banker.actor(), admin.id).await.unwrap_err();
        assert!(matches!(err, BusinessError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_client_updates_self_but_not_role() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        let admin = users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();
        let banker = users
            .create_user(&admin.actor(), new_user("bob", Role::Banker))
            .await
            .unwrap();
        let client = users
            .create_user(&banker.actor(), new_user("carol", Role::Client))
            .await
            .unwrap();

        let updated = users
            .update_user(
                &client.actor(),
                client.id,
                UserUpdate {
                    email: Some("carol@new.example.com".to_string()),
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "carol@new.example.com");
        assert_eq!(updated.role, Role::Client);

        let err = users
            .update_user(&client.actor(), banker.id, UserUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Clients can only update themselves");
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        let admin = users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();
        let banker = users
            .create_user(&admin.actor(), new_user("bob", Role::Banker))
            .await
            .unwrap();
        let client = users
            .create_user(&banker.actor(), new_user("carol", Role::Client))
            .await
            .unwrap();

        let err = users.delete_user(&client.actor(), client.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Clients cannot delete users");
        let err = users.delete_user(&admin.actor(), client.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Admin can only delete BANKER users");

        users.delete_user(&banker.actor(), client.id).await.unwrap();
        let err = users.get_user(&admin.actor(), client.id).await.unwrap_err();
        assert!(matches!(err, BusinessError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_cannot_promote_to_admin() {
        let ctx = context().await;
        let users = UserService::new(&ctx);
        let admin = users.bootstrap_admin("root", "root@example.com", "pw").await.unwrap();
        let banker = users
            .create_user(&admin.actor(), new_user("bob", Role::Banker))
            .await
            .unwrap();

        let promote = UserUpdate {
            role: Some(Role::Admin),
            ..UserUpdate::default()
        };
        let err = users
            .update_user(&admin.actor(), banker.id, promote)
            .await
            .unwrap_err();
        assert!(matches!(err, BusinessError::Forbidden(_)));
        assert_eq!(users.get_user(&admin.actor(), banker.id).await.unwrap().role, Role::Banker);
    }
}
