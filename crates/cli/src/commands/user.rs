//! User management commands

use anyhow::Result;
use bankoffice_business::{Actor, NewUser, ServiceContext, UserService, UserUpdate};

use crate::config::Config;
use crate::output;
use crate::UserAction;

/// Handle user subcommands
pub async fn handle(
    ctx: &ServiceContext,
    config: &Config,
    actor: &Actor,
    action: UserAction,
) -> Result<()> {
    let users = UserService::new(ctx);

    match action {
        UserAction::Create {
            username,
            email,
            password,
            role,
        } => {
            let user = users
                .create_user(
                    actor,
                    NewUser {
                        username,
                        email,
                        password,
                        role: role.to_core(),
                    },
                )
                .await?;
            output::one(config.json, &user)?;
        }
        UserAction::List => {
            let list = users.list_users(actor).await?;
            output::many(config.json, &list, "No users found.")?;
        }
        UserAction::Show { user_id } => {
            let user = users.get_user(actor, user_id).await?;
            output::one(config.json, &user)?;
        }
        UserAction::Update {
            user_id,
            username,
            email,
            password,
            role,
        } => {
            let update = UserUpdate {
                username,
                email,
                password,
                role: role.map(|r| r.to_core()),
            };
            let user = users.update_user(actor, user_id, update).await?;
            output::one(config.json, &user)?;
        }
        UserAction::Delete { user_id } => {
            users.delete_user(actor, user_id).await?;
            println!("🗑️  User {} deleted", user_id);
        }
    }

    Ok(())
}
