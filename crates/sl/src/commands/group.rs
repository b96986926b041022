//! Group command: list, create, delete, and invite

use anyhow::Result;
use clap::{Args, Subcommand};
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::provider::GroupProvider;
use tracing::debug;

use crate::commands::user::load_profile;
use crate::util::settings::AppContext;

/// Manage shared groups
#[derive(Args, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    action: GroupAction,
}

#[derive(Subcommand, Debug)]
enum GroupAction {
    /// List your groups and their members
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a group with you as the first member
    Create {
        /// Group name
        name: String,
    },

    /// Delete a group, removing it from every member's profile
    Delete {
        /// Group id
        id: String,

        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },

    /// Print the invite link for a group
    Invite {
        /// Group id
        id: String,
    },
}

/// Execute the group command
pub fn execute(args: GroupArgs) -> Result<()> {
    let ctx = AppContext::load(&ConfigOverrides::default())?;

    match args.action {
        GroupAction::List { json } => list(&ctx, json),
        GroupAction::Create { name } => create(&ctx, &name),
        GroupAction::Delete { id, yes } => delete(&ctx, &id, yes),
        GroupAction::Invite { id } => {
            println!("{}", invite_link(&ctx, &id));
            Ok(())
        }
    }
}

fn list(ctx: &AppContext, json: bool) -> Result<()> {
    let (profile, profile_fresh) = load_profile(ctx)?;

    let provider = GroupProvider::new(ctx.gateway()?, ctx.store());
    let hydrated = provider.hydrate();

    let (groups, fresh) = if profile_fresh {
        match provider.sync(&profile.groups) {
            Ok(groups) => (groups, true),
            Err(e) => {
                debug!("Group refresh failed: {e}");
                if hydrated {
                    eprintln!("Warning: gateway unreachable; showing cached groups");
                    (provider.groups(), false)
                } else {
                    anyhow::bail!(
                        "Could not load groups (gateway unreachable and no cache; \
                         run with SL_LOG=debug for details)"
                    )
                }
            }
        }
    } else if hydrated {
        (provider.groups(), false)
    } else {
        anyhow::bail!(
            "Could not load groups (gateway unreachable and no cache; \
             run with SL_LOG=debug for details)"
        )
    };

    if ctx.json_output(json) {
        let output = serde_json::json!({
            "fresh": fresh,
            "groups": groups,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No groups (create one with `sl group create <name>`)");
        return Ok(());
    }

    for group in &groups {
        println!("{}  {}", group.id, group.name);
        for member in &group.users {
            println!("    {} <{}>", member.name, member.email);
        }
    }

    Ok(())
}

fn create(ctx: &AppContext, name: &str) -> Result<()> {
    let (profile, fresh) = load_profile(ctx)?;
    if !fresh {
        anyhow::bail!("Cannot create a group while the gateway is unreachable");
    }

    let provider = GroupProvider::new(ctx.gateway()?, ctx.store());
    let (group, _updated) = match provider.create(name, &profile) {
        Ok(result) => result,
        Err(e) => {
            debug!("Group create failed: {e}");
            anyhow::bail!(
                "Could not create the group (gateway error; run with SL_LOG=debug for details)"
            );
        }
    };

    println!("Created group '{}' ({})", group.name, group.id);
    println!("Invite link: {}", invite_link(ctx, &group.id));
    Ok(())
}

fn delete(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!(
            "Deleting a group removes it from every member's profile; \
             re-run with --yes to confirm"
        );
    }

    let (profile, fresh) = load_profile(ctx)?;
    if !fresh {
        anyhow::bail!("Cannot delete a group while the gateway is unreachable");
    }

    let remaining: Vec<String> = profile
        .groups
        .iter()
        .filter(|g| g.as_str() != id)
        .cloned()
        .collect();

    let provider = GroupProvider::new(ctx.gateway()?, ctx.store());
    if let Err(e) = provider.delete(id, &remaining) {
        debug!("Group delete failed: {e}");
        anyhow::bail!(
            "Could not delete the group (gateway error; run with SL_LOG=debug for details)"
        );
    }

    println!("Deleted group {id}");
    Ok(())
}

fn invite_link(ctx: &AppContext, id: &str) -> String {
    format!(
        "{}/group/invite/{id}",
        ctx.config.gateway.web_base_url.trim_end_matches('/')
    )
}
