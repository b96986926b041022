//! User command: show the signed-in profile

use anyhow::Result;
use clap::Args;
use spend_ledger_core::config::ConfigOverrides;
use spend_ledger_core::provider::UserConfigProvider;
use spend_ledger_core::schema::UserProfile;
use tracing::debug;

use crate::commands::budget::default_name;
use crate::util::settings::AppContext;

/// Show the signed-in profile (creating it on first contact)
#[derive(Args, Debug)]
pub struct UserArgs {
    /// Display name to use when the profile is created
    #[arg(long)]
    name: Option<String>,

    /// Override identity email
    #[arg(long)]
    email: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Execute the user command
pub fn execute(args: UserArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        email: args.email.clone(),
        ..Default::default()
    };
    let ctx = AppContext::load(&overrides)?;

    let (profile, fresh) = load_profile_named(&ctx, args.name.as_deref())?;

    if ctx.json_output(args.json) {
        let output = serde_json::json!({
            "fresh": fresh,
            "profile": profile,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} <{}>", profile.name, profile.email);
    if !profile.image.is_empty() {
        println!("  image: {}", profile.image);
    }
    if profile.groups.is_empty() {
        println!("  groups: none");
    } else {
        println!("  groups: {}", profile.groups.join(", "));
    }
    println!(
        "  budgets: {}",
        if profile.budget_list.is_some() { "set" } else { "not set" }
    );
    println!(
        "  allocations: {}",
        profile
            .allocations
            .as_ref()
            .map(|a| a.len().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(())
}

/// Shared profile loader with offline fallback: fresh when the gateway
/// answers, cached when it doesn't but the cache matches the configured
/// email, an error otherwise.
pub(crate) fn load_profile(ctx: &AppContext) -> Result<(UserProfile, bool)> {
    load_profile_named(ctx, None)
}

fn load_profile_named(ctx: &AppContext, name: Option<&str>) -> Result<(UserProfile, bool)> {
    let email = ctx.require_email()?;
    let provider = UserConfigProvider::new(ctx.gateway()?, ctx.store());
    let hydrated = provider.hydrate();

    let name = name
        .map(str::to_string)
        .unwrap_or_else(|| default_name(&email));

    match provider.ensure_user(&name, &email) {
        Ok(profile) => Ok((profile, true)),
        Err(e) => {
            debug!("Profile fetch failed: {e}");
            match provider.profile().filter(|_| hydrated) {
                Some(cached) if cached.email == email => {
                    eprintln!("Warning: gateway unreachable; showing cached profile");
                    Ok((cached, false))
                }
                _ => anyhow::bail!(
                    "Could not load the profile (gateway unreachable and no cache; \
                     run with SL_LOG=debug for details)"
                ),
            }
        }
    }
}
