//! Read-only commands plus user registration and login.

use anyhow::{Context, Result};
use clap::Args;
use sqb_config::resolve_password;
use sqb_roster::{refresh, ExcludeSet};
use sqb_schemas::{NamedEntity, UserId};

use super::{build_app, client_config, print_view, ready, LimitArgs, ViewArgs};
use crate::GlobalArgs;

#[derive(Args, Debug, Clone)]
pub struct PlayersArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Substring of the nationality name
    #[arg(long)]
    pub nationality: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CandidatesArgs {
    #[command(flatten)]
    pub limits: LimitArgs,

    #[command(flatten)]
    pub view: ViewArgs,
}

pub async fn players(g: &GlobalArgs, args: PlayersArgs) -> Result<()> {
    let app = build_app(&client_config(g)?)?;
    let mut page = ready(app.players_page().await)?;
    page.filter = args.view.filter(args.nationality.clone());
    page.sort = args.view.sort_config();

    let rows = page.view();
    for v in &rows {
        print_view(v);
    }
    println!("players={}", rows.len());
    Ok(())
}

pub async fn candidates(g: &GlobalArgs, args: CandidatesArgs) -> Result<()> {
    let app = build_app(&client_config(g)?)?;
    let pool = ready(app.candidate_page(&args.limits.limits()).await)?;
    let rows = refresh(
        &pool,
        &args.view.filter(None),
        &ExcludeSet::new(),
        args.view.sort_config(),
    );
    for v in &rows {
        print_view(v);
    }
    println!("candidates={}", rows.len());
    Ok(())
}

fn print_entities(kind: &str, entities: &[NamedEntity]) {
    for e in entities {
        println!("id={} name={:?}", e.id, e.name);
    }
    println!("{kind}={}", entities.len());
}

pub async fn nationalities(g: &GlobalArgs) -> Result<()> {
    let app = build_app(&client_config(g)?)?;
    print_entities("nationalities", &ready(app.nationalities().await)?);
    Ok(())
}

pub async fn teams(g: &GlobalArgs) -> Result<()> {
    let app = build_app(&client_config(g)?)?;
    print_entities("teams", &ready(app.teams().await)?);
    Ok(())
}

pub async fn competitions(g: &GlobalArgs) -> Result<()> {
    let app = build_app(&client_config(g)?)?;
    print_entities("competitions", &ready(app.competitions().await)?);
    Ok(())
}

pub async fn register(g: &GlobalArgs, username: &str, email: &str, password: &str) -> Result<()> {
    let app = build_app(&client_config(g)?)?;
    app.register(username, email, password)
        .await
        .context("register failed")?;
    println!("registered=true");
    println!("username={username}");
    Ok(())
}

pub async fn login(
    g: &GlobalArgs,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let cfg = client_config(g)?;
    let username = username
        .or_else(|| cfg.auth.username.clone())
        .context("no username: pass --username or set /auth/username")?;
    let password = match password {
        Some(p) => p,
        None => resolve_password(&cfg.auth.password_env, |k| std::env::var(k).ok())?,
    };

    let mut app = build_app(&cfg)?;
    let user_id = app
        .login(&username, &password)
        .await
        .context("login failed")?;
    println!("user_id={user_id}");
    Ok(())
}

pub async fn squads(g: &GlobalArgs, user_id: UserId) -> Result<()> {
    let mut app = build_app(&client_config(g)?)?;
    app.set_user(user_id);
    let squads = ready(app.user_squads().await?)?;
    for s in &squads {
        let opt = |v: Option<i64>| v.map(|x| x.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "id={} name={:?} competition_id={} nationality_id={} budget={}",
            s.id,
            s.name,
            opt(s.competition_id),
            opt(s.nationality_id),
            s.budget
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    println!("squads={}", squads.len());
    Ok(())
}
