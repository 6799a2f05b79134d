//! `squad plan` / `squad save`: rebuild the desired roster from `--slot`
//! flags, then print or apply the reconcile plan.

use anyhow::{Context, Result};
use clap::Args;
use sqb_api::HttpBackend;
use sqb_reconcile::ReconcilePlan;
use sqb_schemas::{PlayerId, Position, SquadId, UserId};
use sqb_session::{App, SquadSession};
use std::io::BufRead;
use tracing::info;

use super::{build_app, client_config, parse_slot, ready, LimitArgs};
use crate::GlobalArgs;

#[derive(Args, Debug, Clone)]
pub struct SquadArgs {
    #[arg(long)]
    pub user_id: UserId,

    /// Existing squad; its saved limits replace the limit flags
    #[arg(long)]
    pub squad_id: Option<SquadId>,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Desired slot, `ID` or `ID:POS`; repeat per player
    #[arg(long = "slot", value_parser = parse_slot)]
    pub slots: Vec<(PlayerId, Option<Position>)>,
}

async fn load_session(app: &mut App<HttpBackend>, args: &SquadArgs) -> Result<SquadSession> {
    app.set_user(args.user_id);

    let page = match args.squad_id {
        None => app.new_squad(args.limits.limits()).await?,
        Some(id) => {
            let squads = ready(app.user_squads().await?)?;
            let record = squads
                .iter()
                .find(|s| s.id == id)
                .with_context(|| format!("squad {id} not found for user {}", args.user_id))?;
            app.open_squad(record).await?
        }
    };
    let mut session = ready(page)?;
    apply_slots(&mut session, &args.slots)?;
    Ok(session)
}

/// Make the desired roster match `slots`: drop unlisted players, move listed
/// ones, add the rest through the selection.
fn apply_slots(session: &mut SquadSession, slots: &[(PlayerId, Option<Position>)]) -> Result<()> {
    let listed: Vec<PlayerId> = slots.iter().map(|(id, _)| *id).collect();
    let unlisted: Vec<PlayerId> = session
        .desired()
        .player_ids()
        .into_iter()
        .filter(|id| !listed.contains(id))
        .collect();
    for id in unlisted {
        session.remove(id)?;
    }

    for &(id, position) in slots {
        if session.desired().contains(id) {
            if let Some(p) = position {
                session.set_position(id, p)?;
            }
            continue;
        }
        session.select(id)?;
        if let Some(p) = position {
            session.select_position(p);
        }
        session.add_selected()?;
    }
    Ok(())
}

fn print_plan(plan: &ReconcilePlan) {
    for s in &plan.to_create {
        println!("create player_id={} position={}", s.player_id, s.position);
    }
    for s in &plan.to_update {
        println!(
            "update slot_id={} player_id={} position={}",
            s.id, s.player_id, s.position
        );
    }
    for s in &plan.to_delete {
        println!("delete slot_id={} player_id={}", s.id, s.player_id);
    }
    println!(
        "creates={} updates={} deletes={}",
        plan.to_create.len(),
        plan.to_update.len(),
        plan.to_delete.len()
    );
}

fn print_budget(session: &SquadSession) {
    println!("total_market_value={}", session.total_market_value());
    if let Some(left) = session.budget_remaining() {
        println!("budget_remaining={left}");
    }
}

pub async fn squad_plan(g: &GlobalArgs, args: SquadArgs) -> Result<()> {
    let mut app = build_app(&client_config(g)?)?;
    let session = load_session(&mut app, &args).await?;
    print_plan(&session.plan());
    print_budget(&session);
    Ok(())
}

pub async fn squad_save(g: &GlobalArgs, args: SquadArgs, name: Option<String>) -> Result<()> {
    let mut app = build_app(&client_config(g)?)?;
    let mut session = load_session(&mut app, &args).await?;

    let mut prompt = move || name.clone().or_else(read_name_line);
    let report = app.save(&mut session, &mut prompt).await?;
    info!(cycle_id = %report.cycle_id, squad_id = report.squad_id, "squad saved");

    println!("cycle_id={}", report.cycle_id);
    println!("squad_id={}", report.squad_id);
    println!("squad_created={}", report.squad_created);
    println!(
        "created={} updated={} deleted={}",
        report.created, report.updated, report.deleted
    );
    println!("finished_at={}", report.finished_at.to_rfc3339());
    print_budget(&session);
    Ok(())
}

/// One line from stdin; EOF or a read error means "no name".
fn read_name_line() -> Option<String> {
    eprint!("squad name: ");
    let mut line = String::new();
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}
