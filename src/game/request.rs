use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use super::wire::DeviationRequest;

pub const PROFILE_SEPARATOR: char = ',';

/// Builds a request from per-player action lists (player ids are the list
/// positions) and `(profile, payoffs)` rows.
pub fn build_request(actions: &[&[&str]], rows: &[(&[&str], &[f64])]) -> DeviationRequest {
    let player_actions = actions
        .iter()
        .enumerate()
        .map(|(player, labels)| {
            (
                player.to_string(),
                labels.iter().map(|label| (*label).to_owned()).collect(),
            )
        })
        .collect();

    let payoff_matrix = rows
        .iter()
        .map(|(profile, payoffs)| (profile.join(","), payoffs.to_vec()))
        .collect();

    DeviationRequest {
        payoff_matrix,
        player_actions,
    }
}

pub fn load_request_file(path: &Path) -> Result<DeviationRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read request file {}", path.display()))?;
    let request: DeviationRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid request JSON in {}", path.display()))?;
    validate_request(&request)?;
    Ok(request)
}

/// Rejects requests the service would answer with a 400.
pub fn validate_request(request: &DeviationRequest) -> Result<()> {
    if request.player_actions.is_empty() {
        bail!("request lists no players");
    }

    let mut players = request
        .player_actions
        .iter()
        .map(|(id, actions)| {
            id.trim()
                .parse::<i64>()
                .map(|parsed| (parsed, actions))
                .map_err(|_| anyhow!("player id {id:?} is not an integer"))
        })
        .collect::<Result<Vec<_>>>()?;
    players.sort_by_key(|(id, _)| *id);

    let action_sets = players
        .iter()
        .map(|(_, actions)| actions.iter().map(String::as_str).collect::<HashSet<_>>())
        .collect::<Vec<_>>();

    for (key, payoffs) in &request.payoff_matrix {
        if payoffs.len() != players.len() {
            bail!(
                "profile {key:?} has {} payoffs for {} players",
                payoffs.len(),
                players.len()
            );
        }

        let profile = key.split(PROFILE_SEPARATOR).collect::<Vec<_>>();
        if profile.len() != players.len() {
            bail!(
                "profile {key:?} names {} actions for {} players",
                profile.len(),
                players.len()
            );
        }

        for ((player, _), (action, allowed)) in
            players.iter().zip(profile.iter().zip(action_sets.iter()))
        {
            if !allowed.contains(action) {
                bail!("profile {key:?} uses unknown action {action:?} for player {player}");
            }
        }
    }

    Ok(())
}
