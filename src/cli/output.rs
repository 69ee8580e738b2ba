//! Output formatting utilities for CLI.

use lighthouses::arena::{MatchResult, RoundReport};

/// One score line per round.
pub(super) fn format_round(report: &RoundReport) -> String {
    let mut line = format!("########### ROUND {} SCORE:", report.round);
    for player in &report.players {
        line.push_str(&format!(" P{}: {}", player.id, player.score));
    }
    line
}

/// Format a match result as human-readable text.
pub(super) fn format_text(result: &MatchResult) -> String {
    let mut output = String::new();

    output.push_str("Match Result\n");
    match result.winner.and_then(|id| result.players.get(usize::from(id))) {
        Some(winner) => {
            output.push_str(&format!(
                "  Winner: Player {} ({})\n",
                winner.id, winner.name
            ));
        }
        None => output.push_str("  Winner: Draw\n"),
    }
    output.push_str(&format!("  Rounds: {}\n\n", result.rounds_played));

    for player in &result.players {
        output.push_str(&format!(
            "  Player {}: {} points ({})",
            player.id, player.score, player.name
        ));
        if let Some(round) = player.faulted_round {
            output.push_str(&format!(" [faulted round {round}]"));
        }
        if player.soft_timeouts > 0 {
            output.push_str(&format!(" [{} slow replies]", player.soft_timeouts));
        }
        if player.rejected_moves > 0 {
            output.push_str(&format!(" [{} rejected moves]", player.rejected_moves));
        }
        output.push('\n');
    }

    output
}
