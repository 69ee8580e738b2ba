//! Map validation command implementation.

use super::{CliError, load_map};
use lighthouses::game::{GameState, RDIST};
use std::path::Path;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the map cannot be read or is invalid.
pub(crate) fn execute(path: &Path) -> Result<(), CliError> {
    println!("Validating: {}", path.display());
    println!();

    let map = load_map(path)?;
    print_check("Closed border", true);

    let has_lighthouses = !map.lighthouses.is_empty();
    print_check("At least one lighthouse", has_lighthouses);
    let has_starts = !map.players.is_empty();
    print_check("At least one player start", has_starts);
    if !has_starts {
        return Err(CliError::new("Map declares no player starts"));
    }

    // Every start must be playable
    let state = GameState::new(&map, map.players.len())
        .map_err(|e| CliError::new(format!("Map cannot seat its players: {e}")))?;
    let walkable = state.island.cells().count();

    println!();
    println!("Summary:");
    println!("  Size:          {}x{}", map.width(), map.height());
    println!("  Island cells:  {walkable}");
    println!("  Lighthouses:   {}", map.lighthouses.len());
    println!("  Player starts: {}", map.players.len());
    for (i, start) in map.players.iter().enumerate() {
        println!("    P{i}: {start}");
    }
    println!("  Energy radius: {RDIST}");

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
