use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use tabled::{Table, Tabled};

use crate::game::{Match, MatchError, SpecialMove};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Tabled)]
pub struct PerftDepthResult {
    pub depth: usize,
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

pub struct PerftResult {
    pub depth_results: Vec<PerftDepthResult>,
    pub tot_nodes: u64,
    pub time_elapsed: Duration,
    pub nodes_per_second: f64,
}

impl PerftDepthResult {
    pub fn empty(depth: usize) -> PerftDepthResult {
        PerftDepthResult {
            depth,
            nodes: 0,
            captures: 0,
            en_passants: 0,
            castles: 0,
            promotions: 0,
            checks: 0,
            checkmates: 0,
        }
    }
}

impl Display for PerftResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total nodes: {}", self.tot_nodes)?;
        writeln!(f, "time elapsed: {}", self.time_elapsed.as_secs_f32())?;
        writeln!(f, "nodes/s: {}", self.nodes_per_second)?;
        writeln!(f, "{}", Table::new(&self.depth_results))?;
        Ok(())
    }
}

/// Counts every line of legal play `depth` plies deep from `game`, by depth.
/// Works on a copy; `game` itself is left alone.
pub fn perft(game: &Match, depth: usize) -> Result<PerftResult, MatchError> {
    let mut depth_results: Vec<PerftDepthResult> =
        (1..=depth).map(PerftDepthResult::empty).collect();
    let mut game = game.clone();

    let start = Instant::now();

    perft_helper(&mut depth_results, &mut game, depth, 0)?;

    let time_elapsed = start.elapsed();

    let tot_nodes = depth_results.iter().fold(0, |tot, curr| tot + curr.nodes);

    let nodes_per_second = tot_nodes as f64 / time_elapsed.as_secs_f64();

    Ok(PerftResult {
        depth_results,
        tot_nodes,
        time_elapsed,
        nodes_per_second,
    })
}

fn perft_helper(
    depth_results: &mut [PerftDepthResult],
    game: &mut Match,
    max_depth: usize,
    curr_depth: usize,
) -> Result<(), MatchError> {
    if curr_depth == max_depth || game.is_terminated() {
        return Ok(());
    }

    let player = game.current_player();
    for mve in game.pseudo_legal_moves(player, game.is_check()) {
        let played = match game.realize_move(mve.src, mve.dest) {
            Ok(played) => played,
            // Leaves the mover in check.
            Err(err) if err.is_recoverable() => continue,
            Err(err) => return Err(err),
        };

        let curr_res = &mut depth_results[curr_depth];
        curr_res.nodes += 1;
        if played.captured.is_some() {
            curr_res.captures += 1;
        }
        match played.special {
            SpecialMove::EnPassant { .. } => curr_res.en_passants += 1,
            SpecialMove::Castle { .. } => curr_res.castles += 1,
            SpecialMove::Normal => {}
        }
        if played.promotion.is_some() {
            curr_res.promotions += 1;
        }
        if game.is_check() {
            curr_res.checks += 1;
        }
        if game.is_terminated() {
            curr_res.checkmates += 1;
        }

        perft_helper(depth_results, game, max_depth, curr_depth + 1)?;

        game.take_back()?;
    }
    Ok(())
}
