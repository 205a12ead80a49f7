use std::fmt::Write;

use tileflip_core::*;

fn digits(mut value: CellCount) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

/// Grid as text, rows prefixed with the number of their first cell.
pub fn board(engine: &PlayEngine) -> String {
    let grid = engine.config().grid;
    let side = CellCount::from(grid.side());
    let width = digits(engine.board().pair_count()).max(2) + 2;
    let label_width = digits(grid.cell_count());

    let mut out = String::new();
    for row in 0..side {
        let _ = write!(out, "{:>label_width$} |", row * side + 1);
        for col in 0..side {
            let cell = row * side + col;
            let text = match grid.tile_at_cell(cell) {
                None => String::new(),
                Some(index) => {
                    let tile = engine.tiles()[usize::from(index)];
                    let value = engine.board()[index];
                    if tile.matched {
                        format!("[{}]", value)
                    } else if tile.flipped {
                        value.to_string()
                    } else {
                        "??".to_string()
                    }
                }
            };
            let _ = write!(out, " {:^width$}", text);
        }
        out.push('\n');
    }
    out
}

pub fn status(engine: &PlayEngine, best: Option<Score>) -> String {
    let clock = match engine.config().timer {
        TimerMode::CountUp => format!("time {}s", engine.seconds()),
        TimerMode::CountDown { .. } => format!("left {}s", engine.seconds()),
    };
    let best = best.map_or_else(|| "-".to_string(), |best| best.to_string());
    format!(
        "{} | steps {} | {} | best {}",
        engine.difficulty().name(),
        engine.step_count(),
        clock,
        best
    )
}

/// Short cue standing in for a sound effect.
pub fn cue(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::Flip(_) => None,
        GameEvent::Match(_) => Some("* match *".to_string()),
        GameEvent::Mismatch(_) => Some("no match".to_string()),
        GameEvent::Won { summary, new_best } => Some(format!(
            "*** all pairs found, {} points{} ***",
            summary.score,
            if *new_best { ", new best!" } else { "" }
        )),
        GameEvent::TimeUp => Some("time is up, finish the board anyway".to_string()),
    }
}

pub fn win_screen(summary: &WinSummary, best: Option<Score>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== You won! ===");
    let _ = writeln!(out, "difficulty {}", summary.difficulty.name());
    let _ = writeln!(out, "score      {}", summary.score);
    let _ = writeln!(out, "steps      {}", summary.steps);
    let _ = writeln!(out, "time       {}s", summary.elapsed_seconds);
    if let Some(best) = best {
        let _ = writeln!(out, "best       {}", best);
    }
    out.push_str("r to play again, q to quit");
    out
}
