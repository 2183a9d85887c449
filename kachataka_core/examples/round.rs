use kachataka_core::{play_round, Direction, GameConfig, ServerSeed, Wager};

fn main() {
    // Commit, play one dice round, then reveal
    let seed = ServerSeed::generate(&mut rand::rngs::OsRng);
    let commitment = seed.commitment();
    println!("published hash={commitment}");

    let wager = Wager::Dice {
        threshold: 50.0,
        direction: Direction::Over,
    };
    match play_round(seed.as_str(), "1", &GameConfig::default(), &wager, 10.0) {
        Ok(result) => println!(
            "outcome={:?} multiplier={} win={}",
            result.outcome, result.multiplier, result.win_amount
        ),
        Err(err) => eprintln!("round rejected: {err}"),
    }
    println!("revealed seed={}", seed.as_str());
}
