use colored::Colorize;

const RULES: &[(&str, &str)] = &[
    (
        "Dice",
        "Each player owns a d4, d6, d8, d10, d12 and d20, rolled at the start.",
    ),
    (
        "First move",
        "Compare both pools from lowest face up; the first lower face moves \
         first. A complete tie goes to player 1.",
    ),
    (
        "Strength",
        "Capture an opponent die with one of yours showing at least its value.",
    ),
    (
        "Mind",
        "Capture an opponent die with two or more of your dice combined by \
         + - * / and parentheses. The result must equal its value exactly.",
    ),
    (
        "Re-roll",
        "Every die used in a capture is rolled again.",
    ),
    (
        "Last die",
        "If you moved first, your strength attack on the opponent's last die \
         must beat it strictly.",
    ),
    (
        "Winning",
        "Capture all six opposing dice. If the game clock runs out, the side \
         with more of its own dice left wins; a tie goes against the first \
         player.",
    ),
    (
        "Clocks",
        "A move that runs out of time is skipped. Undo takes back the last \
         attack and restores both clocks.",
    ),
];

pub fn run() -> Result<(), String> {
    println!("  {}", "Mindwar".bold().underline());
    println!();
    for (topic, text) in RULES {
        let label = format!("{topic}:");
        println!("  {} {text}", format!("{label:<11}").bold());
    }
    Ok(())
}
