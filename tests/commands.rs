use dice_core::command::{Barabara, Reroll, Tally};
use dice_core::{
    execute, standard_commands, Command, CommandResult, DefaultContext, Randomizer, ScriptedDice,
};

fn run(text: &str, values: &[i64]) -> Option<CommandResult> {
    let mut roller = Randomizer::with_source(ScriptedDice::new(values.iter().copied()));
    execute(text, &DefaultContext, &mut roller, &standard_commands()).unwrap()
}

#[test]
fn lowercase_input_is_normalized() {
    let result = run("2d6+3", &[3, 4]).unwrap();
    assert_eq!(result.text, "(2D6+3) ＞ 7[{3,4}]+3 ＞ 10");
}

#[test]
fn parenthesized_counts_fold_before_parsing() {
    let result = run("(2+3)D6", &[1, 1, 1, 1, 1]).unwrap();
    assert_eq!(result.text, "(5D6) ＞ 5[{1,1,1,1,1}] ＞ 5");
}

#[test]
fn implicit_sides_are_filled_in() {
    let result = run("3D", &[2, 2, 2]).unwrap();
    assert_eq!(result.text, "(3D6) ＞ 6[{2,2,2}] ＞ 6");
}

#[test]
fn trailing_comment_is_ignored() {
    let result = run("1d100<=50 sneak attack", &[42]).unwrap();
    assert_eq!(result.text, "(1D100<=50) ＞ 42[{42}] ＞ 42 ＞ 成功");
    assert!(result.is_success);
}

#[test]
fn calc_takes_priority_over_dice() {
    let result = run("c(3*4)", &[]).unwrap();
    assert_eq!(result.text, "C((3*4)) ＞ 12");
}

#[test]
fn calc_overflow_wraps_instead_of_panicking() {
    let result = run("c4000000000*4000000000", &[]).unwrap();
    assert_eq!(
        result.text,
        "C(4000000000*4000000000) ＞ -2446744073709551616"
    );
}

#[test]
fn d66_roll() {
    let result = run("d66", &[2, 6]).unwrap();
    assert_eq!(result.text, "(D66) ＞ 26[2,6]");
}

#[test]
fn choice_picks_an_option() {
    let result = run("choice[red,green,blue]", &[3]).unwrap();
    assert_eq!(result.text, "(RED,GREEN,BLUE) ＞ BLUE");
}

#[test]
fn upper_and_lower_share_spellings_with_pools() {
    // nB... goes to the keep-highest command in the standard chain.
    let result = run("2b6", &[3, 5]).unwrap();
    assert_eq!(result.text, "(2B6) ＞ [3,5] ＞ 5");

    let result = run("2r6", &[3, 5]).unwrap();
    assert_eq!(result.text, "(2R6) ＞ [3,5] ＞ 3");
}

#[test]
fn count_success_pool() {
    let result = run("4s6>=5", &[5, 1, 6, 2]).unwrap();
    assert_eq!(result.text, "(4S6>=5) ＞ [5,1,6,2] ＞ 成功数2");
}

#[test]
fn unknown_input_is_not_claimed() {
    assert!(run("hello there", &[]).is_none());
    assert!(run("", &[]).is_none());
}

#[test]
fn secret_roll_is_flagged() {
    let result = run("s2d6", &[1, 2]).unwrap();
    assert!(result.is_secret);
}

#[test]
fn custom_chain_enables_pool_commands() {
    let commands: Vec<Box<dyn Command>> =
        vec![Box::new(Reroll), Box::new(Barabara), Box::new(Tally)];

    let mut roller = Randomizer::with_source(ScriptedDice::new([5, 2, 3]));
    let result = execute("2r6>=5", &DefaultContext, &mut roller, &commands)
        .unwrap()
        .unwrap();
    assert_eq!(result.text, "(2R6[5]>=5) ＞ 5,2 + 3 ＞ 成功数1");

    let mut roller = Randomizer::with_source(ScriptedDice::new([1, 4, 6]));
    let result = execute("3b6>=4", &DefaultContext, &mut roller, &commands)
        .unwrap()
        .unwrap();
    assert_eq!(result.text, "(3B6>=4) ＞ 1,4,6 ＞ 成功数2");

    let mut roller = Randomizer::with_source(ScriptedDice::new([2, 2, 5]));
    let result = execute("3ty6", &DefaultContext, &mut roller, &commands)
        .unwrap()
        .unwrap();
    assert_eq!(result.text, "(3TY6) ＞ 2,2,5 ＞ [2]×2, [5]×1");
}

#[test]
fn roll_history_is_attached() {
    let result = run("2d6", &[3, 4]).unwrap();
    assert_eq!(result.rolls, vec![(3, 6), (4, 6)]);
    assert_eq!(result.detailed_rolls.len(), 2);
}
