use clap::{Parser, Subcommand};

mod evaluate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train the drafting policy through self-play
    Train(#[clap(flatten)] train::TrainArg),
    /// Run one greedy self-play draft with a fresh policy
    Evaluate(#[clap(flatten)] evaluate::EvaluateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Train(train::TrainArg::default())) {
        Mode::Train(arg) => train::run(&arg),
        Mode::Evaluate(arg) => evaluate::run(&arg),
    }
}
