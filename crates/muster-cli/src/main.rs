mod command;
mod data;
mod model;
mod resolver;

fn main() -> anyhow::Result<()> {
    command::run()
}
