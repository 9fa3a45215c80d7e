mod actions;
mod cli;
mod config;
mod games;
mod gestures;
mod hand;
mod logging;
mod pipeline;
mod session;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
