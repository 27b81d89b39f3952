use env_logger::Env;
use log::info;
use smartcab::{agent::LearningAgent, gym::Crossings, table::INITIAL_Q};

const NUM_TRIALS: u32 = 100;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut world = Crossings::seeded(7);
    let mut agent = LearningAgent::seeded(7);

    for trial in 0..NUM_TRIALS {
        let destination = world.begin_trial();
        agent.reset(&mut world, Some(destination));

        let mut t = 0;
        while world.is_active() {
            agent.update(&mut world, t);
            t += 1;
        }

        let report = world.report.take();
        info!(
            "trial {trial}: destination {destination:?}, reward {:.1}, steps {}, success {}",
            report["reward"], report["steps"], report["success"]
        );
    }

    let visited = agent.q_table().values().filter(|&q| q != INITIAL_Q).count();
    info!("learned estimates for {visited} state-action cells");
}
