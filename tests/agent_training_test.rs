use qtetris::agent::{run_episode, QLearningAgent, TrainOptions};
use qtetris::core::{AgentEnv, SessionConfig};
use qtetris::types::AgentAction;

#[test]
fn training_episodes_persist_and_resume() {
    let path = std::env::temp_dir().join(format!("qtetris-train-{}.json", std::process::id()));
    let options = TrainOptions { max_steps: Some(400) };

    let mut env = AgentEnv::new(21, SessionConfig::default());
    let mut agent = QLearningAgent::with_seed(21);
    agent.speed_up_learning(3.0);

    let first = run_episode(&mut env, &mut agent, &options);
    assert_eq!(first.episode, 0);
    agent.save(&path).unwrap();

    env.reset();
    let second = run_episode(&mut env, &mut agent, &options);
    assert_eq!(second.episode, 1);
    assert_eq!(second.seed, 22);
    assert!(second.exploration_rate < first.exploration_rate);
    assert!(second.states >= first.states);

    let mut resumed = QLearningAgent::with_seed(1);
    assert!(resumed.load(&path).unwrap());
    assert_eq!(resumed.table().len(), first.states);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn env_observation_keys_track_the_rendered_frame() {
    let mut env = AgentEnv::new(4, SessionConfig::default());
    let start = env.observe();
    assert_eq!(start.occupancy.iter().flatten().filter(|&&c| c).count(), 4);

    // Soft drop moves the piece, so the key changes.
    let step = env.step(AgentAction::SoftDrop);
    assert_ne!(step.observation.state_key(), start.state_key());
    assert_eq!(step.observation.occupancy.iter().flatten().filter(|&&c| c).count(), 4);
    assert!(!step.game_over);
}
