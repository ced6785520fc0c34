use cucumber::given;
use honey_store_engine::{events::EventProducers, test_utils::TestSystem, WebhookPolicy};

use crate::cucumber::OrderWorld;

#[given("a fresh install")]
async fn fresh_database(world: &mut OrderWorld) {
    let system = TestSystem::new(WebhookPolicy::Overwrite, EventProducers::default()).await;
    world.system = Some(system);
}

#[given(expr = "a fresh install with the {word} webhook policy")]
async fn fresh_database_with_policy(world: &mut OrderWorld, policy: String) {
    let policy = policy.parse::<WebhookPolicy>().expect("Unknown webhook policy");
    let system = TestSystem::new(policy, EventProducers::default()).await;
    world.system = Some(system);
}
