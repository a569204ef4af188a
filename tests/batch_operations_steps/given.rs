//! Given steps for batch operation scenarios.

use super::world::{BatchWorld, run_async};
use rstest_bdd_macros::given;
use serde_json::{Value, json};

fn ensure_success(body: &Value, action: &str) -> Result<(), eyre::Report> {
    if body["success"] != json!(true) {
        return Err(eyre::eyre!("{action} failed during setup: {body}"));
    }
    Ok(())
}

#[given(r#"a pending task "{description}" in project "{project}""#)]
fn pending_task(
    world: &mut BatchWorld,
    description: String,
    project: String,
) -> Result<(), eyre::Report> {
    let body = run_async(world.tools.call(
        "add_task",
        json!({ "description": description, "project": project }),
    ));
    ensure_success(&body, "add_task")
}

#[given("task {number:u64} has been deleted")]
fn task_deleted(world: &mut BatchWorld, number: u64) -> Result<(), eyre::Report> {
    let body = run_async(
        world
            .tools
            .call("delete_task", json!({ "task_id": number })),
    );
    ensure_success(&body, "delete_task")
}

#[given("the store refuses direct status changes")]
fn store_refuses_status_changes(world: &mut BatchWorld) -> Result<(), eyre::Report> {
    world
        .store
        .reject_status_overwrites(true)
        .map_err(|err| eyre::eyre!("configure store: {err}"))
}
