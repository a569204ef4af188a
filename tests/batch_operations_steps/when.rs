//! When steps for batch operation scenarios.

use super::world::{BatchWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::json;

#[when(r#"the batch tool "{tool}" runs on task numbers "{numbers}""#)]
fn batch_by_numbers(
    world: &mut BatchWorld,
    tool: String,
    numbers: String,
) -> Result<(), eyre::Report> {
    let task_ids = numbers
        .split(',')
        .map(|number| number.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .wrap_err_with(|| format!("parse task numbers '{numbers}'"))?;
    world.last_response = Some(run_async(
        world.tools.call(&tool, json!({ "task_ids": task_ids })),
    ));
    Ok(())
}

#[when("deleted task {number:u64} is restored")]
fn restore_task(world: &mut BatchWorld, number: u64) {
    world.last_response = Some(run_async(
        world
            .tools
            .call("restore_task", json!({ "task_id": number })),
    ));
}

#[when("deleted tasks are purged")]
fn purge_deleted(world: &mut BatchWorld) {
    world.last_response = Some(run_async(
        world.tools.call("purge_deleted_tasks", json!({})),
    ));
}
