//! Then steps for batch operation scenarios.

use super::world::{BatchWorld, run_async};
use rstest_bdd_macros::then;
use serde_json::{Value, json};

fn expect_success(world: &BatchWorld, expected: bool) -> Result<(), eyre::Report> {
    let body = world.response()?;
    if body["success"] != json!(expected) {
        return Err(eyre::eyre!("expected success = {expected}, got {body}"));
    }
    Ok(())
}

fn count_with_status(world: &BatchWorld, status: &str) -> Result<u64, eyre::Report> {
    let body = run_async(world.tools.call("list_tasks", json!({ "status": status })));
    body["count"]
        .as_u64()
        .ok_or_else(|| eyre::eyre!("list_tasks returned no count: {body}"))
}

#[then("the response succeeds")]
fn response_succeeds(world: &BatchWorld) -> Result<(), eyre::Report> {
    expect_success(world, true)
}

#[then("the response fails")]
fn response_fails(world: &BatchWorld) -> Result<(), eyre::Report> {
    expect_success(world, false)
}

#[then(r#"the response reports {count:u64} under "{key}""#)]
fn response_reports(world: &BatchWorld, count: u64, key: String) -> Result<(), eyre::Report> {
    let body = world.response()?;
    if body[key.as_str()] != json!(count) {
        return Err(eyre::eyre!("expected {key} = {count}, got {body}"));
    }
    Ok(())
}

#[then(r#"the response lists the error "{message}""#)]
fn response_lists_error(world: &BatchWorld, message: String) -> Result<(), eyre::Report> {
    let body = world.response()?;
    let listed = body["errors"]
        .as_array()
        .is_some_and(|errors| errors.contains(&Value::String(message.clone())));
    if !listed {
        return Err(eyre::eyre!("error '{message}' missing from {body}"));
    }
    Ok(())
}

#[then(r#"the restored task is "{description}" with confidence "{confidence}""#)]
fn restored_task_is(
    world: &BatchWorld,
    description: String,
    confidence: String,
) -> Result<(), eyre::Report> {
    let body = world.response()?;
    if body["task"]["description"] != json!(description) {
        return Err(eyre::eyre!("expected restored task '{description}', got {body}"));
    }
    if body["confidence"] != json!(confidence) {
        return Err(eyre::eyre!("expected confidence '{confidence}', got {body}"));
    }
    Ok(())
}

#[then("{count:u64} tasks are pending")]
fn tasks_pending(world: &BatchWorld, count: u64) -> Result<(), eyre::Report> {
    let pending = count_with_status(world, "pending")?;
    if pending != count {
        return Err(eyre::eyre!("expected {count} pending tasks, found {pending}"));
    }
    Ok(())
}

#[then("{count:u64} tasks remain in the store")]
fn tasks_remain(world: &BatchWorld, count: u64) -> Result<(), eyre::Report> {
    let remaining = count_with_status(world, "all")?;
    if remaining != count {
        return Err(eyre::eyre!("expected {count} stored tasks, found {remaining}"));
    }
    Ok(())
}
