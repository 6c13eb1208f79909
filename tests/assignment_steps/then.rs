//! Then steps for task assignment BDD scenarios.

use super::world::{AssignmentWorld, parse_day, run_async};
use rstest_bdd_macros::then;
use taskboard::task::{
    domain::DateRange,
    services::{OVERLAP_MESSAGE, TaskAssignmentError, TaskField},
};

#[then("the assignment succeeds")]
fn assignment_succeeds(world: &AssignmentWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing assignment result in scenario world"))?;
    result
        .as_ref()
        .map(|_| ())
        .map_err(|err| eyre::eyre!("unexpected assignment failure: {err}"))
}

#[then("the assignment fails with the overlap message")]
fn assignment_overlaps(world: &AssignmentWorld) -> Result<(), eyre::Report> {
    let err = match world.last_result.as_ref() {
        Some(Err(err)) => err,
        Some(Ok(_)) => return Err(eyre::eyre!("expected the assignment to fail")),
        None => return Err(eyre::eyre!("missing assignment result in scenario world")),
    };
    let errors = err
        .validation_errors()
        .ok_or_else(|| eyre::eyre!("expected a validation failure, found {err}"))?;
    if errors.messages_for(TaskField::UserId) != vec![OVERLAP_MESSAGE] {
        return Err(eyre::eyre!("unexpected validation errors: {errors}"));
    }
    Ok(())
}

#[then("the assignment is forbidden")]
fn assignment_forbidden(world: &AssignmentWorld) -> Result<(), eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(TaskAssignmentError::Forbidden(_))) => Ok(()),
        Some(other) => Err(eyre::eyre!("expected a forbidden error, found {other:?}")),
        None => Err(eyre::eyre!("missing assignment result in scenario world")),
    }
}

#[then(r#""{name}" is occupied on {count:usize} days between "{start}" and "{end}""#)]
fn occupied_days(
    world: &AssignmentWorld,
    name: String,
    count: usize,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let user_id = world.member(&name)?.id();
    let window = DateRange::new(parse_day(&start)?, parse_day(&end)?)
        .map_err(|err| eyre::eyre!("invalid window: {err}"))?;
    let rows = run_async(world.stack.lookup().for_user_between(user_id, window))
        .map_err(|err| eyre::eyre!("availability lookup failed: {err}"))?;
    if rows.len() != count {
        return Err(eyre::eyre!(
            "expected {name} to be occupied on {count} days, found {}",
            rows.len()
        ));
    }
    Ok(())
}

#[then(r#""{name}" received {count:usize} assignment notification"#)]
fn received_notifications(
    world: &mut AssignmentWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let received = world.drain_notifications(&name)?;
    if received != count {
        return Err(eyre::eyre!(
            "expected {count} notifications for {name}, found {received}"
        ));
    }
    Ok(())
}
