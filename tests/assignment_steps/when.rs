//! When steps for task assignment BDD scenarios.

use super::world::{AssignmentWorld, parse_day, run_async};
use rstest_bdd_macros::when;
use taskboard::task::{domain::Actor, services::TaskInput};

fn assign(
    world: &mut AssignmentWorld,
    actor: Actor,
    title: String,
    assignee: &str,
    start: &str,
    end: &str,
) -> Result<(), eyre::Report> {
    let input = TaskInput::new(
        title,
        parse_day(start)?,
        parse_day(end)?,
        world.member(assignee)?.id(),
        world.stack.status("To Do").id(),
    );
    let result = run_async(world.stack.service.create(&actor, input));
    if let Ok(task) = &result {
        world.last_task = Some(task.clone());
    }
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the administrator assigns "{title}" to "{name}" from "{start}" to "{end}""#)]
fn admin_assigns(
    world: &mut AssignmentWorld,
    title: String,
    name: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let admin = Actor::admin(world.stack.admin.id());
    assign(world, admin, title, &name, &start, &end)
}

#[when(r#"member "{actor}" tries to assign "{title}" to "{name}" from "{start}" to "{end}""#)]
fn member_assigns(
    world: &mut AssignmentWorld,
    actor: String,
    title: String,
    name: String,
    start: String,
    end: String,
) -> Result<(), eyre::Report> {
    let member = Actor::member(world.member(&actor)?.id());
    assign(world, member, title, &name, &start, &end)
}

#[when(r#"the administrator moves the task to "{name}""#)]
fn admin_reassigns(world: &mut AssignmentWorld, name: String) -> Result<(), eyre::Report> {
    let task = world
        .last_task
        .clone()
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let schedule = task.schedule();
    let input = TaskInput::new(
        task.title().as_str(),
        schedule.start(),
        schedule.end(),
        world.member(&name)?.id(),
        task.status_id(),
    );
    let admin = Actor::admin(world.stack.admin.id());
    world.last_result = Some(run_async(world.stack.service.update(&admin, task.id(), input)));
    Ok(())
}
